//! Structure extraction from recognized text.

pub mod fields;
pub mod headings;

pub use fields::{FieldExtractor, FieldMap, NormalizedField};
pub use headings::{Heading, HeadingExtractor, HeadingMap};
