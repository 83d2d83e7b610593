//! Template-to-candidate comparison strategies.

pub mod context;
pub mod positional;

pub use context::{ContextMatcher, HeadingResult, MatchStatus};
pub use positional::{FieldResult, PositionalMatcher};
