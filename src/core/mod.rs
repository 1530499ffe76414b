//! Core types - pure abstractions shared across the codebase.

mod link;
pub mod url;

pub use link::LinkKind;
pub use url::{is_denylisted, resolve, resolve_render_path};
