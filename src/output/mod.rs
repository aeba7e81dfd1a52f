//! Report rendering.
//!
//! Two renderers share the same inputs: [`text`] writes the human-readable
//! report and [`json`] writes a machine-readable document for scripting.

pub mod json;
pub mod text;

pub use json::render_json;
pub use text::{print_section, render_duplicates, render_summary};
