//! Plan execution and preview.
//!
//! This module applies (or simulates) a deletion plan and renders the
//! preview shown before confirmation.

pub mod delete;
pub mod preview;

pub use delete::{execute_plan, DeleteError, DeleteMode, ExecuteConfig, ExecutionReport};
pub use preview::render_preview;
