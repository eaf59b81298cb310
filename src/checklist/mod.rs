//! Checklist Module
//!
//! The checklist is the markdown task list that drives the orchestrator. This
//! module provides the text-level helpers (`parse_open_items`, `mark_done`, ...)
//! and the structured [`Checklist`] used by the control loop.

mod model;
mod parser;

pub use model::*;
pub use parser::{
    DONE_MARKER, OPEN_MARKER, extract_target, mark_done, parse_all_items, parse_open_items, strip_fence,
};
