//! TUI screens

pub mod form;
mod post;

pub use form::{Field, FormScreen};
pub use post::PostScreen;
