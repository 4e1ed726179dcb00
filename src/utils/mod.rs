//! Helpers shared by the handlers.

pub mod text;
pub mod time;
