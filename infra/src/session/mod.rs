//! Session termination

mod terminator;

pub use terminator::{RedirectingTerminator, SessionEvent};
