//! Shell Module
//!
//! Session state, error kinds, and the line dispatcher.

pub mod dispatch;
pub mod error;
pub mod session;

pub use dispatch::{Dispatcher, Outcome};
pub use error::ShellError;
pub use session::Session;
