//! The core module holds the error type, graph settings and the traits used to talk to the backend.

pub mod error;
pub mod settings;
pub mod traits;
