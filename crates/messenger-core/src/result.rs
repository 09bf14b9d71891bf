//! Result type aliases.

use crate::MessengerError;

/// A specialized `Result` type for messenger operations.
pub type MessengerResult<T> = Result<T, MessengerError>;
