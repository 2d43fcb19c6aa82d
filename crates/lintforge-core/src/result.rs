//! Result type alias for lintforge operations

use crate::error::ForgeError;

/// Standard Result type for lintforge operations
pub type Result<T> = std::result::Result<T, ForgeError>;
