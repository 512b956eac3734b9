//! Configuration for scanning and copying.
//!
//! - [`ScanConfig`] - Read granularity and token size limit for the scanner
//!
//! # Example
//!
//! ```
//! use teestream::ScanConfig;
//!
//! // Custom sizes
//! let config = ScanConfig::new(1024, 16 * 1024)?;
//!
//! // Builder pattern
//! let config = ScanConfig::default().with_max_token_size(1024 * 1024);
//! assert!(config.validate().is_ok());
//!
//! # Ok::<(), teestream::ReplicaError>(())
//! ```

use crate::error::ReplicaError;

/// Default number of bytes requested from the stream per read (4 KiB).
pub const DEFAULT_READ_SIZE: usize = 4 * 1024;

/// Default upper bound on a single buffered token (64 KiB).
pub const DEFAULT_MAX_TOKEN_SIZE: usize = 64 * 1024;

/// Default scratch buffer size for draining and bulk copying (8 KiB).
pub const DEFAULT_COPY_BUFFER_SIZE: usize = 8 * 1024;

/// Configuration for the buffered scanner.
///
/// The scanner reads at most `read_size` bytes per call into its buffer. The
/// buffer grows across reads while the split function asks for more input,
/// but never past `max_token_size`; a token that does not fit ends the scan
/// with [`ReplicaError::TokenTooLarge`].
///
/// # Size Constraints
///
/// Both sizes must be non-zero and `read_size <= max_token_size`.
///
/// # Example
///
/// ```
/// use teestream::ScanConfig;
///
/// let config = ScanConfig::new(16, 64)?;
/// assert_eq!(config.read_size(), 16);
/// assert_eq!(config.max_token_size(), 64);
/// # Ok::<(), teestream::ReplicaError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanConfig {
    read_size: usize,
    max_token_size: usize,
}

impl ScanConfig {
    /// Creates a new configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ReplicaError::InvalidConfig`] if either size is zero or
    /// `read_size > max_token_size`.
    pub fn new(read_size: usize, max_token_size: usize) -> Result<Self, ReplicaError> {
        if read_size == 0 || max_token_size == 0 {
            return Err(ReplicaError::InvalidConfig {
                message: "scan sizes must be non-zero",
            });
        }

        if read_size > max_token_size {
            return Err(ReplicaError::InvalidConfig {
                message: "read_size cannot be greater than max_token_size",
            });
        }

        Ok(Self {
            read_size,
            max_token_size,
        })
    }

    /// Sets the per-read request size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`ScanConfig::validate`] to check it.
    pub fn with_read_size(mut self, size: usize) -> Self {
        self.read_size = size;
        self
    }

    /// Sets the maximum token size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`ScanConfig::validate`] to check it.
    pub fn with_max_token_size(mut self, size: usize) -> Self {
        self.max_token_size = size;
        self
    }

    /// Returns the per-read request size.
    pub fn read_size(&self) -> usize {
        self.read_size
    }

    /// Returns the maximum token size.
    pub fn max_token_size(&self) -> usize {
        self.max_token_size
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), ReplicaError> {
        Self::new(self.read_size, self.max_token_size).map(|_| ())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            read_size: DEFAULT_READ_SIZE,
            max_token_size: DEFAULT_MAX_TOKEN_SIZE,
        }
    }
}
