//! Error types for the scatter-gather DMA channel
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Channel configuration failures
//! - [`RingError`]: Descriptor list bookkeeping failures
//! - [`TransferError`]: Start/stop sequencing failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most channel methods. Every variant maps to exactly one state-machine
//! condition; none of them is retried internally.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Channel configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Wait bound outside 0..=1023 milliseconds
    InvalidWaitBound,
    /// Stop poll interval larger than the stop timeout
    InvalidPollInterval,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidWaitBound => "wait bound out of range",
            ConfigError::InvalidPollInterval => "invalid stop poll interval",
        }
    }
}

// =============================================================================
// Ring Errors
// =============================================================================

/// Descriptor list errors
///
/// These errors relate to creating the list and moving descriptors in and
/// out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RingError {
    /// No descriptor list has been created yet
    NoList,
    /// A descriptor list already exists for this channel
    ListExists,
    /// No active descriptors in the list
    ListEmpty,
    /// Every slot holds an active descriptor
    ListFull,
    /// No puts pending since the last commit
    NothingToCommit,
    /// The slot to be overwritten is locked by the caller
    DescriptorLocked,
}

impl core::fmt::Display for RingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RingError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RingError::NoList => "no descriptor list",
            RingError::ListExists => "descriptor list already exists",
            RingError::ListEmpty => "descriptor list empty",
            RingError::ListFull => "descriptor list full",
            RingError::NothingToCommit => "nothing to commit",
            RingError::DescriptorLocked => "descriptor locked",
        }
    }
}

// =============================================================================
// Transfer Errors
// =============================================================================

/// Start/stop sequencing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// Scatter-gather engine is already running
    AlreadyStarted,
    /// Scatter-gather engine is already stopped
    AlreadyStopped,
    /// Next descriptor for the engine belongs to an uncommitted run
    NotCommitted,
    /// Engine has already consumed every available descriptor
    NoData,
    /// Last-processed register points outside the descriptor list
    UnknownDescriptor,
    /// Bounded stop gave up before the engine went idle
    Timeout,
}

impl core::fmt::Display for TransferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TransferError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransferError::AlreadyStarted => "scatter-gather already started",
            TransferError::AlreadyStopped => "scatter-gather already stopped",
            TransferError::NotCommitted => "descriptor not committed",
            TransferError::NoData => "no data to process",
            TransferError::UnknownDescriptor => "descriptor outside list",
            TransferError::Timeout => "operation timed out",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match channel.start() {
///     Err(Error::Ring(RingError::ListEmpty)) => { /* nothing queued */ }
///     Err(Error::Transfer(TransferError::NotCommitted)) => { /* commit first */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// Descriptor list error
    Ring(RingError),
    /// Start/stop error
    Transfer(TransferError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Ring(e) => write!(f, "ring: {}", e.as_str()),
            Error::Transfer(e) => write!(f, "transfer: {}", e.as_str()),
        }
    }
}

impl core::error::Error for Error {}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<RingError> for Error {
    fn from(e: RingError) -> Self {
        Error::Ring(e)
    }
}

impl From<TransferError> for Error {
    fn from(e: TransferError) -> Self {
        Error::Transfer(e)
    }
}

/// Result type alias for channel operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for descriptor list operations
pub type RingResult<T> = core::result::Result<T, RingError>;

/// Result type alias for start/stop operations
pub type TransferResult<T> = core::result::Result<T, TransferError>;

// =============================================================================
// Unit Tests
// =============================================================================
