//! Utilities regarding error handling

use thiserror::Error;

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the nsd-broadcast crate
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// An instance of `crate::ServiceType` could not be created due to an invalid format
    #[error("Invalid ServiceType format: {0}")]
    InvalidServiceType(String),
    /// A TXT record entry violates the DNS-SD key rules
    #[error("Invalid TXT record entry: {0}")]
    InvalidTxtRecord(String),
    /// The context supplied to `Broadcast::start` was dropped before the
    /// stream was first received from
    #[error("context is no longer valid")]
    StaleContext,
    /// Building the advertisement failed, or the platform reported a
    /// registration failure. `code` is the platform error code, when the
    /// platform supplied one.
    #[error("{component}: broadcast of `{service_name}` failed{}", fmt_code(.code))]
    BroadcastFailed {
        component: &'static str,
        service_name: String,
        code: Option<i32>,
    },
    /// An error occurred in the underlying NSD manager
    #[error("{0}")]
    ServiceError(String),
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" (code: {code})"),
        None => String::new(),
    }
}
