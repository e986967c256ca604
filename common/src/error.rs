use std::io;

use thiserror::Error;

/// Rejected input. Raised before a worker exists, never from inside a run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("destination IP is required")]
    EmptyDestination,
    #[error("packet count must be a positive integer")]
    ZeroCount,
    #[error("send interval must be at most {max} seconds, got {got}")]
    IntervalTooLong { max: u64, got: u64 },
    #[error("payload must be at most {max} bytes, got {got}")]
    PayloadTooLarge { max: usize, got: usize },
    #[error("could not resolve '{0}' to an IPv4 address")]
    UnresolvableDestination(String),
}

/// Failure to deliver a single probe. The worker absorbs these.
#[derive(Debug, Error)]
pub enum TransmissionError {
    #[error("failed to encode probe: {0}")]
    Encode(String),
    #[error("no source address available: {0}")]
    SourceUnavailable(String),
    #[error("send failed: {0}")]
    Io(#[from] io::Error),
}
