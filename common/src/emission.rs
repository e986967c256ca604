//! Domain types shared by the emission worker and its callers.

pub mod probe;
pub mod progress;
pub mod request;

pub use probe::{Probe, ProbeKind};
pub use progress::ProgressEvent;
pub use request::{EmissionRequest, SourceMode};
