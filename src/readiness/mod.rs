//! Readiness detection over the suppressed output buffer.

mod buffer;
mod detector;

pub use buffer::OutputBuffer;
pub use detector::{ReadinessDetector, ReadinessPolicy, ReadyReason};
