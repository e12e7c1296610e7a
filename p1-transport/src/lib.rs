//! Transport layer for the P1 smart-meter port
//!
//! This crate provides byte stream access to a live serial P1 port and to
//! captured telegram streams replayed from a file. The P1 port broadcasts
//! only; none of the transports write to the meter.

pub mod replay;
pub mod serial;
pub mod stream;

pub use p1_core::{P1Error, P1Result};
pub use replay::ReplayTransport;
pub use serial::{SerialSettings, SerialTransport};
pub use stream::{StreamAccessor, TransportLayer};
