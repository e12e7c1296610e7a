//! P1 smart-meter reading daemon
//!
//! Repeatedly reads one telegram from the P1 port (or a capture file),
//! validates and decodes it, and exports the registry-known readings to
//! InfluxDB once per wall-clock minute.
//!
//! Architecture: transport -> assembler -> checksum -> decoder -> normalizer -> sink

pub mod config;
pub mod driver;
pub mod sink;

pub use config::{InfluxConfig, Mode, ReaderConfig};
pub use driver::{Driver, DriverOptions};
pub use sink::{InfluxSink, Sink};
