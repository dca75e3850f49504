//! Application boundary: the port traits adapters implement.

pub mod ports;
