//! The measurement engine.
//!
//! [`connectivity::ConnectivityGate`] decides whether a run starts at all.
//! [`runner::SpeedTestRunner`] then drives one [`latency::LatencyProbe`] and
//! two [`throughput::ThroughputMeasurer`] windows, each window fanning out
//! the transfer loops in [`worker`].

pub mod connectivity;
pub mod latency;
pub mod runner;
pub mod throughput;
pub mod worker;

#[cfg(test)]
pub(crate) mod fakes;
