//! Shared building blocks for the cfping workspace: the wire protocol spoken
//! between controller and scanning service, runtime configuration, and target
//! list handling.

pub mod config;
pub mod error;
pub mod network;
pub mod protocol;
