//! Scanning service: probe strategies, the scan runner, and the WebSocket
//! endpoint that streams results to controllers.

pub mod scanner;
pub mod server;
