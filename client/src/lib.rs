//! # Scan Controller
//!
//! Client side of cfping: submits target lists to the scan service, applies
//! the streamed results to a sortable table and gates new scans until the
//! running one completes.
//!
//! * **[`connection`]**: persistent WebSocket with fixed-delay reconnect.
//! * **[`controller`]**: request sender and message handler over the view state.
//! * **[`table`]** / **[`sort`]**: result rows and their ordering.
//! * **[`driver`]**: runs one scan to completion without a UI.

pub mod connection;
pub mod controller;
pub mod driver;
pub mod form;
pub mod sort;
pub mod status;
pub mod table;

pub use controller::ScanController;
