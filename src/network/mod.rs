//! Network layer - PocketBase call execution
//!
//! The Network actor receives backend commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::PbClient;
