pub mod client;
pub mod practitioner;

pub use client::client_session_middleware;
pub use practitioner::practitioner_gate_middleware;
