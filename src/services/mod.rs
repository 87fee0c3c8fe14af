pub mod auth_gate;
pub mod orchestrator;
pub mod shutdown;
