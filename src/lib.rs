//! CryptingTool - capability-checked file encryption over a native engine boundary.
//!
//! The crate is organised around a single [`orchestrator::Orchestrator`] that
//! owns all observable state and drives runs through the
//! [`gateway::Gateway`]:
//! - [`capability`]: which key sizes and modes each algorithm accepts
//! - [`settings`]: the immutable encryption configuration
//! - [`gateway`]: the engine call contract and its status taxonomy
//! - [`engine`]: a pure-Rust engine implementing that contract
//! - [`progress`] and [`audit`]: what observers see while runs execute

pub mod audit;
pub mod capability;
pub mod config;
pub mod engine;
pub mod file;
pub mod gateway;
pub mod orchestrator;
pub mod progress;
pub mod secret;
pub mod settings;
pub mod types;
