//! Runtime wiring: spawns the store actors, connects the components, and
//! exposes the engine's external surface.

pub mod engine;
pub mod tracing;

pub use engine::OrderEngine;
pub use tracing::setup_tracing;
