//! Controller layer: application state, backend events, the reducer, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod reducer;
pub mod state;
