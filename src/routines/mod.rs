//! Routine tracking: entity, streak state machine, REST routes.

pub mod model;
pub mod routes;

pub use model::{Routine, RoutineView};
pub use routes::{RoutineState, routine_routes};
