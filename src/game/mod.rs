pub mod archetype;
pub mod constants;
pub mod input;
pub mod schedule;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod summary;
pub mod systems;
