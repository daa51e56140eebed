pub mod ai;
pub mod camera;
pub mod interaction;
pub mod motion;
pub mod physics;
pub mod player;
pub mod rage;
pub mod spawn;
