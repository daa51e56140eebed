//! Cell Arena simulation engine
//!
//! A single-player cell-growth arena: the player (one body, or up to eight
//! cells after splitting) competes for mass with food and a population of
//! AI-driven enemies inside a bounded 2D arena.
//!
//! The [`game::session::Session`] owns the world and runs the tick pipeline;
//! renderers read [`game::snapshot::Snapshot`]s and input producers feed
//! [`game::input::InputCommand`]s.

pub mod config;
pub mod game;
pub mod util;
