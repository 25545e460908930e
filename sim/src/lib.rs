//! Futevôlei simulation library.
//!
//! This module exposes the match simulation for use in tests and binaries.

pub mod actor;
pub mod aim;
pub mod ball;
pub mod config;
pub mod game_loop;
pub mod input;
pub mod notify;
pub mod npc;
pub mod player;
pub mod rules;
pub mod serve;
pub mod state;
pub mod trajectory;
