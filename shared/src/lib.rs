//! Types shared between the futevôlei simulation and the browser client.

pub mod config;
pub mod protocol;
pub mod vec3;
