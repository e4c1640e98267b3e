//! Authentication and authorization guards for a JSON API.
//!
//! The guards live in [`middleware::auth`]; [`app`] wires them in front of the
//! user routes and runs the server.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
