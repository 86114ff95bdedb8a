//! Terminal client for the e-music streaming server.
//!
//! The binary wires these together; everything below the terminal loop is
//! library code so state transitions stay testable without a terminal or a
//! server.

pub mod api;
pub mod auth;
pub mod controller;
pub mod debounce;
pub mod logging;
pub mod model;
pub mod player;
pub mod view;
