//! Carbot — web view library.
//!
//! Exposes the router, state, and error types so integration tests can
//! drive the app without binding a socket.

pub mod error;
pub mod routes;
pub mod state;
