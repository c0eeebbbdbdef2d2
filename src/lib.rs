//! Bastion - a small static file server with cookie-token sessions.
//!
//! Core library for the HTTP engine, routing and session handling.

pub mod auth;
pub mod buffer;
pub mod config;
pub mod http;
pub mod routes;
pub mod server;
