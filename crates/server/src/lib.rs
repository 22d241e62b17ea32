//! User directory service library.
//!
//! Accounts, credentials, profiles, and role elevation behind an HTTP API.
//! The binary in `main.rs` wires [`db::UserRepository`] and
//! [`claims::HttpClaimsResolver`] into [`routes::app`]; tests wire in the
//! in-memory store and a static token table instead.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod claims;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
