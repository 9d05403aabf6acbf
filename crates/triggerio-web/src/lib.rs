//! Triggerio Analytics Dashboard
//!
//! Server-rendered analytics screen: a session gate in front of the page, a
//! per-session fetcher for the pre-aggregated dashboard payload and a view
//! model that falls back to sample data section by section.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api_client;
pub mod components;
pub mod controller;
pub mod export;
pub mod filters;
pub mod handlers;
pub mod insights;
pub mod pages;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;
pub mod view;

// Re-export the main functions
pub use server::{build_app, build_app_with_source};
pub use state::AppState;
