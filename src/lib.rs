pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod guard;
pub mod model;
pub mod panel;
pub mod session;
pub mod types;

#[cfg(test)]
pub mod testing;
