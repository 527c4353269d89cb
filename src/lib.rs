//! Terminal client for the Twelve Data market data API.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod export;
pub mod models;
pub mod refresh;
