//! In-memory, periodically refreshed, cross-linked snapshot of the Studio
//! Ghibli API, served over HTTP.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod ghibli;
pub mod graph;
pub mod logging;
pub mod services;
pub mod state;
pub mod utils;
pub mod web;
