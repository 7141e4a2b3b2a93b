//! HTTP front-end over the dataset cache.

pub mod middleware;
pub mod movies;
pub mod routes;
pub mod status;

pub use routes::*;
