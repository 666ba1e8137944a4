// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod leaderboard;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
