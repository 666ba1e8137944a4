// src/handlers/mod.rs

pub mod auth;
pub mod chat;
pub mod health;
pub mod heritage;
pub mod pdf;
pub mod quiz;
pub mod spatial;
pub mod statistics;
