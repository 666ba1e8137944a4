// src/models/mod.rs

pub mod chat;
pub mod heritage;
pub mod pdf;
pub mod quiz_question;
pub mod quiz_record;
pub mod user;
