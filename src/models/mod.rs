// src/models/mod.rs

pub mod practice_response;
pub mod quiz_response;
pub mod quiz_session;
pub mod user;
