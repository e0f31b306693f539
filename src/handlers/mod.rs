// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod practices;
pub mod quiz;
pub mod reports;
