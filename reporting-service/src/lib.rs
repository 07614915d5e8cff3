//! reporting-service: read-side reporting over the ceramics distribution database.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
