// src/lib.rs
// DOCUMENTATION: Cape Cod beach directory cache
// PURPOSE: Shared by the HTTP server (cron triggers, directory API) and the seed binary

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

#[cfg(test)]
pub mod testing;
