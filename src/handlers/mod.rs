// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod beaches;
pub mod cron;
pub mod health;

pub use beaches::config as beaches_config;
pub use cron::config as cron_config;
pub use health::config as health_config;
