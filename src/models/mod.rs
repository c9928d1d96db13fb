// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod beach;
pub mod photo;
pub mod rating;
pub mod seed;

pub use beach::*;
pub use photo::*;
pub use rating::*;
pub use seed::*;
