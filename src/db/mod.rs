// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod beach_repository;
pub mod directory;
pub mod photo_repository;
pub mod rating_repository;

pub use beach_repository::*;
pub use directory::*;
pub use photo_repository::*;
pub use rating_repository::*;
