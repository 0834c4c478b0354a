pub mod error;
pub mod identity;
pub mod repo;
pub mod service;
