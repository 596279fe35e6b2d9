//! Pharmacy backend API service
//!
//! A CRUD API for the medicine inventory plus email/password registration,
//! login, and current-user endpoints backed by opaque bearer tokens.

pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
