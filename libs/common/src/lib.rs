//! Common library for the wellness sessions services
//!
//! This crate provides functionality shared by the auth and api services:
//! database connectivity and migrations, the store error taxonomy, identity
//! token issuance and verification, and the bearer authentication middleware.

pub mod database;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod settings;
pub mod token;

pub use identity::AuthUser;
pub use token::{TokenConfig, TokenService};
