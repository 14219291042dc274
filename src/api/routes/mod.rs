//! API Routes
//!
//! Route handlers organized by functionality.

pub mod auth;
pub mod conditions;
pub mod connection;
pub mod feedback;
pub mod health;
pub mod routing;
pub mod voice;
