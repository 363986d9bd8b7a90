//! # Rently API
//!
//! HTTP surface for the Rently backend: actix-web routes under
//! `/api/v1/auth`, request DTOs with validation, and the domain-error to
//! HTTP mapping.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
