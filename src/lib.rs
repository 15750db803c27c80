//! Foglio: a small, self-hosted blog post service.
//!
//! Layering follows the usual split: `domain` holds entities and pure rules,
//! `application` holds services and repository contracts, `infra` holds the
//! Postgres and HTTP adapters, `presentation` holds the askama views.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
