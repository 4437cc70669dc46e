//! Catalog of French cities and departments.
//!
//! The library hosts the domain model, the store abstraction with its
//! in-memory implementation, the catalog services enforcing business rules,
//! the CSV/PDF export generators, and the HTTP router. The `services/api`
//! binary wires everything to a running server.

pub mod catalog;
pub mod config;
pub mod error;
pub mod telemetry;
