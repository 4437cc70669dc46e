//! City and department catalog: domain model, store abstraction, business
//! services, export generators, and the HTTP router.

pub mod domain;
pub mod export;
pub mod memory;
pub mod router;
pub mod service;
pub mod store;
pub mod views;

pub use domain::{City, CityDraft, Department, DepartmentDraft, MAX_POPULATION, MAX_TOP_N};
pub use memory::InMemoryCatalog;
pub use router::catalog_router;
pub use service::{Catalog, CatalogError, CityService, DepartmentService};
pub use store::{CityStore, DepartmentStore, StoreError};
pub use views::{CityView, DepartmentView};
