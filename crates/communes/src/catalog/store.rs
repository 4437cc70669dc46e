use super::domain::{City, CityDraft, Department, DepartmentDraft};

/// Error enumeration for store failures.
///
/// Absence is not a failure: lookups return `Option`. `Conflict` is the
/// store's own uniqueness backstop, independent of the service-layer
/// duplicate checks, so concurrent duplicate inserts cannot both succeed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record violates a uniqueness constraint: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for city records.
pub trait CityStore: Send + Sync {
    fn find_all(&self) -> Result<Vec<City>, StoreError>;
    fn find_by_id(&self, id: i64) -> Result<Option<City>, StoreError>;
    /// Case-insensitive exact-name lookup.
    fn find_by_name(&self, name: &str) -> Result<Option<City>, StoreError>;
    fn exists_by_id(&self, id: i64) -> Result<bool, StoreError>;
    /// Assigns an identifier; rejects duplicate names with `Conflict`.
    fn insert(&self, draft: CityDraft) -> Result<City, StoreError>;
    /// Update-by-identifier; `NotFound` when the id was never assigned.
    fn update(&self, city: City) -> Result<City, StoreError>;
    /// Returns whether a record was removed; a second call returns `false`.
    fn delete_by_id(&self, id: i64) -> Result<bool, StoreError>;

    /// Every city referencing the department, population descending.
    fn by_department_code(&self, code: &str) -> Result<Vec<City>, StoreError>;
    /// The `limit` highest-population cities of a department, population
    /// descending, ties broken by name ascending.
    fn top_by_department(&self, code: &str, limit: usize) -> Result<Vec<City>, StoreError>;
    /// Department cities with population inside `min..=max`, same ordering.
    fn by_department_and_population(
        &self,
        code: &str,
        min: i64,
        max: i64,
    ) -> Result<Vec<City>, StoreError>;
    /// All cities with population >= `min`, population descending.
    fn by_min_population(&self, min: i64) -> Result<Vec<City>, StoreError>;
    /// Case-insensitive name-prefix match, name ascending.
    fn by_name_prefix(&self, prefix: &str) -> Result<Vec<City>, StoreError>;
}

/// Storage abstraction for department records.
pub trait DepartmentStore: Send + Sync {
    fn find_all(&self) -> Result<Vec<Department>, StoreError>;
    fn find_by_id(&self, id: i64) -> Result<Option<Department>, StoreError>;
    fn find_by_code(&self, code: &str) -> Result<Option<Department>, StoreError>;
    fn exists_by_id(&self, id: i64) -> Result<bool, StoreError>;
    fn exists_by_code(&self, code: &str) -> Result<bool, StoreError>;
    /// Assigns an identifier; rejects duplicate codes with `Conflict`.
    fn insert(&self, draft: DepartmentDraft) -> Result<Department, StoreError>;
    fn update(&self, department: Department) -> Result<Department, StoreError>;
    fn delete_by_id(&self, id: i64) -> Result<bool, StoreError>;
}
