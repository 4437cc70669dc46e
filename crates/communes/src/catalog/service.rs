use std::sync::Arc;

use tracing::info;

use super::domain::{City, CityDraft, Department, DepartmentDraft, MAX_TOP_N};
use super::domain::is_valid_department_code;
use super::export::{self, ExportError};
use super::store::{CityStore, DepartmentStore, StoreError};
use super::views::{city_views, CityView, DepartmentView};

/// Error taxonomy surfaced by the catalog services.
///
/// Business-rule violations are translated here, before the transport
/// layer; only `Store` and `Export` carry unexpected lower-layer failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    DuplicateKey(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn invalid(errors: Vec<String>) -> CatalogError {
    CatalogError::InvalidArgument(errors.join("; "))
}

/// The store's uniqueness backstop surfaces as a duplicate-key violation.
fn map_conflict(err: StoreError) -> CatalogError {
    match err {
        StoreError::Conflict(message) => CatalogError::DuplicateKey(message),
        other => CatalogError::Store(other),
    }
}

fn city_not_found(id: i64) -> CatalogError {
    CatalogError::NotFound(format!("city with id {id} not found"))
}

fn department_not_found_by_code(code: &str) -> CatalogError {
    CatalogError::NotFound(format!("department with code '{code}' not found"))
}

/// Business-rule layer for city records.
pub struct CityService<S, D> {
    cities: Arc<S>,
    departments: Arc<D>,
}

impl<S, D> CityService<S, D>
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    pub fn new(cities: Arc<S>, departments: Arc<D>) -> Self {
        Self { cities, departments }
    }

    pub fn list(&self) -> Result<Vec<CityView>, CatalogError> {
        Ok(city_views(self.cities.find_all()?))
    }

    pub fn get(&self, id: i64) -> Result<CityView, CatalogError> {
        require_positive_id(id, "city")?;
        let city = self.cities.find_by_id(id)?.ok_or_else(|| city_not_found(id))?;
        Ok(city.into())
    }

    pub fn get_by_name(&self, name: &str) -> Result<CityView, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "city name must not be blank".to_string(),
            ));
        }
        if name.chars().count() < 2 {
            return Err(CatalogError::InvalidArgument(
                "city name must be at least 2 characters".to_string(),
            ));
        }
        let city = self.cities.find_by_name(name)?.ok_or_else(|| {
            CatalogError::NotFound(format!("city named '{name}' not found"))
        })?;
        Ok(city.into())
    }

    pub fn create(&self, draft: &CityDraft) -> Result<CityView, CatalogError> {
        draft.validate().map_err(invalid)?;
        let draft = draft.normalized();

        if self.cities.find_by_name(&draft.name)?.is_some() {
            return Err(CatalogError::DuplicateKey(format!(
                "a city named '{}' already exists",
                draft.name
            )));
        }
        self.resolve_department(&draft.department_code)?;

        let city = self.cities.insert(draft).map_err(map_conflict)?;
        info!(id = city.id, name = %city.name, "city created");
        Ok(city.into())
    }

    pub fn update(&self, id: i64, draft: &CityDraft) -> Result<CityView, CatalogError> {
        require_positive_id(id, "city")?;
        draft.validate().map_err(invalid)?;
        let draft = draft.normalized();

        let existing = self.cities.find_by_id(id)?.ok_or_else(|| city_not_found(id))?;
        if let Some(holder) = self.cities.find_by_name(&draft.name)? {
            if holder.id != existing.id {
                return Err(CatalogError::DuplicateKey(format!(
                    "a city named '{}' already exists",
                    draft.name
                )));
            }
        }
        self.resolve_department(&draft.department_code)?;

        let updated = self
            .cities
            .update(City {
                id: existing.id,
                name: draft.name,
                population: draft.population,
                department_code: draft.department_code,
            })
            .map_err(map_conflict)?;
        Ok(updated.into())
    }

    /// Permanent removal; a second delete of the same id reports `NotFound`.
    pub fn delete(&self, id: i64) -> Result<(), CatalogError> {
        require_positive_id(id, "city")?;
        if !self.cities.delete_by_id(id)? {
            return Err(city_not_found(id));
        }
        info!(id, "city deleted");
        Ok(())
    }

    pub fn top_by_department(&self, code: &str, n: i64) -> Result<Vec<CityView>, CatalogError> {
        let code = require_code(code)?;
        if n <= 0 {
            return Err(CatalogError::InvalidArgument(
                "n must be a positive number".to_string(),
            ));
        }
        if n > MAX_TOP_N {
            return Err(CatalogError::InvalidArgument(format!(
                "n must not exceed {MAX_TOP_N}"
            )));
        }
        self.resolve_department(code)?;
        Ok(city_views(self.cities.top_by_department(code, n as usize)?))
    }

    pub fn by_population_range(
        &self,
        code: &str,
        min: i64,
        max: i64,
    ) -> Result<Vec<CityView>, CatalogError> {
        let code = require_code(code)?;
        if min < 0 || max < 0 {
            return Err(CatalogError::InvalidArgument(
                "population bounds must not be negative".to_string(),
            ));
        }
        if min > max {
            return Err(CatalogError::InvalidArgument(format!(
                "invalid population range: min {min} exceeds max {max}"
            )));
        }
        self.resolve_department(code)?;
        Ok(city_views(
            self.cities.by_department_and_population(code, min, max)?,
        ))
    }

    pub fn with_min_population(&self, min: i64) -> Result<Vec<CityView>, CatalogError> {
        if min < 0 {
            return Err(CatalogError::InvalidArgument(
                "minimum population must not be negative".to_string(),
            ));
        }
        Ok(city_views(self.cities.by_min_population(min)?))
    }

    pub fn starting_with(&self, prefix: &str) -> Result<Vec<CityView>, CatalogError> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "name prefix must not be blank".to_string(),
            ));
        }
        Ok(city_views(self.cities.by_name_prefix(prefix)?))
    }

    /// CSV rendition of every city at or above the population threshold.
    pub fn export_csv(&self, min_population: i64) -> Result<Vec<u8>, CatalogError> {
        export::csv::cities_csv(&*self.cities, &*self.departments, min_population)
    }

    fn resolve_department(&self, code: &str) -> Result<Department, CatalogError> {
        self.departments
            .find_by_code(code)?
            .ok_or_else(|| department_not_found_by_code(code))
    }
}

/// Business-rule layer for department records.
pub struct DepartmentService<D, S> {
    departments: Arc<D>,
    cities: Arc<S>,
}

impl<D, S> DepartmentService<D, S>
where
    D: DepartmentStore + 'static,
    S: CityStore + 'static,
{
    pub fn new(departments: Arc<D>, cities: Arc<S>) -> Self {
        Self { departments, cities }
    }

    pub fn list(&self) -> Result<Vec<DepartmentView>, CatalogError> {
        self.departments
            .find_all()?
            .into_iter()
            .map(|dept| self.view(dept))
            .collect()
    }

    pub fn get(&self, id: i64) -> Result<DepartmentView, CatalogError> {
        require_positive_id(id, "department")?;
        let department = self
            .departments
            .find_by_id(id)?
            .ok_or_else(|| department_not_found(id))?;
        self.view(department)
    }

    pub fn get_by_code(&self, code: &str) -> Result<DepartmentView, CatalogError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "department code must not be blank".to_string(),
            ));
        }
        if !is_valid_department_code(code) {
            return Err(CatalogError::InvalidArgument(
                "department code must be 2 to 3 alphanumeric characters".to_string(),
            ));
        }
        let department = self
            .departments
            .find_by_code(code)?
            .ok_or_else(|| department_not_found_by_code(code))?;
        self.view(department)
    }

    pub fn create(&self, draft: &DepartmentDraft) -> Result<DepartmentView, CatalogError> {
        draft.validate().map_err(invalid)?;
        let draft = draft.normalized();

        if self.departments.exists_by_code(&draft.code)? {
            return Err(CatalogError::DuplicateKey(format!(
                "a department with code '{}' already exists",
                draft.code
            )));
        }

        let department = self.departments.insert(draft).map_err(map_conflict)?;
        info!(id = department.id, code = %department.code, "department created");
        self.view(department)
    }

    pub fn update(&self, id: i64, draft: &DepartmentDraft) -> Result<DepartmentView, CatalogError> {
        require_positive_id(id, "department")?;
        draft.validate().map_err(invalid)?;
        let draft = draft.normalized();

        let existing = self
            .departments
            .find_by_id(id)?
            .ok_or_else(|| department_not_found(id))?;
        if let Some(holder) = self.departments.find_by_code(&draft.code)? {
            if holder.id != existing.id {
                return Err(CatalogError::DuplicateKey(format!(
                    "a department with code '{}' already exists",
                    draft.code
                )));
            }
        }

        let updated = self
            .departments
            .update(Department {
                id: existing.id,
                code: draft.code,
                name: draft.name,
            })
            .map_err(map_conflict)?;
        self.view(updated)
    }

    /// Deletion is blocked while cities still reference the department.
    pub fn delete(&self, id: i64) -> Result<(), CatalogError> {
        require_positive_id(id, "department")?;
        let department = self
            .departments
            .find_by_id(id)?
            .ok_or_else(|| department_not_found(id))?;

        let children = self.cities.by_department_code(&department.code)?;
        if !children.is_empty() {
            return Err(CatalogError::Conflict(format!(
                "department '{}' still has {} referencing cities",
                department.code,
                children.len()
            )));
        }

        if !self.departments.delete_by_id(id)? {
            return Err(department_not_found(id));
        }
        info!(id, code = %department.code, "department deleted");
        Ok(())
    }

    /// PDF rendition of a department and its cities.
    pub fn export_pdf(&self, code: &str) -> Result<Vec<u8>, CatalogError> {
        export::pdf::department_pdf(&*self.departments, &*self.cities, code)
    }

    fn view(&self, department: Department) -> Result<DepartmentView, CatalogError> {
        let population = self
            .cities
            .by_department_code(&department.code)?
            .iter()
            .map(|city| city.population)
            .sum();
        Ok(DepartmentView::new(department, population))
    }
}

/// Both services over one shared pair of store handles.
pub struct Catalog<S, D> {
    pub cities: CityService<S, D>,
    pub departments: DepartmentService<D, S>,
}

impl<S, D> Catalog<S, D>
where
    S: CityStore + 'static,
    D: DepartmentStore + 'static,
{
    pub fn new(cities: Arc<S>, departments: Arc<D>) -> Self {
        Self {
            cities: CityService::new(cities.clone(), departments.clone()),
            departments: DepartmentService::new(departments, cities),
        }
    }
}

fn department_not_found(id: i64) -> CatalogError {
    CatalogError::NotFound(format!("department with id {id} not found"))
}

fn require_positive_id(id: i64, entity: &str) -> Result<(), CatalogError> {
    if id <= 0 {
        return Err(CatalogError::InvalidArgument(format!(
            "{entity} id must be a positive number"
        )));
    }
    Ok(())
}

fn require_code(code: &str) -> Result<&str, CatalogError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(CatalogError::InvalidArgument(
            "department code must not be blank".to_string(),
        ));
    }
    Ok(code)
}
