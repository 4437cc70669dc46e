use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{City, CityDraft, Department, DepartmentDraft};
use super::store::{CityStore, DepartmentStore, StoreError};

/// In-memory store backing both entity collections.
///
/// A single mutex guards all state so uniqueness checks and the write they
/// protect happen in one critical section.
#[derive(Default)]
pub struct InMemoryCatalog {
    inner: Mutex<CatalogState>,
}

#[derive(Default)]
struct CatalogState {
    cities: HashMap<i64, City>,
    departments: HashMap<i64, Department>,
    next_city_id: i64,
    next_department_id: i64,
}

impl CatalogState {
    fn next_city_id(&mut self) -> i64 {
        self.next_city_id += 1;
        self.next_city_id
    }

    fn next_department_id(&mut self) -> i64 {
        self.next_department_id += 1;
        self.next_department_id
    }

    fn city_name_taken(&self, name: &str, other_than: Option<i64>) -> bool {
        let wanted = name.to_lowercase();
        self.cities
            .values()
            .any(|city| Some(city.id) != other_than && city.name.to_lowercase() == wanted)
    }

    fn department_code_taken(&self, code: &str, other_than: Option<i64>) -> bool {
        self.departments
            .values()
            .any(|dept| Some(dept.id) != other_than && dept.code == code)
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, CatalogState>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("catalog mutex poisoned".to_string()))
    }
}

/// Population descending, name ascending on ties.
fn sort_by_population_desc(cities: &mut [City]) {
    cities.sort_by(|a, b| {
        b.population
            .cmp(&a.population)
            .then_with(|| a.name.cmp(&b.name))
    });
}

impl CityStore for InMemoryCatalog {
    fn find_all(&self) -> Result<Vec<City>, StoreError> {
        let state = self.lock()?;
        let mut cities: Vec<City> = state.cities.values().cloned().collect();
        cities.sort_by_key(|city| city.id);
        Ok(cities)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<City>, StoreError> {
        let state = self.lock()?;
        Ok(state.cities.get(&id).cloned())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<City>, StoreError> {
        let state = self.lock()?;
        let wanted = name.to_lowercase();
        Ok(state
            .cities
            .values()
            .find(|city| city.name.to_lowercase() == wanted)
            .cloned())
    }

    fn exists_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let state = self.lock()?;
        Ok(state.cities.contains_key(&id))
    }

    fn insert(&self, draft: CityDraft) -> Result<City, StoreError> {
        let mut state = self.lock()?;
        if state.city_name_taken(&draft.name, None) {
            return Err(StoreError::Conflict(format!(
                "city name '{}' already exists",
                draft.name
            )));
        }

        let id = state.next_city_id();
        let city = City {
            id,
            name: draft.name,
            population: draft.population,
            department_code: draft.department_code,
        };
        state.cities.insert(id, city.clone());
        Ok(city)
    }

    fn update(&self, city: City) -> Result<City, StoreError> {
        let mut state = self.lock()?;
        if !state.cities.contains_key(&city.id) {
            return Err(StoreError::NotFound);
        }
        if state.city_name_taken(&city.name, Some(city.id)) {
            return Err(StoreError::Conflict(format!(
                "city name '{}' already exists",
                city.name
            )));
        }
        state.cities.insert(city.id, city.clone());
        Ok(city)
    }

    fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        Ok(state.cities.remove(&id).is_some())
    }

    fn by_department_code(&self, code: &str) -> Result<Vec<City>, StoreError> {
        let state = self.lock()?;
        let mut cities: Vec<City> = state
            .cities
            .values()
            .filter(|city| city.department_code == code)
            .cloned()
            .collect();
        drop(state);
        sort_by_population_desc(&mut cities);
        Ok(cities)
    }

    fn top_by_department(&self, code: &str, limit: usize) -> Result<Vec<City>, StoreError> {
        let mut cities = self.by_department_code(code)?;
        cities.truncate(limit);
        Ok(cities)
    }

    fn by_department_and_population(
        &self,
        code: &str,
        min: i64,
        max: i64,
    ) -> Result<Vec<City>, StoreError> {
        let mut cities = self.by_department_code(code)?;
        cities.retain(|city| (min..=max).contains(&city.population));
        Ok(cities)
    }

    fn by_min_population(&self, min: i64) -> Result<Vec<City>, StoreError> {
        let state = self.lock()?;
        let mut cities: Vec<City> = state
            .cities
            .values()
            .filter(|city| city.population >= min)
            .cloned()
            .collect();
        drop(state);
        sort_by_population_desc(&mut cities);
        Ok(cities)
    }

    fn by_name_prefix(&self, prefix: &str) -> Result<Vec<City>, StoreError> {
        let state = self.lock()?;
        let wanted = prefix.to_lowercase();
        let mut cities: Vec<City> = state
            .cities
            .values()
            .filter(|city| city.name.to_lowercase().starts_with(&wanted))
            .cloned()
            .collect();
        drop(state);
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cities)
    }
}

impl DepartmentStore for InMemoryCatalog {
    fn find_all(&self) -> Result<Vec<Department>, StoreError> {
        let state = self.lock()?;
        let mut departments: Vec<Department> = state.departments.values().cloned().collect();
        departments.sort_by_key(|dept| dept.id);
        Ok(departments)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Department>, StoreError> {
        let state = self.lock()?;
        Ok(state.departments.get(&id).cloned())
    }

    fn find_by_code(&self, code: &str) -> Result<Option<Department>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .departments
            .values()
            .find(|dept| dept.code == code)
            .cloned())
    }

    fn exists_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let state = self.lock()?;
        Ok(state.departments.contains_key(&id))
    }

    fn exists_by_code(&self, code: &str) -> Result<bool, StoreError> {
        let state = self.lock()?;
        Ok(state.departments.values().any(|dept| dept.code == code))
    }

    fn insert(&self, draft: DepartmentDraft) -> Result<Department, StoreError> {
        let mut state = self.lock()?;
        if state.department_code_taken(&draft.code, None) {
            return Err(StoreError::Conflict(format!(
                "department code '{}' already exists",
                draft.code
            )));
        }

        let id = state.next_department_id();
        let department = Department {
            id,
            code: draft.code,
            name: draft.name,
        };
        state.departments.insert(id, department.clone());
        Ok(department)
    }

    fn update(&self, department: Department) -> Result<Department, StoreError> {
        let mut state = self.lock()?;
        if !state.departments.contains_key(&department.id) {
            return Err(StoreError::NotFound);
        }
        if state.department_code_taken(&department.code, Some(department.id)) {
            return Err(StoreError::Conflict(format!(
                "department code '{}' already exists",
                department.code
            )));
        }
        state.departments.insert(department.id, department.clone());
        Ok(department)
    }

    fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        Ok(state.departments.remove(&id).is_some())
    }
}
