use serde::Serialize;

use super::domain::{City, Department};

/// Transfer representation of a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityView {
    pub id: i64,
    pub name: String,
    pub population: i64,
    #[serde(rename = "departmentCode")]
    pub department_code: String,
}

impl From<City> for CityView {
    fn from(city: City) -> Self {
        Self {
            id: city.id,
            name: city.name,
            population: city.population,
            department_code: city.department_code,
        }
    }
}

/// Transfer representation of a department.
///
/// `population` is the sum of the owning cities' populations, computed by
/// the caller at view-build time so it can never go stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentView {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub population: i64,
}

impl DepartmentView {
    pub fn new(department: Department, population: i64) -> Self {
        Self {
            id: department.id,
            code: department.code,
            name: department.name,
            population,
        }
    }
}

pub(crate) fn city_views(cities: Vec<City>) -> Vec<CityView> {
    cities.into_iter().map(CityView::from).collect()
}
