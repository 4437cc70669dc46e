use csv::WriterBuilder;

use super::ExportError;
use crate::catalog::service::CatalogError;
use crate::catalog::store::{CityStore, DepartmentStore};

/// Placeholder department name when code resolution fails mid-export.
const UNKNOWN_DEPARTMENT: &str = "Unknown department";

/// Render every city at or above `min_population` as CSV.
///
/// The export is partial-failure tolerant per row: a city whose department
/// cannot be resolved gets a placeholder name instead of aborting the
/// document. Only the threshold is validated up front; I/O and
/// serialization faults fail the whole export.
pub fn cities_csv<S, D>(
    cities: &S,
    departments: &D,
    min_population: i64,
) -> Result<Vec<u8>, CatalogError>
where
    S: CityStore + ?Sized,
    D: DepartmentStore + ?Sized,
{
    if min_population < 0 {
        return Err(CatalogError::InvalidArgument(
            "minimum population must not be negative".to_string(),
        ));
    }

    let rows = cities.by_min_population(min_population)?;

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(["Name", "Population", "DepartmentCode", "DepartmentName"])
        .map_err(ExportError::from)?;

    for city in rows {
        let department_name = department_name(departments, &city.department_code);
        writer
            .write_record([
                city.name.as_str(),
                &city.population.to_string(),
                city.department_code.as_str(),
                &department_name,
            ])
            .map_err(ExportError::from)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(bytes)
}

fn department_name<D>(departments: &D, code: &str) -> String
where
    D: DepartmentStore + ?Sized,
{
    match departments.find_by_code(code) {
        Ok(Some(department)) => {
            let name = department.name.trim();
            if name.is_empty() {
                // A resolvable department with a blank name still beats the
                // generic placeholder.
                format!("Département {code}")
            } else {
                name.to_string()
            }
        }
        Ok(None) | Err(_) => UNKNOWN_DEPARTMENT.to_string(),
    }
}
