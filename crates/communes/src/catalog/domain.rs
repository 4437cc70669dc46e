use serde::{Deserialize, Serialize};

/// Application-level ceiling on a single city's population.
pub const MAX_POPULATION: i64 = 50_000_000;

/// Upper bound accepted for top-N queries.
pub const MAX_TOP_N: i64 = 1_000;

/// A populated place owned by exactly one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub population: i64,
    pub department_code: String,
}

/// An administrative grouping of cities, identified by a short code.
///
/// The department's population is never stored; it is recomputed from the
/// cities referencing it every time a view is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// Caller-supplied city fields, before an identifier has been assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityDraft {
    pub name: String,
    pub population: i64,
    pub department_code: String,
}

impl CityDraft {
    /// Check every field and report one message per failing field.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let name = self.name.trim();

        if name.is_empty() {
            errors.push("city name must not be blank".to_string());
        } else if name.chars().count() < 2 {
            errors.push("city name must be at least 2 characters".to_string());
        }

        if self.population < 0 {
            errors.push("population must not be negative".to_string());
        } else if self.population > MAX_POPULATION {
            errors.push(format!("population must not exceed {MAX_POPULATION}"));
        }

        if self.department_code.trim().is_empty() {
            errors.push("department code is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Trimmed copy used for persistence and uniqueness checks.
    pub(crate) fn normalized(&self) -> CityDraft {
        CityDraft {
            name: self.name.trim().to_string(),
            population: self.population,
            department_code: self.department_code.trim().to_string(),
        }
    }
}

/// Caller-supplied department fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentDraft {
    pub code: String,
    pub name: String,
}

impl DepartmentDraft {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let code = self.code.trim();

        if code.is_empty() {
            errors.push("department code must not be blank".to_string());
        } else if !is_valid_department_code(code) {
            errors.push("department code must be 2 to 3 alphanumeric characters".to_string());
        }

        if self.name.trim().is_empty() {
            errors.push("department name must not be blank".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub(crate) fn normalized(&self) -> DepartmentDraft {
        DepartmentDraft {
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
        }
    }
}

/// Department codes are 2 or 3 ASCII alphanumerics ("34", "2A", "971").
pub fn is_valid_department_code(code: &str) -> bool {
    let len = code.len();
    (2..=3).contains(&len) && code.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, population: i64, code: &str) -> CityDraft {
        CityDraft {
            name: name.to_string(),
            population,
            department_code: code.to_string(),
        }
    }

    #[test]
    fn accepts_a_well_formed_city() {
        assert!(draft("Montpellier", 295_542, "34").validate().is_ok());
    }

    #[test]
    fn collects_every_failing_field() {
        let errors = draft(" ", -1, "").validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("blank"));
        assert!(errors[1].contains("negative"));
        assert!(errors[2].contains("department code"));
    }

    #[test]
    fn rejects_single_character_names_after_trimming() {
        let errors = draft(" M ", 100, "34").validate().unwrap_err();
        assert_eq!(errors, vec!["city name must be at least 2 characters"]);
    }

    #[test]
    fn rejects_population_above_ceiling() {
        let errors = draft("Paris", MAX_POPULATION + 1, "75").validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("exceed"));
    }

    #[test]
    fn department_code_format_is_enforced() {
        assert!(is_valid_department_code("34"));
        assert!(is_valid_department_code("2A"));
        assert!(is_valid_department_code("971"));
        assert!(!is_valid_department_code("3"));
        assert!(!is_valid_department_code("9711"));
        assert!(!is_valid_department_code("3-4"));

        let errors = DepartmentDraft {
            code: "9711".to_string(),
            name: "Guadeloupe".to_string(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors, vec!["department code must be 2 to 3 alphanumeric characters"]);
    }
}
