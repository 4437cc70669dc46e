use communes::catalog::{Catalog, CatalogError, CityDraft, DepartmentDraft, InMemoryCatalog};

/// Load a small reference dataset for demos, one-shot exports, and tests.
pub(crate) fn seed_catalog(
    catalog: &Catalog<InMemoryCatalog, InMemoryCatalog>,
) -> Result<(), CatalogError> {
    for (code, name) in [
        ("34", "Hérault"),
        ("75", "Paris"),
        ("31", "Haute-Garonne"),
        ("69", "Rhône"),
    ] {
        catalog.departments.create(&DepartmentDraft {
            code: code.to_string(),
            name: name.to_string(),
        })?;
    }

    for (name, population, code) in [
        ("Paris", 2_165_423, "75"),
        ("Toulouse", 498_003, "31"),
        ("Lyon", 522_250, "69"),
        ("Montpellier", 295_542, "34"),
        ("Béziers", 80_341, "34"),
        ("Sète", 44_270, "34"),
    ] {
        catalog.cities.create(&CityDraft {
            name: name.to_string(),
            population,
            department_code: code.to_string(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn seed_dataset_satisfies_catalog_invariants() {
        let store = Arc::new(InMemoryCatalog::new());
        let catalog = Catalog::new(store.clone(), store);
        seed_catalog(&catalog).expect("seed data is valid");

        let herault = catalog
            .departments
            .get_by_code("34")
            .expect("Hérault seeded");
        assert_eq!(herault.population, 295_542 + 80_341 + 44_270);
    }
}
