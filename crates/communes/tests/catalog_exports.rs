//! Integration coverage of the CSV and PDF export documents.

use std::sync::Arc;

use communes::catalog::{
    Catalog, CatalogError, CityDraft, CityStore, DepartmentDraft, InMemoryCatalog,
};

fn seeded() -> (Catalog<InMemoryCatalog, InMemoryCatalog>, Arc<InMemoryCatalog>) {
    let store = Arc::new(InMemoryCatalog::new());
    let catalog = Catalog::new(store.clone(), store.clone());
    catalog
        .departments
        .create(&DepartmentDraft {
            code: "75".to_string(),
            name: "Paris".to_string(),
        })
        .unwrap();
    catalog
        .departments
        .create(&DepartmentDraft {
            code: "34".to_string(),
            name: "Hérault".to_string(),
        })
        .unwrap();
    catalog
        .cities
        .create(&CityDraft {
            name: "Paris".to_string(),
            population: 2_165_423,
            department_code: "75".to_string(),
        })
        .unwrap();
    catalog
        .cities
        .create(&CityDraft {
            name: "Montpellier".to_string(),
            population: 295_542,
            department_code: "34".to_string(),
        })
        .unwrap();
    (catalog, store)
}

#[test]
fn csv_keeps_only_cities_at_or_above_the_threshold() {
    let (catalog, _) = seeded();

    let bytes = catalog.cities.export_csv(1_000_000).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Name,Population,DepartmentCode,DepartmentName");
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "Paris,2165423,75,Paris");
}

#[test]
fn csv_with_zero_threshold_lists_everything_largest_first() {
    let (catalog, _) = seeded();

    let bytes = catalog.cities.export_csv(0).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Paris,"));
    assert!(lines[2].starts_with("Montpellier,"));
}

#[test]
fn csv_rejects_a_negative_threshold() {
    let (catalog, _) = seeded();
    assert!(matches!(
        catalog.cities.export_csv(-1),
        Err(CatalogError::InvalidArgument(_))
    ));
}

#[test]
fn csv_falls_back_to_a_placeholder_for_unresolvable_departments() {
    let (catalog, store) = seeded();

    // Rows referencing a vanished department can exist below the service
    // layer; the export must tolerate them.
    CityStore::insert(
        &*store,
        CityDraft {
            name: "Atlantis".to_string(),
            population: 9_000_000,
            department_code: "00".to_string(),
        },
    )
    .unwrap();

    let bytes = catalog.cities.export_csv(3_000_000).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("Atlantis,9000000,00,Unknown department"));
}

#[test]
fn csv_quotes_fields_containing_separators_or_quotes() {
    let (catalog, store) = seeded();

    CityStore::insert(
        &*store,
        CityDraft {
            name: "Saint-Remy, dit \"le haut\"".to_string(),
            population: 5_000_000,
            department_code: "75".to_string(),
        },
    )
    .unwrap();

    let bytes = catalog.cities.export_csv(3_000_000).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("\"Saint-Remy, dit \"\"le haut\"\"\""));
}

#[test]
fn pdf_export_produces_a_pdf_document() {
    let (catalog, _) = seeded();

    let bytes = catalog.departments.export_pdf("34").unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 500);
}

#[test]
fn pdf_export_renders_departments_without_cities() {
    let (catalog, _) = seeded();
    catalog
        .departments
        .create(&DepartmentDraft {
            code: "48".to_string(),
            name: "Lozère".to_string(),
        })
        .unwrap();

    let bytes = catalog.departments.export_pdf("48").unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn pdf_export_paginates_long_city_lists() {
    let (catalog, store) = seeded();

    for i in 0..60 {
        CityStore::insert(
            &*store,
            CityDraft {
                name: format!("Commune {i:02}"),
                population: 1_000 + i,
                department_code: "34".to_string(),
            },
        )
        .unwrap();
    }

    let short = catalog.departments.export_pdf("75").unwrap();
    let long = catalog.departments.export_pdf("34").unwrap();
    assert!(long.starts_with(b"%PDF"));
    // 60 rows overflow the first page, so the document gains pages.
    assert!(long.len() > short.len());
}

#[test]
fn pdf_export_validates_the_department_code() {
    let (catalog, _) = seeded();
    assert!(matches!(
        catalog.departments.export_pdf("  "),
        Err(CatalogError::InvalidArgument(_))
    ));
    assert!(matches!(
        catalog.departments.export_pdf("99"),
        Err(CatalogError::NotFound(_))
    ));
}
