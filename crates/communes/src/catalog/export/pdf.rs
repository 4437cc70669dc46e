use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use super::{group_thousands, ExportError};
use crate::catalog::domain::{City, Department};
use crate::catalog::service::CatalogError;
use crate::catalog::store::{CityStore, DepartmentStore};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 7.0;

const TITLE_SIZE: f32 = 18.0;
const HEADER_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

// Helvetica metrics are not embedded; approximate glyph advance for the
// centering and right-alignment math. Points to millimetres is 0.352778.
const PT_TO_MM: f32 = 0.352_778;
const AVG_GLYPH_RATIO: f32 = 0.5;

/// Render a department fact sheet: title, metadata block, and a
/// two-column city table (population right-aligned, thousands grouped).
///
/// Resolution of the department is the only recoverable failure; any
/// generation error afterwards is fatal.
pub fn department_pdf<D, S>(
    departments: &D,
    cities: &S,
    code: &str,
) -> Result<Vec<u8>, CatalogError>
where
    D: DepartmentStore + ?Sized,
    S: CityStore + ?Sized,
{
    let code = code.trim();
    if code.is_empty() {
        return Err(CatalogError::InvalidArgument(
            "department code must not be blank".to_string(),
        ));
    }

    let department = departments.find_by_code(code)?.ok_or_else(|| {
        CatalogError::NotFound(format!("department with code '{code}' not found"))
    })?;
    let rows = cities.by_department_code(code)?;

    let bytes = render(&department, &rows).map_err(CatalogError::Export)?;
    Ok(bytes)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

fn render(department: &Department, cities: &[City]) -> Result<Vec<u8>, ExportError> {
    let title = format!("Département {}", department.name);
    let (doc, page, layer) = PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");

    let fonts = Fonts {
        regular: builtin(&doc, BuiltinFont::Helvetica)?,
        bold: builtin(&doc, BuiltinFont::HelveticaBold)?,
        mono: builtin(&doc, BuiltinFont::Courier)?,
    };

    let mut layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - 30.0;

    // Centered document title.
    let title_x = (PAGE_WIDTH - text_width(&title, TITLE_SIZE)) / 2.0;
    layer.use_text(&title, TITLE_SIZE, Mm(title_x.max(MARGIN)), Mm(y), &fonts.bold);
    y -= 2.0 * LINE_HEIGHT;

    // Department metadata block.
    layer.use_text(
        format!("Code du département : {}", department.code),
        HEADER_SIZE,
        Mm(MARGIN),
        Mm(y),
        &fonts.regular,
    );
    y -= LINE_HEIGHT;
    layer.use_text(
        format!("Nom du département : {}", department.name),
        HEADER_SIZE,
        Mm(MARGIN),
        Mm(y),
        &fonts.regular,
    );
    y -= 2.0 * LINE_HEIGHT;

    layer.use_text("Liste des villes", HEADER_SIZE, Mm(MARGIN), Mm(y), &fonts.bold);
    y -= LINE_HEIGHT;

    if cities.is_empty() {
        layer.use_text(
            "Aucune ville trouvée pour ce département.",
            BODY_SIZE,
            Mm(MARGIN),
            Mm(y),
            &fonts.regular,
        );
        return doc
            .save_to_bytes()
            .map_err(|err| ExportError::Pdf(err.to_string()));
    }

    write_row(&layer, &fonts, y, "Nom de la ville", "Population", true);
    y -= LINE_HEIGHT;

    let mut page_number = 1;
    for city in cities {
        if y < MARGIN {
            page_number += 1;
            let (next_page, next_layer) =
                doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {page_number}"));
            layer = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT - MARGIN;
        }
        write_row(
            &layer,
            &fonts,
            y,
            &city.name,
            &group_thousands(city.population),
            false,
        );
        y -= LINE_HEIGHT;
    }

    doc.save_to_bytes()
        .map_err(|err| ExportError::Pdf(err.to_string()))
}

fn write_row(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    y: f32,
    name: &str,
    population: &str,
    header: bool,
) {
    let name_font = if header { &fonts.bold } else { &fonts.regular };
    layer.use_text(name, BODY_SIZE, Mm(MARGIN), Mm(y), name_font);

    // Courier is fixed-pitch (0.6 em), which makes the right edge exact.
    let width = population.chars().count() as f32 * BODY_SIZE * 0.6 * PT_TO_MM;
    let x = PAGE_WIDTH - MARGIN - width;
    layer.use_text(population, BODY_SIZE, Mm(x), Mm(y), &fonts.mono);
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_RATIO * PT_TO_MM
}

fn builtin(
    doc: &printpdf::PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, ExportError> {
    doc.add_builtin_font(font)
        .map_err(|err| ExportError::Pdf(err.to_string()))
}
