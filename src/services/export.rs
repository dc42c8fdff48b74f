//! Export formatters for the stored weather query records.
//!
//! Five order-preserving transforms from a flat record sequence to a
//! serialized document: JSON, CSV, XML, PDF and Markdown. Every formatter
//! produces a well-formed empty-state document for zero records.

use printpdf::{BuiltinFont, Mm, PdfDocument, PdfLayerReference};
use serde::{Deserialize, Serialize};

use crate::db::models::WeatherQuery;
use crate::errors::AppError;

/// A weather query flattened for export: dates and timestamps as strings
/// so all five formats render them identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub id: i64,
    pub location: String,
    pub date_from: String,
    pub date_to: String,
    pub output_temperature: f64,
    pub created_at: String,
    /// Skipped when absent so XML renders no element for never-updated
    /// records instead of an empty one that would read back as `Some("")`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<&WeatherQuery> for ExportRow {
    fn from(q: &WeatherQuery) -> Self {
        Self {
            id: q.id,
            location: q.location.clone(),
            date_from: q.date_from.format("%Y-%m-%d").to_string(),
            date_to: q.date_to.format("%Y-%m-%d").to_string(),
            output_temperature: q.output_temperature,
            created_at: q.created_at.to_rfc3339(),
            updated_at: q.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// XML document root: `<weather_queries>` wrapping `<weather_query>` children.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "weather_queries")]
struct XmlExport {
    #[serde(rename = "weather_query", default)]
    weather_query: Vec<ExportRow>,
}

const CSV_HEADER: [&str; 7] = [
    "id",
    "location",
    "date_from",
    "date_to",
    "output_temperature",
    "created_at",
    "updated_at",
];

/// Serialize rows as a pretty-printed JSON array. Empty input yields `[]`.
pub fn to_json(rows: &[ExportRow]) -> Result<String, AppError> {
    serde_json::to_string_pretty(rows)
        .map_err(|e| AppError::InternalError(format!("JSON export failed: {}", e)))
}

/// Serialize rows as CSV. The header row is always present, so an empty
/// record set still yields a well-formed single-line document.
pub fn to_csv(rows: &[ExportRow]) -> Result<String, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::InternalError(format!("CSV export failed: {}", e)))?;
    for row in rows {
        // Written field by field: serde serialization would drop the
        // updated_at column entirely for never-updated rows.
        writer
            .write_record([
                row.id.to_string(),
                row.location.clone(),
                row.date_from.clone(),
                row.date_to.clone(),
                row.output_temperature.to_string(),
                row.created_at.clone(),
                row.updated_at.clone().unwrap_or_default(),
            ])
            .map_err(|e| AppError::InternalError(format!("CSV export failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalError(format!("CSV export failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::InternalError(format!("CSV export failed: {}", e)))
}

/// Serialize rows as XML. Empty input yields an empty `<weather_queries/>` root.
pub fn to_xml(rows: &[ExportRow]) -> Result<String, AppError> {
    let document = XmlExport {
        weather_query: rows.to_vec(),
    };
    quick_xml::se::to_string(&document)
        .map_err(|e| AppError::InternalError(format!("XML export failed: {}", e)))
}

// PDF layout constants (A4 portrait, millimetres).
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 8.0;

/// Render rows as a paginated PDF table document.
pub fn to_pdf(rows: &[ExportRow]) -> Result<Vec<u8>, AppError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Weather Queries Export",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::InternalError(format!("PDF export failed: {}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::InternalError(format!("PDF export failed: {}", e)))?;

    let mut layer: PdfLayerReference = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    layer.use_text("Weather Queries Export", 18.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= 2.0 * LINE_HEIGHT_MM;

    if rows.is_empty() {
        layer.use_text("No data to export", 11.0, Mm(MARGIN_MM), Mm(y), &font);
    } else {
        layer.use_text(
            "ID | Location | Date From | Date To | Temperature",
            11.0,
            Mm(MARGIN_MM),
            Mm(y),
            &bold,
        );
        y -= LINE_HEIGHT_MM;

        for row in rows {
            if y < MARGIN_MM {
                let (page, page_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            let line = format!(
                "{} | {} | {} | {} | {}",
                row.id, row.location, row.date_from, row.date_to, row.output_temperature
            );
            layer.use_text(line, 11.0, Mm(MARGIN_MM), Mm(y), &font);
            y -= LINE_HEIGHT_MM;
        }
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::InternalError(format!("PDF export failed: {}", e)))
}

/// Render rows as a Markdown pipe table under an H1 heading.
pub fn to_markdown(rows: &[ExportRow]) -> String {
    if rows.is_empty() {
        return "# Weather Queries Export\n\nNo data to export.\n".to_string();
    }

    let mut md = String::from("# Weather Queries Export\n\n");
    md.push_str("| ID | Location | Date From | Date To | Temperature |\n");
    md.push_str("|----|----------|-----------|---------|-------------|\n");

    for row in rows {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            row.id, row.location, row.date_from, row.date_to, row.output_temperature
        ));
    }

    md
}
