//! Inventory reports: CSV and paginated A4 PDF.
//!
//! Both formats read the store once, top to bottom, through
//! [`ItemStore::for_each_export_row`]. Exports never modify the inventory.
//! A failed export is logged; a partially written file may remain.

use crate::database::ItemStore;
use crate::error::{InventoryError, Result};
use crate::models::{ExportRow, EXPORT_HEADERS};
use printpdf::*;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const REPORT_TITLE: &str = "Inventory Report";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MM: f32 = 15.0;
const TOP_MM: f32 = 280.0;
const BOTTOM_MM: f32 = 20.0;
const ROW_HEIGHT_MM: f32 = 7.0;
const LINE_HEIGHT_MM: f32 = 4.0;
const BODY_FONT_SIZE: f32 = 9.0;

/// Left edge (mm) and characters per wrapped line of each table column
const COLUMNS: [(f32, usize); 5] = [
    (LEFT_MM, 30),
    (70.0, 24),
    (112.0, 10),
    (132.0, 22),
    (172.0, 10),
];

/// Output format of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Pdf,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Pdf => "pdf",
        }
    }

    /// Infers the format from the file extension, if it names one.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// Appends `.csv` / `.pdf` unless the path already ends with it.
    pub fn ensure_extension(&self, path: &Path) -> PathBuf {
        if Self::from_path(path) == Some(*self) {
            return path.to_path_buf();
        }
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(self.extension());
        PathBuf::from(name)
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "pdf" => Ok(ReportFormat::Pdf),
            _ => Err(InventoryError::UnknownFormat(s.to_string())),
        }
    }
}

/// Renders the inventory held by a store. Borrows the store; never closes it.
pub struct ReportExporter<'a> {
    store: &'a ItemStore,
}

impl<'a> ReportExporter<'a> {
    pub fn new(store: &'a ItemStore) -> Self {
        Self { store }
    }

    /// Writes the report to `path` in the given format. Returns `false` on failure.
    pub fn export(&self, format: ReportFormat, path: &Path) -> bool {
        match format {
            ReportFormat::Csv => self.export_csv(path),
            ReportFormat::Pdf => self.export_pdf(path),
        }
    }

    /// Writes a CSV report to `path`, replacing any existing file.
    pub fn export_csv(&self, path: &Path) -> bool {
        if !self.store_ready() {
            return false;
        }
        let result = File::create(path)
            .map_err(InventoryError::from)
            .and_then(|file| self.write_csv(BufWriter::new(file)));
        log_outcome(ReportFormat::Csv, path, result)
    }

    /// Writes a paginated A4 PDF report to `path`.
    pub fn export_pdf(&self, path: &Path) -> bool {
        if !self.store_ready() {
            return false;
        }
        log_outcome(ReportFormat::Pdf, path, self.write_pdf(path))
    }

    fn store_ready(&self) -> bool {
        if !self.store.is_open() {
            log::warn!("Cannot export report: inventory store is not open");
            return false;
        }
        true
    }

    /// Serializes every row as CSV with a fixed header line.
    ///
    /// Fields containing commas, quotes or line breaks are quoted.
    /// Returns the number of data rows written.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(EXPORT_HEADERS)?;
        let count = self.store.for_each_export_row(|row| {
            wtr.serialize(&row)?;
            Ok(())
        })?;
        wtr.flush()?;
        Ok(count)
    }

    /// Builds the PDF in memory and saves it to `path`. Returns the row count.
    ///
    /// Cells longer than their column wrap onto extra lines; nothing is cut.
    /// The built-in Helvetica font only covers Latin-1, so `Ω` is written as
    /// `Ohm`, Greek `μ` as `µ`, `€` as `EUR`, and any other character
    /// outside that range as `?`. Use the CSV or HTML output when the exact
    /// text matters.
    pub fn write_pdf(&self, path: &Path) -> Result<usize> {
        let rows = self.collect_rows()?;

        let (doc, page, layer) = PdfDocument::new(
            REPORT_TITLE,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let mut layer = doc.get_page(page).get_layer(layer);
        let mut y = TOP_MM;

        layer.use_text(REPORT_TITLE, 18.0, Mm(LEFT_MM), Mm(y), &font_bold);
        y -= 10.0;
        layer.use_text(
            format!("Total items: {}", rows.len()),
            11.0,
            Mm(LEFT_MM),
            Mm(y),
            &font,
        );
        y -= 12.0;
        y = draw_table_header(&layer, &font_bold, y);

        for row in &rows {
            let cells: Vec<Vec<String>> = row_cells(row)
                .iter()
                .zip(COLUMNS)
                .map(|(cell, (_, width))| wrap_cell(&pdf_text(cell), width))
                .collect();
            let line_count = cells.iter().map(Vec::len).max().unwrap_or(1);
            let row_height = ROW_HEIGHT_MM + (line_count - 1) as f32 * LINE_HEIGHT_MM;

            if y - row_height + ROW_HEIGHT_MM < BOTTOM_MM {
                let (next_page, next_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(next_page).get_layer(next_layer);
                y = draw_table_header(&layer, &font_bold, TOP_MM);
            }
            for (lines, (x, _)) in cells.iter().zip(COLUMNS) {
                for (i, line) in lines.iter().enumerate() {
                    let line_y = y - i as f32 * LINE_HEIGHT_MM;
                    layer.use_text(line.as_str(), BODY_FONT_SIZE, Mm(x), Mm(line_y), &font);
                }
            }
            y -= row_height;
        }

        let file = File::create(path)?;
        doc.save(&mut BufWriter::new(file)).map_err(pdf_error)?;
        Ok(rows.len())
    }

    /// HTML rendering of the report: title, total line and one table.
    pub fn render_html(&self) -> Result<String> {
        let rows = self.collect_rows()?;

        let mut html = String::from("<html><head><meta charset=\"UTF-8\"></head><body>");
        html.push_str(&format!("<h1>{}</h1>", REPORT_TITLE));
        html.push_str(&format!("<p>Total items: {}</p>", rows.len()));
        html.push_str("<table border=\"1\" cellspacing=\"0\" cellpadding=\"4\"><tr>");
        for header in EXPORT_HEADERS {
            html.push_str(&format!("<th>{}</th>", header));
        }
        html.push_str("</tr>");
        for row in &rows {
            html.push_str("<tr>");
            for cell in row_cells(row) {
                html.push_str(&format!("<td>{}</td>", escape_html(&cell)));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table></body></html>");
        Ok(html)
    }

    fn collect_rows(&self) -> Result<Vec<ExportRow>> {
        let mut rows = Vec::new();
        self.store.for_each_export_row(|row| {
            rows.push(row);
            Ok(())
        })?;
        Ok(rows)
    }
}

fn log_outcome(format: ReportFormat, path: &Path, result: Result<usize>) -> bool {
    match result {
        Ok(count) => {
            log::info!(
                "Exported {} item(s) as {} to {}",
                count,
                format,
                path.display()
            );
            true
        }
        Err(e) => {
            log::error!("Failed to export {} report to {}: {}", format, path.display(), e);
            false
        }
    }
}

fn pdf_error(err: impl fmt::Display) -> InventoryError {
    InventoryError::Pdf(err.to_string())
}

fn draw_table_header(layer: &PdfLayerReference, font: &IndirectFontRef, y: f32) -> f32 {
    for (header, (x, _)) in EXPORT_HEADERS.iter().zip(COLUMNS) {
        layer.use_text(*header, 10.0, Mm(x), Mm(y), font);
    }
    let underline = y - 2.0;
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(LEFT_MM), Mm(underline)), false),
            (Point::new(Mm(PAGE_WIDTH_MM - LEFT_MM), Mm(underline)), false),
        ],
        is_closed: false,
    });
    y - ROW_HEIGHT_MM - 1.0
}

fn row_cells(row: &ExportRow) -> [String; 5] {
    [
        row.name.clone(),
        row.category.clone(),
        row.quantity.to_string(),
        row.location.clone(),
        row.acquired_on.clone(),
    ]
}

/// Splits `text` into lines of at most `max_chars`, breaking at whitespace
/// and splitting words that are longer than a whole line.
fn wrap_cell(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Maps text onto what the built-in Latin-1 PDF fonts can draw
fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{03A9}' | '\u{2126}' => out.push_str("Ohm"),
            '\u{03BC}' => out.push('\u{00B5}'),
            '\u{20AC}' => out.push_str("EUR"),
            c if (c as u32) < 0x100 && !c.is_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
