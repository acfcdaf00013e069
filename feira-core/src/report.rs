//! CSV report over a shopping list.
//!
//! ## Layout
//!
//! ```text
//! Nome do Item;Quantidade;Valor Unitário (R$);Valor Total (R$)
//! Rice;2,00;5,50;11,00
//! Soap;1,00;3,25;3,25
//!
//! TOTAL GERAL;;;R$ 14,25
//! ```
//!
//! * `;` separates fields; a field is quoted only when it contains `;`, a
//!   quote or a line break.
//! * Every number has exactly two decimals and a `,` separator.
//! * [`Report::total_formatted`] is the grand total with a `.` separator
//!   (`"14.25"`), unlike the comma-formatted total inside the CSV body.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::{format_two_places, format_two_places_comma};
use crate::list::total_of;
use crate::models::Item;

/// Currency prefix on the grand-total row.
const CURRENCY_PREFIX: &str = "R$";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// Column and total-row labels of the CSV body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLabels {
    pub name: String,
    pub quantity: String,
    pub unit_price: String,
    pub total: String,
    pub grand_total: String,
}

impl ReportLabels {
    /// Brazilian Portuguese labels used by default.
    pub fn portuguese() -> Self {
        Self {
            name: "Nome do Item".to_string(),
            quantity: "Quantidade".to_string(),
            unit_price: "Valor Unitário (R$)".to_string(),
            total: "Valor Total (R$)".to_string(),
            grand_total: "TOTAL GERAL".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            name: "Item Name".to_string(),
            quantity: "Quantity".to_string(),
            unit_price: "Unit Price".to_string(),
            total: "Total".to_string(),
            grand_total: "TOTAL".to_string(),
        }
    }

    fn header(&self) -> [&str; 4] {
        [&self.name, &self.quantity, &self.unit_price, &self.total]
    }
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self::portuguese()
    }
}

/// Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub csv_text: String,
    pub total: Decimal,
    pub total_formatted: String,
}

/// Builds the report with the default labels.
pub fn generate_report(items: &[Item]) -> Result<Report, ReportError> {
    generate_report_with(items, &ReportLabels::default())
}

/// Builds the report with custom labels. Pure; performs no I/O.
pub fn generate_report_with(
    items: &[Item],
    labels: &ReportLabels,
) -> Result<Report, ReportError> {
    let total = total_of(items);

    let mut body = csv_writer(Vec::new());
    body.write_record(labels.header())?;
    for item in items {
        body.write_record([
            item.name().to_string(),
            format_two_places_comma(item.quantity()),
            format_two_places_comma(item.unit_price()),
            format_two_places_comma(item.total()),
        ])?;
    }
    let mut buffer = into_buffer(body)?;

    // Blank separator line before the grand-total row.
    buffer.push(b'\n');

    let mut footer = csv_writer(buffer);
    footer.write_record([
        labels.grand_total.clone(),
        String::new(),
        String::new(),
        format!("{CURRENCY_PREFIX} {}", format_two_places_comma(total)),
    ])?;
    let buffer = into_buffer(footer)?;

    let csv_text = String::from_utf8(buffer).map_err(|e| ReportError::Buffer(e.to_string()))?;

    Ok(Report {
        csv_text,
        total,
        total_formatted: format_two_places(total),
    })
}

fn csv_writer(buffer: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .has_headers(false)
        .from_writer(buffer)
}

fn into_buffer(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ReportError> {
    writer
        .into_inner()
        .map_err(|e| ReportError::Buffer(e.error().to_string()))
}
