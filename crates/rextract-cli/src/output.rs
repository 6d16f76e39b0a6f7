//! Rendering of record sets as JSON, CSV or plain-text tables.

use rextract_core::{ExtractionResponse, RecordSet, TableRow};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text tables
    Text,
}

impl OutputFormat {
    /// File extension for written outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Which collection to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TableSelection {
    /// All three collections
    All,
    /// Invoice rows only
    Invoices,
    /// Product rows only
    Products,
    /// Customer rows only
    Customers,
}

pub fn format_records(
    records: &RecordSet,
    format: OutputFormat,
    table: TableSelection,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(records, table, pretty),
        OutputFormat::Csv => format_csv(records, table),
        OutputFormat::Text => Ok(format_text(records, table)),
    }
}

fn format_json(records: &RecordSet, table: TableSelection, pretty: bool) -> anyhow::Result<String> {
    let value = match table {
        TableSelection::All => serde_json::to_value(ExtractionResponse::from(records.clone()))?,
        TableSelection::Invoices => serde_json::to_value(&records.invoices)?,
        TableSelection::Products => serde_json::to_value(&records.products)?,
        TableSelection::Customers => serde_json::to_value(&records.customers)?,
    };

    if pretty {
        Ok(serde_json::to_string_pretty(&value)?)
    } else {
        Ok(serde_json::to_string(&value)?)
    }
}

fn format_csv(records: &RecordSet, table: TableSelection) -> anyhow::Result<String> {
    let mut sections = Vec::new();

    if matches!(table, TableSelection::All | TableSelection::Invoices) {
        sections.push(csv_section(&records.invoices)?);
    }
    if matches!(table, TableSelection::All | TableSelection::Products) {
        sections.push(csv_section(&records.products)?);
    }
    if matches!(table, TableSelection::All | TableSelection::Customers) {
        sections.push(csv_section(&records.customers)?);
    }

    Ok(sections.join("\n"))
}

fn csv_section<T: TableRow>(rows: &[T]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(T::columns().iter().map(|c| c.header))?;
    for row in rows {
        wtr.write_record(row.cells())?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &RecordSet, table: TableSelection) -> String {
    let mut sections = Vec::new();

    if matches!(table, TableSelection::All | TableSelection::Invoices) {
        sections.push(text_section(&records.invoices));
    }
    if matches!(table, TableSelection::All | TableSelection::Products) {
        sections.push(text_section(&records.products));
    }
    if matches!(table, TableSelection::All | TableSelection::Customers) {
        sections.push(text_section(&records.customers));
    }

    sections.join("\n")
}

fn text_section<T: TableRow>(rows: &[T]) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", title(T::COLLECTION)));

    if rows.is_empty() {
        output.push_str(&format!("No {} available.\n", T::COLLECTION));
        return output;
    }

    let headers: Vec<&str> = T::columns().iter().map(|c| c.header).collect();
    let cells: Vec<Vec<String>> = rows.iter().map(|r| r.cells()).collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    output.push_str(&text_line(headers.iter().copied(), &widths));
    for row in &cells {
        output.push_str(&text_line(row.iter().map(String::as_str), &widths));
    }

    output
}

fn text_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

fn title(collection: &str) -> String {
    let mut chars = collection.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rextract_core::extract_records;

    const ANSWER: &str = r#"{"invoice_number": "INV1", "customer": {"name": "Acme"}, "total": {"amount": 100}, "items": [{"description": "Widget", "quantity": 2, "rate": 10, "gst": 1, "amount": 21}]}"#;

    #[test]
    fn test_csv_single_table() {
        let records = extract_records(ANSWER);
        let csv = format_records(&records, OutputFormat::Csv, TableSelection::Products, false).unwrap();

        assert_eq!(
            csv,
            "Product Name,Quantity,Unit Price,Tax,Price with Tax\nWidget,2,10,1,21\n"
        );
    }

    #[test]
    fn test_text_empty_collection() {
        let text = format_records(
            &RecordSet::default(),
            OutputFormat::Text,
            TableSelection::Customers,
            false,
        )
        .unwrap();

        assert_eq!(text, "Customers\nNo customers available.\n");
    }

    #[test]
    fn test_text_columns_are_aligned() {
        let records = extract_records(ANSWER);
        let text = format_records(&records, OutputFormat::Text, TableSelection::Customers, false).unwrap();

        assert_eq!(
            text,
            "Customers\n\
             Customer Name  Quantity  Unit Price  Tax  Price with Tax\n\
             Acme           2         10          1    21\n"
        );
    }

    #[test]
    fn test_json_envelope() {
        let records = extract_records(ANSWER);
        let json = format_records(&records, OutputFormat::Json, TableSelection::All, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["invoices"][0]["serial"], "INV1");
        assert_eq!(value["customers"][0]["priceWithTax"], 21.0);
    }
}
