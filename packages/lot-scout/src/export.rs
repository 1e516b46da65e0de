//! CSV export of analysis rows.
//!
//! Text fields are always quoted and numbers never are, with absent values
//! left empty. Rows are joined with `\n` and there is no trailing newline.

use crate::types::lot::AnalysisRow;

pub const CSV_HEADER: &str =
    "Lot #,Item Title,eBay Value,My Max Bid,Current Bid,eBay Value Link,My Max Bid Link";

/// Render rows as CSV, header first.
pub fn rows_to_csv(rows: &[AnalysisRow]) -> String {
    std::iter::once(CSV_HEADER.to_string())
        .chain(rows.iter().map(csv_line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn csv_line(row: &AnalysisRow) -> String {
    [
        quote(&row.lot_number),
        quote(&row.item_title),
        optional(row.ebay_value),
        optional(row.my_max_bid),
        row.current_bid.to_string(),
        quote(&row.ebay_value_link),
        quote(&row.my_max_bid_link),
    ]
    .join(",")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn optional(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
