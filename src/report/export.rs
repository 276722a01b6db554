use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;

use super::OverviewRow;
use crate::error::Result;

pub const CSV_HEADERS: [&str; 12] = [
    "Room",
    "Tenant",
    "Rent Status",
    "Rent Amount",
    "Rent Paid",
    "Rent Balance",
    "Units Consumed",
    "Electricity Amount",
    "Electricity Paid",
    "Electricity Balance",
    "Electricity Status",
    "Notes",
];

/// Write one quoted CSV line per row, header first.
pub fn write_csv<W: Write>(writer: W, rows: &[OverviewRow]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    wtr.write_record(CSV_HEADERS)?;
    for row in rows {
        wtr.write_record([
            row.room_number.clone(),
            row.tenant_name.clone(),
            row.rent_status.as_str().to_string(),
            row.rent_due.to_string(),
            row.rent_paid.to_string(),
            row.rent_balance.to_string(),
            row.units_consumed.to_string(),
            row.electricity_due.to_string(),
            row.electricity_paid.to_string(),
            row.electricity_balance.to_string(),
            row.electricity_status.as_str().to_string(),
            row.notes.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
