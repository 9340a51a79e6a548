//! CSV export of the filtered lead list.
//!
//! Output matches the download the web UI produced: a fixed header line,
//! UTF-8, every data field double-quoted with embedded quotes doubled,
//! missing optionals as empty fields and a missing lead score as 0.

use crate::types::Business;
use anyhow::Result;
use chrono::NaiveDate;

pub const CSV_HEADER: &str = "Name,Lead Score,Rating,Reviews,Website,Phone,Address";

/// Serialize businesses in their current order to CSV bytes.
pub fn write_leads_csv(rows: &[&Business]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(CSV_HEADER.len() + rows.len() * 64);
    out.extend_from_slice(CSV_HEADER.as_bytes());
    out.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .has_headers(false)
        .from_writer(&mut out);

    for business in rows {
        writer.write_record([
            business.name.clone(),
            business.lead_score.to_string(),
            business.rating.map(|r| r.to_string()).unwrap_or_default(),
            business
                .review_count
                .map(|c| c.to_string())
                .unwrap_or_default(),
            business.website.clone().unwrap_or_default(),
            business.phone.clone().unwrap_or_default(),
            business.address.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    drop(writer);
    Ok(out)
}

/// Download filename for an export on the given date: `leads_<ISO-date>.csv`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("leads_{}.csv", date.format("%Y-%m-%d"))
}

/// Filename for an export made right now (UTC).
pub fn export_filename_today() -> String {
    export_filename(chrono::Utc::now().date_naive())
}
