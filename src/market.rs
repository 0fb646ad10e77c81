//! Aggregations over market price records: averages, price stability,
//! regional volume and CSV export.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub crop: String,
    pub region: String,
    /// Price per unit in local currency.
    pub price: f64,
    pub volume: f64,
    /// ISO-8601 date as reported by the backend.
    pub date: String,
}

pub fn average_price(records: &[PriceRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let sum: f64 = records.iter().map(|r| r.price).sum();
    Some(sum / records.len() as f64)
}

/// Price stability score in `0..=100`; higher means less price variation.
///
/// `100 - 100 * stddev / mean` over the population variance, clamped.
/// Returns `None` for no records or a non-positive mean.
pub fn price_stability(records: &[PriceRecord]) -> Option<f64> {
    let mean = average_price(records)?;
    if mean <= 0.0 {
        return None;
    }
    let variance = records
        .iter()
        .map(|r| (r.price - mean).powi(2))
        .sum::<f64>()
        / records.len() as f64;
    let cv = variance.sqrt() / mean;
    Some((100.0 - cv * 100.0).clamp(0.0, 100.0))
}

pub fn volume_by_region(records: &[PriceRecord]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.region.clone()).or_insert(0.0) += record.volume;
    }
    totals
}

pub fn to_csv(records: &[PriceRecord]) -> String {
    let mut out = String::from("crop,region,price,volume,date\n");
    for r in records {
        let fields = [
            csv_field(&r.crop),
            csv_field(&r.region),
            r.price.to_string(),
            r.volume.to_string(),
            csv_field(&r.date),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}
