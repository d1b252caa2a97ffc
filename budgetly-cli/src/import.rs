//! Bulk expense import from CSV exports.
//!
//! Expected header: `date,amount,category,description`, dates as
//! YYYY-MM-DD. Rows with an unparseable date or a non-positive amount are
//! skipped rather than failing the whole file.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;

/// One row parsed from a CSV file, not yet assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedExpense {
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub expense_date: NaiveDate,
}

pub fn parse_expense_csv(path: impl AsRef<Path>) -> Result<Vec<ImportedExpense>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_expense_reader(file)
}

pub fn parse_expense_reader(reader: impl Read) -> Result<Vec<ImportedExpense>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers().context("reading CSV header")?.clone();
    let col = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
    let date_col = col("date").context("CSV is missing a 'date' column")?;
    let amount_col = col("amount").context("CSV is missing an 'amount' column")?;
    let category_col = col("category").context("CSV is missing a 'category' column")?;
    let description_col = col("description");

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;

        let date = match record
            .get(date_col)
            .map(str::trim)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        {
            Some(d) => d,
            None => continue, // skip unparseable rows
        };

        let amount: f64 = record
            .get(amount_col)
            .unwrap_or("0")
            .trim()
            .replace(',', "")
            .parse()
            .unwrap_or(0.0);
        if amount <= 0.0 {
            continue;
        }

        let category = record.get(category_col).unwrap_or("").trim().to_string();
        if category.is_empty() || category.len() > 50 {
            continue;
        }

        let description = description_col
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        out.push(ImportedExpense {
            amount,
            category,
            description,
            expense_date: date,
        });
    }

    Ok(out)
}
