use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// YearMonth – calendar month truncation of a date
// ---------------------------------------------------------------------------

/// A calendar month. Orders chronologically and displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// HouseRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single house sale.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseRecord {
    pub location: String,
    pub house_type: String,
    pub bedrooms: u32,
    /// Sale price, finite and non-negative.
    pub price: f64,
    pub date: NaiveDate,
}

// ---------------------------------------------------------------------------
// HouseDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All loaded records plus the distinct values the filter controls offer.
#[derive(Debug, Clone)]
pub struct HouseDataset {
    /// Records in file order.
    pub records: Vec<HouseRecord>,
    /// Distinct locations in order of first appearance.
    pub locations: Vec<String>,
    /// Distinct house types in order of first appearance.
    pub house_types: Vec<String>,
    /// Distinct bedroom counts, ascending.
    pub bedrooms: Vec<u32>,
    /// Earliest and latest sale date (`None` for an empty dataset).
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl HouseDataset {
    /// Build the control indices from the loaded records.
    pub fn from_records(records: Vec<HouseRecord>) -> Self {
        let mut locations: Vec<String> = Vec::new();
        let mut house_types: Vec<String> = Vec::new();
        let mut bedrooms: BTreeSet<u32> = BTreeSet::new();
        let mut date_range: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            if !locations.contains(&rec.location) {
                locations.push(rec.location.clone());
            }
            if !house_types.contains(&rec.house_type) {
                house_types.push(rec.house_type.clone());
            }
            bedrooms.insert(rec.bedrooms);
            date_range = Some(match date_range {
                None => (rec.date, rec.date),
                Some((lo, hi)) => (lo.min(rec.date), hi.max(rec.date)),
            });
        }

        HouseDataset {
            records,
            locations,
            house_types,
            bedrooms: bedrooms.into_iter().collect(),
            date_range,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
