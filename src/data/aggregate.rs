//! Read-only summaries over a [`FilteredView`].
//!
//! Each function is independent of the others and recomputed from the view
//! on every pass; nothing here is cached.

use std::collections::BTreeMap;

use chrono::Datelike;

use super::filter::FilteredView;
use super::model::YearMonth;
use crate::error::DashboardError;

/// Running sum/count for a group mean.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

// ---------------------------------------------------------------------------
// Monthly average by location
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAverage {
    pub month: YearMonth,
    pub location: String,
    pub mean_price: f64,
    pub count: usize,
}

/// Mean price per (month, location), ordered by month then location.
pub fn monthly_average_by_location(view: &FilteredView<'_>) -> Vec<MonthlyAverage> {
    let mut groups: BTreeMap<(YearMonth, &str), MeanAcc> = BTreeMap::new();
    for rec in view.iter() {
        groups
            .entry((YearMonth::of(rec.date), rec.location.as_str()))
            .or_default()
            .push(rec.price);
    }
    groups
        .into_iter()
        .map(|((month, location), acc)| MonthlyAverage {
            month,
            location: location.to_string(),
            mean_price: acc.mean(),
            count: acc.count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Average by house type
// ---------------------------------------------------------------------------

pub fn average_by_house_type(view: &FilteredView<'_>) -> BTreeMap<String, f64> {
    let mut groups: BTreeMap<&str, MeanAcc> = BTreeMap::new();
    for rec in view.iter() {
        groups.entry(rec.house_type.as_str()).or_default().push(rec.price);
    }
    groups
        .into_iter()
        .map(|(ty, acc)| (ty.to_string(), acc.mean()))
        .collect()
}

// ---------------------------------------------------------------------------
// Distribution by bedroom
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BedroomPrice {
    pub bedrooms: u32,
    pub price: f64,
}

/// (bedrooms, price) pairs in view order. Quartiles are left to the chart.
pub fn distribution_by_bedroom(view: &FilteredView<'_>) -> Vec<BedroomPrice> {
    view.iter()
        .map(|rec| BedroomPrice {
            bedrooms: rec.bedrooms,
            price: rec.price,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Year-over-year growth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearlyGrowth {
    pub year: i32,
    pub mean_price: f64,
    pub growth_percent: f64,
}

/// Percent change of the yearly mean price against the previous year present
/// in the view, ascending by year.
///
/// The earliest year has no predecessor and is left out. A predecessor with
/// a zero mean is not special-cased: the growth comes out as ±∞, or NaN when
/// both years average zero.
pub fn yearly_growth(view: &FilteredView<'_>) -> Vec<YearlyGrowth> {
    let mut years: BTreeMap<i32, MeanAcc> = BTreeMap::new();
    for rec in view.iter() {
        years.entry(rec.date.year()).or_default().push(rec.price);
    }

    let means: Vec<(i32, f64)> = years
        .into_iter()
        .map(|(year, acc)| (year, acc.mean()))
        .collect();

    means
        .windows(2)
        .map(|pair| {
            let (_, prev) = pair[0];
            let (year, mean) = pair[1];
            YearlyGrowth {
                year,
                mean_price: mean,
                growth_percent: (mean - prev) / prev * 100.0,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summary scalars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSummary {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

pub fn summary(view: &FilteredView<'_>) -> Result<PriceSummary, DashboardError> {
    if view.is_empty() {
        return Err(DashboardError::EmptyAggregation);
    }
    let mut acc = MeanAcc::default();
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    for rec in view.iter() {
        acc.push(rec.price);
        max = max.max(rec.price);
        min = min.min(rec.price);
    }
    Ok(PriceSummary {
        // A long floating-point sum can land just outside [min, max].
        mean: acc.mean().clamp(min, max),
        max,
        min,
    })
}
