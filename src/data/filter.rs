use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{HouseDataset, HouseRecord};

// ---------------------------------------------------------------------------
// Filter selection: what the side panel currently has ticked
// ---------------------------------------------------------------------------

/// The user's current filter criteria. Rebuilt from the controls on every
/// interaction and never persisted.
///
/// An empty set means nothing is selected for that dimension, so nothing
/// passes. The date interval is closed; `start > end` matches no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub locations: BTreeSet<String>,
    pub house_types: BTreeSet<String>,
    pub bedrooms: BTreeSet<u32>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FilterSelection {
    /// Everything selected, full date range of the dataset.
    pub fn all(dataset: &HouseDataset) -> Self {
        let (start, end) = dataset
            .date_range
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        Self {
            locations: dataset.locations.iter().cloned().collect(),
            house_types: dataset.house_types.iter().cloned().collect(),
            bedrooms: dataset.bedrooms.iter().copied().collect(),
            start,
            end,
        }
    }

    /// Whether a single record satisfies all four predicates.
    pub fn matches(&self, record: &HouseRecord) -> bool {
        self.locations.contains(&record.location)
            && self.house_types.contains(&record.house_type)
            && self.bedrooms.contains(&record.bedrooms)
            && self.start <= record.date
            && record.date <= self.end
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Records passing the current selection, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    pub records: Vec<&'a HouseRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a HouseRecord> + '_ {
        self.records.iter().copied()
    }

    /// Apply a selection to this view again.
    #[cfg(test)]
    pub fn refilter(&self, selection: &FilterSelection) -> FilteredView<'a> {
        filter_records(self.iter(), selection)
    }
}

/// Return the records of `dataset` that pass `selection`.
pub fn filter<'a>(dataset: &'a HouseDataset, selection: &FilterSelection) -> FilteredView<'a> {
    filter_records(&dataset.records, selection)
}

/// Same predicate as [`filter`] over any sequence of records.
pub fn filter_records<'a, I>(records: I, selection: &FilterSelection) -> FilteredView<'a>
where
    I: IntoIterator<Item = &'a HouseRecord>,
{
    if selection.start > selection.end {
        return FilteredView {
            records: Vec::new(),
        };
    }
    FilteredView {
        records: records
            .into_iter()
            .filter(|rec| selection.matches(rec))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use proptest::test_runner::Config;

    use super::*;
    use crate::data::model::tests::{date, record};

    const LOCATIONS: [&str; 3] = ["Pune", "Delhi", "Goa"];
    const TYPES: [&str; 3] = ["Villa", "Apartment", "Bungalow"];

    fn sample() -> HouseDataset {
        HouseDataset::from_records(vec![
            record("Pune", "Villa", 4, 900.0, date(2021, 3, 1)),
            record("Delhi", "Apartment", 2, 300.0, date(2022, 6, 15)),
            record("Goa", "Villa", 3, 650.0, date(2023, 1, 20)),
            record("Pune", "Apartment", 2, 400.0, date(2023, 9, 9)),
        ])
    }

    #[test]
    fn default_selection_keeps_everything_in_order() {
        let ds = sample();
        let view = filter(&ds, &FilterSelection::all(&ds));
        assert_eq!(view.len(), 4);
        assert!(view
            .iter()
            .zip(&ds.records)
            .all(|(a, b)| std::ptr::eq(a, b)));
    }

    #[test]
    fn predicates_combine_with_and() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.locations = ["Pune".to_string()].into();
        sel.bedrooms = [2].into();
        let view = filter(&ds, &sel);
        assert_eq!(view.len(), 1);
        assert_eq!(view.records[0].house_type, "Apartment");
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.start = date(2022, 6, 15);
        sel.end = date(2023, 1, 20);
        let prices: Vec<f64> = filter(&ds, &sel).iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![300.0, 650.0]);
    }

    #[test]
    fn reversed_interval_is_empty() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        std::mem::swap(&mut sel.start, &mut sel.end);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn excluding_all_locations_is_empty() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.locations.clear();
        assert!(filter(&ds, &sel).is_empty());
    }

    fn arb_records() -> impl Strategy<Value = Vec<HouseRecord>> {
        prop::collection::vec(
            (0..3usize, 0..3usize, 0..6u32, 0.0..1_000_000.0f64, 0..1500i64),
            0..60,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(l, t, b, p, d)| {
                    record(
                        LOCATIONS[l],
                        TYPES[t],
                        b,
                        p,
                        date(2020, 1, 1) + chrono::Duration::days(d),
                    )
                })
                .collect()
        })
    }

    fn arb_selection() -> impl Strategy<Value = FilterSelection> {
        (
            prop::collection::btree_set(0..3usize, 0..=3),
            prop::collection::btree_set(0..3usize, 0..=3),
            prop::collection::btree_set(0..6u32, 0..=6),
            0..1500i64,
            0..1500i64,
        )
            .prop_map(|(ls, ts, bs, a, b)| FilterSelection {
                locations: ls.into_iter().map(|i| LOCATIONS[i].to_string()).collect(),
                house_types: ts.into_iter().map(|i| TYPES[i].to_string()).collect(),
                bedrooms: bs,
                start: date(2020, 1, 1) + chrono::Duration::days(a),
                end: date(2020, 1, 1) + chrono::Duration::days(b),
            })
    }

    proptest! {
        #![proptest_config(Config::with_cases(128))]
        #[test]
        fn view_is_exactly_the_matching_records(
            records in arb_records(),
            sel in arb_selection(),
        ) {
            let ds = HouseDataset::from_records(records);
            let view = filter(&ds, &sel);

            let expected: Vec<&HouseRecord> = ds
                .records
                .iter()
                .filter(|r| {
                    sel.locations.contains(&r.location)
                        && sel.house_types.contains(&r.house_type)
                        && sel.bedrooms.contains(&r.bedrooms)
                        && r.date >= sel.start
                        && r.date <= sel.end
                })
                .collect();
            prop_assert_eq!(view.len(), expected.len());
            for (a, b) in view.iter().zip(expected) {
                prop_assert!(std::ptr::eq(a, b));
            }
        }

        #[test]
        fn filtering_is_idempotent(
            records in arb_records(),
            sel in arb_selection(),
        ) {
            let ds = HouseDataset::from_records(records);
            let view = filter(&ds, &sel);
            let again = view.refilter(&sel);
            prop_assert_eq!(view.len(), again.len());
            for (a, b) in view.iter().zip(again.iter()) {
                prop_assert!(std::ptr::eq(a, b));
            }
        }
    }
}
