use std::rc::Rc;

use crate::color::ColorMap;
use crate::data::filter::FilterSelection;
use crate::data::model::HouseDataset;
use crate::data::source::DataSource;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Category colours
// ---------------------------------------------------------------------------

/// One colour per distinct location / house type / bedroom count, fixed for
/// the lifetime of the dataset.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    pub locations: ColorMap<String>,
    pub house_types: ColorMap<String>,
    pub bedrooms: ColorMap<u32>,
}

impl CategoryColors {
    pub fn new(dataset: &HouseDataset) -> Self {
        Self {
            locations: ColorMap::new(&dataset.locations),
            house_types: ColorMap::new(&dataset.house_types),
            bedrooms: ColorMap::new(&dataset.bedrooms),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Memoized handle to the source file.
    pub source: DataSource,

    /// Current filter controls.
    pub selection: FilterSelection,

    pub colors: CategoryColors,
}

impl AppState {
    /// Load the dataset and initialise the controls to "everything".
    pub fn new(source: DataSource) -> Result<Self, DashboardError> {
        let dataset = source.load()?;
        if dataset.is_empty() {
            log::warn!("{} contains no records", source.path().display());
        }
        Ok(Self {
            selection: FilterSelection::all(&dataset),
            colors: CategoryColors::new(&dataset),
            source,
        })
    }

    /// The cached dataset.
    pub fn dataset(&self) -> Result<Rc<HouseDataset>, DashboardError> {
        self.source.load()
    }

    /// Restore the default selection.
    pub fn reset_selection(&mut self, dataset: &HouseDataset) {
        self.selection = FilterSelection::all(dataset);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::Builder;

    use super::*;
    use crate::data::model::tests::date;

    #[test]
    fn new_state_selects_everything() {
        let mut tmp = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(
            tmp,
            "location,house_type,bedrooms,price,date\n\
             Pune,Villa,3,100,2022-01-01\n\
             Goa,Flat,2,50,2023-06-30\n"
        )
        .unwrap();

        let mut state = AppState::new(DataSource::new(tmp.path())).unwrap();
        assert_eq!(state.selection.locations.len(), 2);
        assert_eq!(state.selection.start, date(2022, 1, 1));
        assert_eq!(state.selection.end, date(2023, 6, 30));

        state.selection.bedrooms.clear();
        let dataset = state.dataset().unwrap();
        state.reset_selection(&dataset);
        assert_eq!(state.selection.bedrooms.len(), 2);
    }

    #[test]
    fn new_state_reports_missing_file() {
        let result = AppState::new(DataSource::new("/nonexistent/house_prices.csv"));
        assert!(matches!(result, Err(DashboardError::DataUnavailable { .. })));
    }
}
