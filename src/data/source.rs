use std::path::{Path, PathBuf};
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use super::loader::load_file;
use super::model::HouseDataset;
use crate::error::DashboardError;

/// Handle to the source file that reads it at most once.
///
/// The first successful [`DataSource::load`] parses the file; later calls
/// hand out the same `Rc` without touching the filesystem. Failures are not
/// cached, so a retry re-reads the file.
#[derive(Debug)]
pub struct DataSource {
    path: PathBuf,
    dataset: OnceCell<Rc<HouseDataset>>,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dataset: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Rc<HouseDataset>, DashboardError> {
        self.dataset
            .get_or_try_init(|| {
                let dataset = load_file(&self.path)?;
                log::info!(
                    "Loaded {} records from {} ({} locations, {} house types, dates {:?})",
                    dataset.len(),
                    self.path.display(),
                    dataset.locations.len(),
                    dataset.house_types.len(),
                    dataset.date_range,
                );
                Ok(Rc::new(dataset))
            })
            .cloned()
    }

    /// Whether the file has already been read.
    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::Builder;

    use super::*;

    #[test]
    fn load_is_memoized() {
        let mut tmp = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(
            tmp,
            "location,house_type,bedrooms,price,date\nPune,Villa,3,100,2022-01-01\n"
        )
        .unwrap();

        let source = DataSource::new(tmp.path());
        assert!(!source.is_loaded());
        let first = source.load().unwrap();

        // The cached dataset survives the file disappearing.
        let path = tmp.path().to_path_buf();
        tmp.close().unwrap();
        assert!(!path.exists());

        let second = source.load().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let source = DataSource::new("/nonexistent/house_prices.csv");
        assert!(matches!(
            source.load(),
            Err(DashboardError::DataUnavailable { .. })
        ));
        assert!(!source.is_loaded());
    }
}
