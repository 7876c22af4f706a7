use std::collections::BTreeMap;

use crate::data::aggregate::{
    average_by_house_type, distribution_by_bedroom, monthly_average_by_location, summary,
    yearly_growth, BedroomPrice, MonthlyAverage, PriceSummary, YearlyGrowth,
};
use crate::data::filter::{filter, FilterSelection, FilteredView};
use crate::data::model::HouseDataset;
use crate::error::DashboardError;

/// Everything the central panel draws for one selection.
#[derive(Debug, Clone)]
pub struct RenderModel<'a> {
    pub view: FilteredView<'a>,
    pub monthly: Vec<MonthlyAverage>,
    pub by_type: BTreeMap<String, f64>,
    pub distribution: Vec<BedroomPrice>,
    pub growth: Vec<YearlyGrowth>,
    pub summary: PriceSummary,
}

/// Filter the dataset and compute every summary the dashboard shows.
///
/// Returns [`DashboardError::NoMatchingData`] without running any aggregator
/// when the selection matches nothing.
pub fn render<'a>(
    dataset: &'a HouseDataset,
    selection: &FilterSelection,
) -> Result<RenderModel<'a>, DashboardError> {
    let view = filter(dataset, selection);
    if view.is_empty() {
        return Err(DashboardError::NoMatchingData);
    }

    Ok(RenderModel {
        monthly: monthly_average_by_location(&view),
        by_type: average_by_house_type(&view),
        distribution: distribution_by_bedroom(&view),
        growth: yearly_growth(&view),
        summary: summary(&view)?,
        view,
    })
}
