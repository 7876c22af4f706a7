use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, LineStyle, Plot,
    PlotPoints, Points,
};

use crate::color::teal_scale;
use crate::dashboard::RenderModel;
use crate::data::aggregate::{BedroomPrice, PriceSummary, YearlyGrowth};
use crate::data::model::{HouseDataset, YearMonth};
use crate::state::CategoryColors;

const PLOT_HEIGHT: f32 = 300.0;

/// Draw every chart of the dashboard, top to bottom.
pub fn dashboard(ui: &mut Ui, dataset: &HouseDataset, model: &RenderModel<'_>, colors: &CategoryColors) {
    section(ui, "Price Trend Over Time");
    price_trend(ui, dataset, model, colors);

    section(ui, "Month-wise Average Price by Location");
    monthly_trend(ui, dataset, model, colors);

    section(ui, "Average Price by House Type");
    type_bars(ui, &model.by_type, colors);

    section(ui, "Price Distribution by Bedrooms");
    bedroom_boxes(ui, &model.distribution, colors);

    section(ui, "Year-wise Price Growth (%)");
    growth_bars(ui, &model.growth);

    section(ui, "Key Metrics");
    kpis(ui, &model.summary);

    ui.add_space(8.0);
    egui::CollapsingHeader::new(RichText::new("View Filtered Data").strong())
        .id_salt("filtered_data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            super::table::records_table(ui, &model.view);
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(title);
    ui.separator();
}

/// Label only the integral grid marks that index into `labels`.
fn index_label(labels: &[String], mark: &GridMark) -> String {
    let idx = mark.value.round();
    if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Price trend: one line per location × house type
// ---------------------------------------------------------------------------

fn line_style(house_type_idx: usize) -> LineStyle {
    match house_type_idx % 4 {
        0 => LineStyle::Solid,
        1 => LineStyle::dashed_loose(),
        2 => LineStyle::dotted_dense(),
        _ => LineStyle::dashed_dense(),
    }
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn price_trend(ui: &mut Ui, dataset: &HouseDataset, model: &RenderModel<'_>, colors: &CategoryColors) {
    let type_idx: HashMap<&str, usize> = dataset
        .house_types
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();

    let mut series: BTreeMap<(&str, &str), Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for rec in model.view.iter() {
        series
            .entry((rec.location.as_str(), rec.house_type.as_str()))
            .or_default()
            .push((rec.date, rec.price));
    }

    Plot::new("price_trend")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .x_axis_label("Date")
        .y_axis_label("Price (₹)")
        .x_axis_formatter(|mark, _range| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for ((location, house_type), mut points) in series {
                points.sort_by_key(|(date, _)| *date);
                let color = colors.locations.color_for(location);
                let style = line_style(type_idx.get(house_type).copied().unwrap_or(0));
                let name = format!("{location} · {house_type}");
                let xy: Vec<[f64; 2]> = points
                    .iter()
                    .map(|(date, price)| [day_number(*date), *price])
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::from(xy.clone()))
                        .name(&name)
                        .color(color)
                        .style(style)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(xy))
                        .name(&name)
                        .color(color)
                        .radius(2.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Monthly average per location
// ---------------------------------------------------------------------------

fn monthly_trend(ui: &mut Ui, dataset: &HouseDataset, model: &RenderModel<'_>, colors: &CategoryColors) {
    // `model.monthly` is sorted by month, so the first-seen order is chronological.
    let mut months: Vec<YearMonth> = Vec::new();
    for m in &model.monthly {
        if months.last() != Some(&m.month) {
            months.push(m.month);
        }
    }
    let labels: Vec<String> = months.iter().map(|m| m.to_string()).collect();

    Plot::new("monthly_trend")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .x_axis_label("Month")
        .y_axis_label("Average Price (₹)")
        .x_axis_formatter(move |mark, _range| index_label(&labels, &mark))
        .show(ui, |plot_ui| {
            for location in &dataset.locations {
                let xy: Vec<[f64; 2]> = model
                    .monthly
                    .iter()
                    .filter(|m| &m.location == location)
                    .filter_map(|m| {
                        let x = months.iter().position(|month| *month == m.month)?;
                        Some([x as f64, m.mean_price])
                    })
                    .collect();
                if xy.is_empty() {
                    continue;
                }
                let color = colors.locations.color_for(location.as_str());
                plot_ui.line(
                    Line::new(PlotPoints::from(xy.clone()))
                        .name(location)
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(xy))
                        .name(location)
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Average price per house type
// ---------------------------------------------------------------------------

fn type_bars(ui: &mut Ui, by_type: &BTreeMap<String, f64>, colors: &CategoryColors) {
    let labels: Vec<String> = by_type.keys().cloned().collect();

    Plot::new("type_bars")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .x_axis_label("House Type")
        .y_axis_label("Average Price (₹)")
        .x_axis_formatter(move |mark, _range| index_label(&labels, &mark))
        .show(ui, |plot_ui| {
            for (i, (house_type, mean)) in by_type.iter().enumerate() {
                let color = colors.house_types.color_for(house_type.as_str());
                let bar = Bar::new(i as f64, *mean)
                    .name(format!("{house_type}: {}", compact(*mean)))
                    .fill(color)
                    .width(0.6);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(house_type).color(color));
            }
        });
}

/// Two significant figures with an SI suffix, e.g. `5.4M`.
pub fn compact(v: f64) -> String {
    let (scaled, suffix) = match v.abs() {
        a if a >= 1e9 => (v / 1e9, "G"),
        a if a >= 1e6 => (v / 1e6, "M"),
        a if a >= 1e3 => (v / 1e3, "k"),
        _ => (v, ""),
    };
    let digits = if scaled.abs() >= 10.0 { 0 } else { 1 };
    format!("{scaled:.digits$}{suffix}")
}

// ---------------------------------------------------------------------------
// Price distribution per bedroom count
// ---------------------------------------------------------------------------

/// Five-number summary plus whiskers, as a box plot draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest value within 1.5 × IQR below Q1.
    pub lower_whisker: f64,
    /// Highest value within 1.5 × IQR above Q3.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Quantile with linear interpolation between order statistics.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let fence = 1.5 * (q3 - q1);
    let (lo_fence, hi_fence) = (q1 - fence, q3 + fence);

    let mut lower_whisker = f64::INFINITY;
    let mut upper_whisker = f64::NEG_INFINITY;
    let mut outliers = Vec::new();
    for &v in &sorted {
        if (lo_fence..=hi_fence).contains(&v) {
            lower_whisker = lower_whisker.min(v);
            upper_whisker = upper_whisker.max(v);
        } else {
            outliers.push(v);
        }
    }

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

fn bedroom_boxes(ui: &mut Ui, distribution: &[BedroomPrice], colors: &CategoryColors) {
    let mut by_bedroom: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for pair in distribution {
        by_bedroom.entry(pair.bedrooms).or_default().push(pair.price);
    }

    Plot::new("bedroom_boxes")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .x_axis_label("Bedrooms")
        .y_axis_label("Price (₹)")
        .show(ui, |plot_ui| {
            for (bedrooms, prices) in &by_bedroom {
                let Some(stats) = box_stats(prices) else {
                    continue;
                };
                let color = colors.bedrooms.color_for(bedrooms);
                let name = format!("{bedrooms} bedrooms");
                let x = *bedrooms as f64;

                let spread = BoxSpread::new(
                    stats.lower_whisker,
                    stats.q1,
                    stats.median,
                    stats.q3,
                    stats.upper_whisker,
                );
                plot_ui.box_plot(
                    BoxPlot::new(vec![BoxElem::new(x, spread).name(&name).box_width(0.5)])
                        .name(&name)
                        .color(color),
                );

                if !stats.outliers.is_empty() {
                    let xy: Vec<[f64; 2]> = stats.outliers.iter().map(|&p| [x, p]).collect();
                    plot_ui.points(
                        Points::new(PlotPoints::from(xy))
                            .name(&name)
                            .color(color)
                            .radius(2.0),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Year-over-year growth
// ---------------------------------------------------------------------------

fn growth_bars(ui: &mut Ui, growth: &[YearlyGrowth]) {
    if growth.is_empty() {
        ui.label(RichText::new("At least two years are needed to show growth.").weak());
        return;
    }

    let finite = growth.iter().map(|g| g.growth_percent).filter(|v| v.is_finite());
    let lo = finite.clone().fold(f64::INFINITY, f64::min);
    let hi = finite.fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };

    let undefined: Vec<String> = growth
        .iter()
        .filter(|g| !g.growth_percent.is_finite())
        .map(|g| g.year.to_string())
        .collect();
    if !undefined.is_empty() {
        ui.label(
            RichText::new(format!(
                "Growth undefined for {} (previous year averages zero).",
                undefined.join(", ")
            ))
            .weak(),
        );
    }

    let bars: Vec<Bar> = growth
        .iter()
        .filter(|g| g.growth_percent.is_finite())
        .map(|g| {
            let t = ((g.growth_percent - lo) / span) as f32;
            Bar::new(g.year as f64, g.growth_percent)
                .name(g.year)
                .fill(teal_scale(t))
                .width(0.6)
        })
        .collect();

    Plot::new("growth_bars")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .x_axis_label("Year")
        .y_axis_label("Growth (%)")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("growth %")
                    .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
                        format!("{}: {:.2}%", bar.name, bar.value)
                    })),
            );
        });
}

// ---------------------------------------------------------------------------
// KPI metrics
// ---------------------------------------------------------------------------

/// Truncate to whole rupees and group thousands: `₹ 1,234,567`.
pub fn format_rupees(v: f64) -> String {
    let whole = v.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if whole < 0 { "-" } else { "" };
    format!("₹ {sign}{grouped}")
}

fn kpis(ui: &mut Ui, summary: &PriceSummary) {
    ui.columns(3, |cols| {
        kpi(&mut cols[0], "Average Price", summary.mean);
        kpi(&mut cols[1], "Maximum Price", summary.max);
        kpi(&mut cols[2], "Minimum Price", summary.min);
    });
}

fn kpi(ui: &mut Ui, title: &str, value: f64) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(title).weak());
        ui.label(
            RichText::new(format_rupees(value))
                .size(26.0)
                .strong()
                .color(Color32::from_rgb(0x2a, 0x9d, 0x8f)),
        );
    });
}
