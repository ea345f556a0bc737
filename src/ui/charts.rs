use std::ops::RangeInclusive;

use eframe::egui::{Align2, RichText, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, GridMark, HLine, Legend, LineStyle, Plot, PlotPoint,
    Points, Text,
};

use ftth_viewer::config::FIGURE_TITLE;
use ftth_viewer::data::model::OntStatus;
use ftth_viewer::data::views::ChartViews;

use crate::color::{StatusColors, BAR_FILL};
use crate::state::AppState;

/// Vertical room reserved for each chart's caption.
const CAPTION_HEIGHT: f32 = 24.0;
const MIN_CHART_HEIGHT: f32 = 120.0;

/// How far above a margin bar its RX annotation sits, in dB.
const ANNOTATION_OFFSET_DB: f64 = 1.0;

// ---------------------------------------------------------------------------
// 2×2 chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the figure title and the four charts.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new(FIGURE_TITLE).strong());
    });
    ui.add_space(4.0);

    let gap = ui.spacing().item_spacing.y;
    let height = ((ui.available_height() - 2.0 * CAPTION_HEIGHT - gap) / 2.0).max(MIN_CHART_HEIGHT);
    let views = &state.views;

    ui.columns(2, |cols: &mut [Ui]| {
        power_histogram(&mut cols[0], views, height);
        power_vs_distance(&mut cols[1], views, &state.colors, height);
    });
    ui.columns(2, |cols: &mut [Ui]| {
        faults_per_splitter(&mut cols[0], views, height);
        worst_margins(&mut cols[1], views, height);
    });
}

// ---------------------------------------------------------------------------
// Top-left: received power histogram
// ---------------------------------------------------------------------------

fn power_histogram(ui: &mut Ui, views: &ChartViews, height: f32) {
    ui.strong(format!(
        "RX power distribution (excluding DOWN, n = {})",
        views.powered_count
    ));

    let width = views.histogram.bin_width();
    let bars: Vec<Bar> = views
        .histogram
        .bins()
        .map(|(center, count)| {
            Bar::new(center, count as f64)
                .width(width)
                .fill(BAR_FILL)
        })
        .collect();

    Plot::new("rx_histogram")
        .height(height)
        .x_axis_label("RX power [dBm]")
        .y_axis_label("ONT count")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("ONTs"));
        });
}

// ---------------------------------------------------------------------------
// Top-right: RX power vs distance, one series per status
// ---------------------------------------------------------------------------

fn power_vs_distance(ui: &mut Ui, views: &ChartViews, colors: &StatusColors, height: f32) {
    ui.strong("RX power vs distance (by status)");

    let rxmin = views.rxmin_dbm;

    Plot::new("rx_vs_distance")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Total distance [km]")
        .y_axis_label("RX power [dBm]")
        .show(ui, |plot_ui| {
            for status in OntStatus::ALL {
                let points = views.scatter.get(status).to_vec();
                plot_ui.points(
                    Points::new(points)
                        .name(status.as_str())
                        .color(colors.color_for(status))
                        .radius(3.0),
                );
            }
            plot_ui.hline(
                HLine::new(rxmin)
                    .name(format!("RXmin = {rxmin:.1} dBm"))
                    .style(LineStyle::dashed_loose())
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Bottom-left: FAIL + DOWN per splitter
// ---------------------------------------------------------------------------

fn faults_per_splitter(ui: &mut Ui, views: &ChartViews, height: f32) {
    ui.strong("Faulty ONTs per splitter");

    let bars: Vec<Bar> = views
        .faults
        .iter()
        .enumerate()
        .map(|(i, f)| {
            Bar::new(i as f64, f.bad as f64)
                .width(0.6)
                .name(&f.label)
                .fill(BAR_FILL)
        })
        .collect();
    let labels: Vec<String> = views.faults.iter().map(|f| f.label.clone()).collect();

    Plot::new("faults_per_splitter")
        .height(height)
        .x_axis_label("Splitter")
        .y_axis_label("FAIL + DOWN")
        .include_y(0.0)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("FAIL + DOWN"));
        });
}

// ---------------------------------------------------------------------------
// Bottom-right: worst terminals by margin
// ---------------------------------------------------------------------------

fn worst_margins(ui: &mut Ui, views: &ChartViews, height: f32) {
    ui.strong(format!("TOP {} worst ONTs (by margin)", views.top_n));

    let bars: Vec<Bar> = views
        .worst
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let name = match &w.path {
                Some(path) => format!("{} – {path}", w.label),
                None => w.label.clone(),
            };
            Bar::new(i as f64, w.margin_db)
                .width(0.6)
                .name(name)
                .fill(BAR_FILL)
        })
        .collect();
    let labels: Vec<String> = views.worst.iter().map(|w| w.label.clone()).collect();

    Plot::new("worst_margins")
        .height(height)
        .x_axis_label("ONT")
        .y_axis_label("Margin [dB] (RX - RXmin)")
        .include_y(0.0)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Margin"));
            for (i, w) in views.worst.iter().enumerate() {
                let anchor = PlotPoint::new(i as f64, w.margin_db + ANNOTATION_OFFSET_DB);
                plot_ui.text(Text::new(anchor, w.rx_text()).anchor(Align2::CENTER_BOTTOM));
            }
        });
}

// ---------------------------------------------------------------------------
// Categorical x axis
// ---------------------------------------------------------------------------

/// Label for a grid mark sitting exactly on a bar index.
fn category_label(labels: &[String], value: f64) -> Option<&str> {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return None;
    }
    labels.get(idx as usize).map(String::as_str)
}

fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        category_label(&labels, mark.value)
            .unwrap_or_default()
            .to_string()
    }
}
