use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{generate_palette, ValueScale};
use crate::data::aggregate::{Aggregates, HistogramBin};
use crate::format::{compact, money};
use crate::rates::Currency;

const CHART_HEIGHT: f32 = 300.0;
const HISTOGRAM_BLUE: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);
const TREND_GREEN: Color32 = Color32::from_rgb(0x2c, 0xa0, 0x2c);

fn salary_axis(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    compact(mark.value)
}

/// Yellow notice drawn in place of a chart with nothing to show.
pub fn no_data(ui: &mut Ui, what: &str) {
    ui.colored_label(Color32::from_rgb(0xe0, 0xa0, 0x00), format!("⚠ No data to show {what}."));
}

// ---------------------------------------------------------------------------
// Top roles (horizontal bars, lowest at the bottom)
// ---------------------------------------------------------------------------

pub fn top_roles(ui: &mut Ui, agg: &Aggregates, currency: Currency) {
    ui.strong(format!("Top 10 roles by average salary ({currency})"));
    if agg.top_roles.is_empty() {
        no_data(ui, "in the roles chart");
        return;
    }

    let scale = ValueScale::viridis_like(agg.top_roles.iter().map(|(_, m)| *m));
    // Ascending for display: the best paid role ends up on top.
    let ascending: Vec<&(String, f64)> = agg.top_roles.iter().rev().collect();
    let bars: Vec<Bar> = ascending
        .iter()
        .enumerate()
        .map(|(i, (role, mean))| {
            Bar::new(i as f64, *mean)
                .name(format!("{role}: {}", money(*mean, currency)))
                .fill(scale.color_for(*mean))
                .width(0.7)
        })
        .collect();
    let labels: Vec<String> = ascending.iter().map(|(role, _)| role.clone()).collect();

    Plot::new("top_roles")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(salary_axis)
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

// ---------------------------------------------------------------------------
// Salary distribution
// ---------------------------------------------------------------------------

pub fn histogram(ui: &mut Ui, bins: &[HistogramBin], currency: Currency) {
    ui.strong(format!("Annual salary distribution ({currency})"));
    if bins.is_empty() {
        no_data(ui, "in the histogram");
        return;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!(
                    "{} – {}",
                    money(b.start, currency),
                    money(b.end, currency)
                ))
        })
        .collect();

    Plot::new("salary_histogram")
        .height(CHART_HEIGHT)
        .x_axis_formatter(salary_axis)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(HISTOGRAM_BLUE));
        });
}

// ---------------------------------------------------------------------------
// Work-mode share
// ---------------------------------------------------------------------------

pub fn work_modes(ui: &mut Ui, agg: &Aggregates, currency: Currency) {
    ui.strong("Share of work modes");
    if agg.work_mode_counts.is_empty() {
        no_data(ui, "in the work-mode chart");
        return;
    }

    let total: usize = agg.work_mode_counts.iter().map(|(_, n)| n).sum();
    let colors = generate_palette(agg.work_mode_counts.len());

    Plot::new("work_modes")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, ((mode, n), color)) in agg.work_mode_counts.iter().zip(colors).enumerate() {
                let pct = 100.0 * *n as f64 / total as f64;
                let mean = agg
                    .work_mode_mean
                    .iter()
                    .find(|(m, _)| m == mode)
                    .map(|(_, mean)| money(*mean, currency))
                    .unwrap_or_default();
                let label = format!("{mode} ({pct:.1}%, avg {mean})");
                let bar = Bar::new(i as f64, *n as f64).width(0.7).name(&label);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(label).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Mean salary per year
// ---------------------------------------------------------------------------

pub fn yearly_trend(ui: &mut Ui, agg: &Aggregates, currency: Currency) {
    ui.strong(format!("📈 Average salary per year ({currency})"));
    if agg.year_mean.is_empty() {
        no_data(ui, "in the yearly trend");
        return;
    }

    let points = || -> PlotPoints {
        agg.year_mean
            .iter()
            .map(|(year, mean)| [*year as f64, *mean])
            .collect()
    };

    Plot::new("yearly_trend")
        .height(CHART_HEIGHT)
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            if mark.value.fract() == 0.0 {
                format!("{:.0}", mark.value)
            } else {
                String::new()
            }
        })
        .y_axis_formatter(salary_axis)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points()).color(TREND_GREEN).width(2.0));
            plot_ui.points(Points::new(points()).color(TREND_GREEN).radius(4.0));
        });
}
