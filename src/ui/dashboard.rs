use eframe::egui::{ScrollArea, Ui};

use crate::rates::RateSource;
use crate::state::AppState;
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Central panel: metrics, charts, table
// ---------------------------------------------------------------------------

/// Render the main dashboard in the central panel.
pub fn dashboard<S: RateSource>(ui: &mut Ui, state: &AppState<S>) {
    let agg = &state.aggregates;
    let currency = state.currency;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("🎲 Data Salary Dashboard");
            ui.label("Explore salaries in the data field over recent years. Use the filters on the left to refine the analysis.");
            ui.add_space(8.0);

            ui.strong(format!("📌 Overall metrics (annual salary in {currency})"));
            tables::metrics(ui, agg, currency);
            ui.separator();

            ui.columns(2, |cols| {
                plot::top_roles(&mut cols[0], agg, currency);
                plot::histogram(&mut cols[1], &agg.histogram, currency);
            });
            ui.columns(2, |cols| {
                plot::work_modes(&mut cols[0], agg, currency);
                tables::countries(&mut cols[1], agg, currency);
            });
            ui.separator();

            // The trend section is hidden entirely when nothing matches.
            if !agg.is_empty() {
                plot::yearly_trend(ui, agg, currency);
                ui.separator();
            }

            tables::detail(ui, &state.view, currency);
        });
}
