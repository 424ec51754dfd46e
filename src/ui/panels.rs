use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::EXPORT_FILE_NAME;
use crate::data::filter::{Dimension, FilterSpec};
use crate::format::thousands;
use crate::rates::{Currency, RateOutcome, RateSource};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel<S: RateSource>(ui: &mut Ui, state: &mut AppState<S>) {
    ui.heading("🔍 Filters");
    ui.separator();

    // Clone what we need so we can mutate state inside the loop.
    let dims = state.dataset.dimensions().clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Currency selector ----
            ui.strong("💱 Currency");
            let mut currency = state.currency;
            egui::ComboBox::from_id_salt("currency")
                .selected_text(currency.code())
                .show_ui(ui, |ui: &mut Ui| {
                    for c in Currency::ALL {
                        ui.selectable_value(&mut currency, c, c.code());
                    }
                });
            state.set_currency(currency);
            ui.separator();

            if ui.button("Reset filters").clicked() {
                if let Err(e) = state.set_filters(FilterSpec::all(&dims)) {
                    log::error!("Failed to reset filters: {e}");
                }
            }

            // ---- Per-dimension filter widgets (collapsible) ----
            for dim in Dimension::ALL {
                let (n_selected, n_total) = state.filters.counts(dim, &dims);
                let header_text = format!("{dim}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(dim);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(dim);
                            }
                        });

                        if dim == Dimension::Year {
                            for &year in &dims.years {
                                let mut checked = state.filters.years.contains(&year);
                                if ui.checkbox(&mut checked, year.to_string()).changed() {
                                    state.toggle_year(year);
                                }
                            }
                            return;
                        }

                        let (values, selected) = match dim {
                            Dimension::Seniority => (&dims.seniorities, &state.filters.seniorities),
                            Dimension::Contract => (&dims.contracts, &state.filters.contracts),
                            _ => (&dims.company_sizes, &state.filters.company_sizes),
                        };
                        // Collect first; toggling needs `state` mutably.
                        let rows: Vec<(String, bool)> = values
                            .iter()
                            .map(|v| (v.clone(), selected.contains(v)))
                            .collect();
                        for (value, mut checked) in rows {
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                if let Err(e) = state.toggle_value(dim, &value) {
                                    log::error!("Failed to toggle filter: {e}");
                                }
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar<S: RateSource>(ui: &mut Ui, state: &mut AppState<S>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Default dataset").clicked() {
                state.reload_default();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("💾 Export filtered CSV…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} records loaded, {} visible",
            thousands(state.dataset.len() as u64),
            thousands(state.view.len() as u64)
        ));

        ui.separator();

        if let Some(outcome) = &state.rate_outcome {
            rate_status(ui, outcome);
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

/// "Live" or "Default" rates label; hovering lists the quotes in use.
fn rate_status(ui: &mut Ui, outcome: &RateOutcome) {
    let table = outcome.table();
    let quotes = table
        .iter()
        .filter(|(c, _)| *c != table.base())
        .map(|(c, rate)| format!("1 {} = {rate:.4} {c}", table.base()))
        .collect::<Vec<_>>()
        .join("\n");

    let label = if outcome.is_fallback() {
        RichText::new("Default exchange rates").color(Color32::YELLOW)
    } else {
        RichText::new("Live exchange rates")
    };
    let mut hover = quotes;
    if let RateOutcome::FellBack { reason, .. } = outcome {
        hover.push_str(&format!("\n\nLive rates unavailable: {reason}"));
    }
    ui.label(label).on_hover_text(hover);
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog<S: RateSource>(state: &mut AppState<S>) {
    let file = rfd::FileDialog::new()
        .set_title("Open salary data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(&path);
    }
}

pub fn save_file_dialog<S: RateSource>(state: &mut AppState<S>) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_csv(&path) {
            log::error!("Failed to export CSV: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
