use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ValueScale;
use crate::data::aggregate::{Aggregates, MAP_ROLE};
use crate::data::filter::FilteredView;
use crate::format::{money, thousands};
use crate::rates::Currency;
use crate::ui::plot::no_data;

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).heading().strong());
    });
}

pub fn metrics(ui: &mut Ui, agg: &Aggregates, currency: Currency) {
    let s = &agg.summary;
    ui.columns(4, |cols| {
        metric(&mut cols[0], "💰 Average salary", money(s.mean, currency));
        metric(&mut cols[1], "🏆 Highest salary", money(s.max, currency));
        metric(&mut cols[2], "📊 Records", thousands(s.count as u64));
        metric(&mut cols[3], "👔 Most frequent role", s.top_role.clone());
    });
}

// ---------------------------------------------------------------------------
// Mean salary per country
// ---------------------------------------------------------------------------

pub fn countries(ui: &mut Ui, agg: &Aggregates, currency: Currency) {
    ui.strong(format!("Average {MAP_ROLE} salary by country ({currency})"));
    if agg.is_empty() {
        no_data(ui, "in the country breakdown");
        return;
    }
    if agg.country_mean.is_empty() {
        no_data(ui, &format!("for {MAP_ROLE}"));
        return;
    }

    let scale = ValueScale::red_to_green(agg.country_mean.iter().map(|(_, m)| *m));
    ui.push_id("country_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(300.0)
            .column(Column::auto().at_least(80.0))
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("Country");
                });
                header.col(|ui| {
                    ui.strong("Average salary");
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, agg.country_mean.len(), |mut row| {
                    let (iso3, mean) = &agg.country_mean[row.index()];
                    row.col(|ui| {
                        ui.label(iso3.as_str());
                    });
                    row.col(|ui| {
                        let text = RichText::new(money(*mean, currency));
                        ui.label(text.color(scale.color_for(*mean)));
                    });
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Detailed rows
// ---------------------------------------------------------------------------

const DETAIL_HEADERS: [&str; 9] = [
    "Year",
    "Seniority",
    "Contract",
    "Company size",
    "Role",
    "USD",
    "Remote",
    "Country",
    "Converted",
];

pub fn detail(ui: &mut Ui, view: &FilteredView, currency: Currency) {
    ui.strong("📋 Detailed data");
    if view.is_empty() {
        no_data(ui, "in the table");
        return;
    }

    ui.push_id("detail_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(400.0)
            .columns(Column::auto().at_least(60.0), DETAIL_HEADERS.len() - 1)
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                for title in DETAIL_HEADERS {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, view.len(), |mut row| {
                    let Some((r, converted)) = view.row(row.index()) else {
                        return;
                    };
                    let cells = [
                        r.year.to_string(),
                        r.seniority.clone(),
                        r.contract.clone(),
                        r.company_size.clone(),
                        r.role.clone(),
                        money(r.base_salary, Currency::REFERENCE),
                        r.remote.clone(),
                        r.residence_iso3.clone().unwrap_or_default(),
                        money(converted, currency),
                    ];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
