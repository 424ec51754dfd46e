//! egui rendering. Reads [`AppState`](crate::state::AppState), never computes aggregates.

pub mod dashboard;
pub mod panels;
pub mod plot;
pub mod tables;
