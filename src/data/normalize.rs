use super::filter::FilteredView;

/// Overwrite the converted-salary column with `base_salary * rate`.
///
/// Any rate is accepted; zero or negative rates give degenerate values.
pub fn normalize(mut view: FilteredView, rate: f64) -> FilteredView {
    let converted: Vec<f64> = view.rows().map(|(r, _)| r.base_salary * rate).collect();
    view.converted = converted;
    view
}
