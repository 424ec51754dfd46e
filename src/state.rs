use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::data::aggregate::Aggregates;
use crate::data::export;
use crate::data::filter::{filter, toggle, Dimension, FilterError, FilterSpec, FilteredView};
use crate::data::loader::{DataSource, DatasetLoader, FetchError, FileSource};
use crate::data::model::Dataset;
use crate::data::normalize::normalize;
use crate::rates::{Currency, RateOutcome, RateProvider, RateSource};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState<S> {
    /// Loader for the default (remote) dataset; keeps it for the process.
    loader: DatasetLoader<Box<dyn DataSource>>,

    /// Dataset currently shown, shared with every derived view.
    pub dataset: Arc<Dataset>,

    /// Per-dimension filter selections.
    pub filters: FilterSpec,

    /// Display currency.
    pub currency: Currency,

    /// Cached exchange rates.
    rates: RateProvider<S>,

    /// Rate path of the last recomputation (live or fallback).
    pub rate_outcome: Option<RateOutcome>,

    /// Filtered + normalized rows (recomputed on every change).
    pub view: FilteredView,

    /// Metrics and chart tables for `view`.
    pub aggregates: Aggregates,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl<S: RateSource> AppState<S> {
    /// Load the default dataset and compute the initial view.
    pub fn new(
        mut loader: DatasetLoader<Box<dyn DataSource>>,
        rates: RateProvider<S>,
    ) -> Result<Self, FetchError> {
        let dataset = loader.load()?;
        let mut state = Self {
            loader,
            filters: FilterSpec::all(dataset.dimensions()),
            view: FilteredView::empty(Arc::clone(&dataset)),
            dataset,
            currency: Currency::REFERENCE,
            rates,
            rate_outcome: None,
            aggregates: Aggregates::empty(),
            status_message: None,
        };
        state.recompute();
        Ok(state)
    }

    /// Filter → normalize → aggregate for the current selections.
    pub fn recompute(&mut self) {
        let outcome = self.rates.get_rates(Currency::REFERENCE).clone();
        let rate = outcome.table().rate(self.currency);

        let view = normalize(filter(&self.dataset, &self.filters), rate);
        self.aggregates = Aggregates::compute(&view);
        self.view = view;
        self.rate_outcome = Some(outcome);
        log::debug!(
            "{} of {} records match, currency {} at {rate}",
            self.view.len(),
            self.dataset.len(),
            self.currency
        );
    }

    /// Replace the dataset, resetting filters to "everything".
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.filters = FilterSpec::all(dataset.dimensions());
        self.dataset = dataset;
        self.status_message = None;
        self.recompute();
    }

    /// Replace every selection at once; rejects values unknown to the dataset.
    pub fn set_filters(&mut self, filters: FilterSpec) -> Result<(), FilterError> {
        filters.validate(self.dataset.dimensions())?;
        self.filters = filters;
        self.recompute();
        Ok(())
    }

    pub fn set_currency(&mut self, currency: Currency) {
        if self.currency != currency {
            self.currency = currency;
            self.recompute();
        }
    }

    pub fn toggle_year(&mut self, year: i32) {
        toggle(&mut self.filters.years, &year);
        self.recompute();
    }

    /// Toggle one value of any dimension, given as its display text.
    ///
    /// Values that do not occur in the dataset are rejected and leave the
    /// filters untouched.
    pub fn toggle_value(&mut self, dimension: Dimension, value: &str) -> Result<(), FilterError> {
        let unknown = || FilterError::UnknownValue {
            dimension,
            value: value.to_string(),
        };
        let dims = self.dataset.dimensions();
        let (set, known) = match dimension {
            Dimension::Year => {
                let year = value.parse::<i32>().map_err(|_| unknown())?;
                if !dims.years.contains(&year) {
                    return Err(unknown());
                }
                self.toggle_year(year);
                return Ok(());
            }
            Dimension::Seniority => (&mut self.filters.seniorities, &dims.seniorities),
            Dimension::Contract => (&mut self.filters.contracts, &dims.contracts),
            Dimension::CompanySize => (&mut self.filters.company_sizes, &dims.company_sizes),
        };
        let value = value.to_string();
        if !known.contains(&value) {
            return Err(unknown());
        }
        toggle(set, &value);
        self.recompute();
        Ok(())
    }

    pub fn select_all(&mut self, dimension: Dimension) {
        self.filters.select_all(dimension, self.dataset.dimensions());
        self.recompute();
    }

    pub fn select_none(&mut self, dimension: Dimension) {
        self.filters.select_none(dimension);
        self.recompute();
    }

    /// Switch back to the default dataset (served from the loader's cache).
    pub fn reload_default(&mut self) {
        match self.loader.load() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load default dataset: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Load a local CSV; on failure the current dataset is kept.
    pub fn open_file(&mut self, path: &Path) {
        let mut loader = DatasetLoader::new(FileSource::new(path));
        match loader.load() {
            Ok(dataset) => {
                log::info!("Loaded {} records from {}", dataset.len(), path.display());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Write the current view to `path`.
    pub fn export_csv(&mut self, path: &Path) -> Result<()> {
        export::save_csv(&self.view, path)
            .with_context(|| format!("exporting {} rows", self.view.len()))?;
        log::info!("Exported {} rows to {}", self.view.len(), path.display());
        self.status_message = Some(format!("Saved {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::rates::{RateError, RateTable};

    const CSV: &str = "\
ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto,residencia_iso3
2020,Senior,FT,Large,Data Scientist,100000,Remote,USA
2020,Junior,FT,Small,Analyst,50000,Onsite,BRA
2021,Senior,FT,Large,Data Scientist,120000,Remote,USA
";

    struct Memory {
        fetches: Rc<Cell<usize>>,
    }

    impl DataSource for Memory {
        fn location(&self) -> String {
            "memory".to_string()
        }

        fn fetch(&self) -> Result<Vec<u8>, FetchError> {
            self.fetches.set(self.fetches.get() + 1);
            Ok(CSV.as_bytes().to_vec())
        }
    }

    struct Offline;

    impl RateSource for Offline {
        fn fetch(&self, _base: Currency) -> Result<RateTable, RateError> {
            Err(RateError::MissingQuote(Currency::Brl))
        }
    }

    fn state_with_counter() -> (AppState<Offline>, Rc<Cell<usize>>) {
        let fetches = Rc::new(Cell::new(0));
        let source: Box<dyn DataSource> = Box::new(Memory {
            fetches: Rc::clone(&fetches),
        });
        let rates = RateProvider::new(Offline, Duration::from_secs(3600));
        let state = AppState::new(DatasetLoader::new(source), rates).unwrap();
        (state, fetches)
    }

    fn state() -> AppState<Offline> {
        state_with_counter().0
    }

    #[test]
    fn starts_with_everything_selected() {
        let s = state();
        assert_eq!(s.view.len(), 3);
        assert_eq!(s.aggregates.summary.count, 3);
        assert!(s.rate_outcome.as_ref().is_some_and(RateOutcome::is_fallback));
    }

    #[test]
    fn currency_change_rescales_metrics() {
        let mut s = state();
        s.set_currency(Currency::Brl);
        assert_eq!(s.aggregates.summary.max, 120_000.0 * 5.5);
        s.set_currency(Currency::Usd);
        assert_eq!(s.aggregates.summary.max, 120_000.0);
    }

    #[test]
    fn toggles_refilter() {
        let mut s = state();
        s.toggle_year(2021);
        assert_eq!(s.view.len(), 2);
        s.toggle_value(Dimension::Seniority, "Junior").unwrap();
        assert_eq!(s.view.len(), 1);
        s.select_none(Dimension::CompanySize);
        assert!(s.aggregates.is_empty());
        s.select_all(Dimension::CompanySize);
        assert_eq!(s.view.len(), 1);
    }

    #[test]
    fn toggle_value_covers_years_and_rejects_unknown_values() {
        let mut s = state();
        assert_eq!(s.toggle_value(Dimension::Year, "2021"), Ok(()));
        assert_eq!(s.view.len(), 2);
        assert!(!s.filters.years.contains(&2021));

        for (dim, value) in [
            (Dimension::Year, "1999"),
            (Dimension::Year, "soon"),
            (Dimension::Contract, "PT"),
        ] {
            assert_eq!(
                s.toggle_value(dim, value),
                Err(FilterError::UnknownValue {
                    dimension: dim,
                    value: value.to_string(),
                })
            );
        }
        assert_eq!(s.view.len(), 2);
        assert!(s.filters.contracts.contains("FT"));
    }

    #[test]
    fn initial_view_matches_a_full_recompute() {
        let mut s = state();
        let (view_len, aggregates) = (s.view.len(), s.aggregates.clone());
        s.recompute();
        assert_eq!(s.view.len(), view_len);
        assert_eq!(s.aggregates, aggregates);
        assert_eq!(s.view.converted(), &[100_000.0, 50_000.0, 120_000.0]);
    }

    #[test]
    fn set_filters_validates_against_dataset() {
        let mut s = state();
        let mut spec = FilterSpec::all(s.dataset.dimensions());
        spec.years.insert(1999);
        assert!(s.set_filters(spec).is_err());
        assert_eq!(s.view.len(), 3);

        let mut spec = FilterSpec::all(s.dataset.dimensions());
        spec.years.remove(&2020);
        assert_eq!(s.set_filters(spec), Ok(()));
        assert_eq!(s.view.len(), 1);
    }

    #[test]
    fn default_dataset_is_fetched_once() {
        let (mut s, fetches) = state_with_counter();
        let first = Arc::clone(&s.dataset);
        s.select_none(Dimension::Year);
        s.reload_default();

        assert_eq!(fetches.get(), 1);
        assert!(Arc::ptr_eq(&first, &s.dataset));
        assert_eq!(s.view.len(), 3);
    }

    #[test]
    fn bad_local_file_keeps_current_dataset() {
        let mut s = state();
        s.open_file(Path::new("/definitely/not/here.csv"));
        assert_eq!(s.dataset.len(), 3);
        assert!(s.status_message.as_deref().is_some_and(|m| m.starts_with("Error")));
    }
}
