use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::model::{Dataset, DimensionValues, Record};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per dimension
// ---------------------------------------------------------------------------

/// The four filterable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Year,
    Seniority,
    Contract,
    CompanySize,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Year,
        Dimension::Seniority,
        Dimension::Contract,
        Dimension::CompanySize,
    ];

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Year => "Year",
            Dimension::Seniority => "Seniority",
            Dimension::Contract => "Contract type",
            Dimension::CompanySize => "Company size",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("{dimension} value '{value}' does not occur in the dataset")]
    UnknownValue { dimension: Dimension, value: String },
}

/// Allowed values per dimension. An empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub years: BTreeSet<i32>,
    pub seniorities: BTreeSet<String>,
    pub contracts: BTreeSet<String>,
    pub company_sizes: BTreeSet<String>,
}

impl FilterSpec {
    /// Every value of every dimension selected (show everything).
    pub fn all(dims: &DimensionValues) -> Self {
        FilterSpec {
            years: dims.years.clone(),
            seniorities: dims.seniorities.clone(),
            contracts: dims.contracts.clone(),
            company_sizes: dims.company_sizes.clone(),
        }
    }

    /// Whether `record` passes every dimension.
    pub fn matches(&self, record: &Record) -> bool {
        self.years.contains(&record.year)
            && self.seniorities.contains(&record.seniority)
            && self.contracts.contains(&record.contract)
            && self.company_sizes.contains(&record.company_size)
    }

    /// Reject selections that do not occur in the dataset.
    pub fn validate(&self, dims: &DimensionValues) -> Result<(), FilterError> {
        if let Some(year) = self.years.difference(&dims.years).next() {
            return Err(FilterError::UnknownValue {
                dimension: Dimension::Year,
                value: year.to_string(),
            });
        }
        let text_dims = [
            (Dimension::Seniority, &self.seniorities, &dims.seniorities),
            (Dimension::Contract, &self.contracts, &dims.contracts),
            (Dimension::CompanySize, &self.company_sizes, &dims.company_sizes),
        ];
        for (dimension, selected, known) in text_dims {
            if let Some(value) = selected.difference(known).next() {
                return Err(FilterError::UnknownValue {
                    dimension,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// Selected / total counts, for the sidebar headers.
    pub fn counts(&self, dimension: Dimension, dims: &DimensionValues) -> (usize, usize) {
        match dimension {
            Dimension::Year => (self.years.len(), dims.years.len()),
            Dimension::Seniority => (self.seniorities.len(), dims.seniorities.len()),
            Dimension::Contract => (self.contracts.len(), dims.contracts.len()),
            Dimension::CompanySize => (self.company_sizes.len(), dims.company_sizes.len()),
        }
    }

    /// Select every known value of one dimension.
    pub fn select_all(&mut self, dimension: Dimension, dims: &DimensionValues) {
        match dimension {
            Dimension::Year => self.years = dims.years.clone(),
            Dimension::Seniority => self.seniorities = dims.seniorities.clone(),
            Dimension::Contract => self.contracts = dims.contracts.clone(),
            Dimension::CompanySize => self.company_sizes = dims.company_sizes.clone(),
        }
    }

    /// Deselect every value of one dimension.
    pub fn select_none(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Year => self.years.clear(),
            Dimension::Seniority => self.seniorities.clear(),
            Dimension::Contract => self.contracts.clear(),
            Dimension::CompanySize => self.company_sizes.clear(),
        }
    }
}

/// Insert `value` if absent, remove it if present.
pub fn toggle<T: Ord + Clone>(set: &mut BTreeSet<T>, value: &T) {
    if !set.remove(value) {
        set.insert(value.clone());
    }
}

// ---------------------------------------------------------------------------
// FilteredView – matching rows plus the converted-salary column
// ---------------------------------------------------------------------------

/// Rows of a [`Dataset`] that passed a [`FilterSpec`], in dataset order.
///
/// `converted[i]` is the display-currency salary of row `indices[i]`; a fresh
/// view starts in the reference currency (rate 1.0).
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Arc<Dataset>,
    indices: Vec<usize>,
    pub(crate) converted: Vec<f64>,
}

impl FilteredView {
    /// A view with no rows, before any filter has run.
    pub fn empty(dataset: Arc<Dataset>) -> Self {
        FilteredView {
            dataset,
            indices: Vec::new(),
            converted: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate `(record, converted salary)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = (&Record, f64)> + '_ {
        let records = self.dataset.records();
        self.indices
            .iter()
            .zip(&self.converted)
            .map(move |(&i, &c)| (&records[i], c))
    }

    /// Row `n` of the view.
    pub fn row(&self, n: usize) -> Option<(&Record, f64)> {
        let i = *self.indices.get(n)?;
        Some((&self.dataset.records()[i], self.converted[n]))
    }

    pub fn converted(&self) -> &[f64] {
        &self.converted
    }
}

/// Keep the records that pass every dimension of `spec`.
pub fn filter(dataset: &Arc<Dataset>, spec: &FilterSpec) -> FilteredView {
    let (indices, converted): (Vec<usize>, Vec<f64>) = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| spec.matches(r))
        .map(|(i, r)| (i, r.base_salary))
        .unzip();

    FilteredView {
        dataset: Arc::clone(dataset),
        indices,
        converted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures;

    #[test]
    fn full_spec_is_identity() {
        let ds = Arc::new(fixtures::three_records());
        let spec = FilterSpec::all(ds.dimensions());
        let view = filter(&ds, &spec);

        assert_eq!(view.len(), ds.len());
        let rows: Vec<&Record> = view.rows().map(|(r, _)| r).collect();
        let all: Vec<&Record> = ds.records().iter().collect();
        assert_eq!(rows, all);
    }

    #[test]
    fn any_empty_dimension_matches_nothing() {
        let ds = Arc::new(fixtures::three_records());
        for dim in Dimension::ALL {
            let mut spec = FilterSpec::all(ds.dimensions());
            spec.select_none(dim);
            assert!(filter(&ds, &spec).is_empty(), "{dim} emptied");
        }
    }

    #[test]
    fn dimensions_combine_with_and() {
        let ds = Arc::new(fixtures::three_records());
        let mut spec = FilterSpec::all(ds.dimensions());
        spec.years = BTreeSet::from([2020]);
        spec.seniorities = BTreeSet::from(["Senior".to_string()]);

        let view = filter(&ds, &spec);
        assert_eq!(view.len(), 1);
        let (record, converted) = view.row(0).unwrap();
        assert_eq!(record.base_salary, 100_000.0);
        assert_eq!(converted, 100_000.0);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut set = BTreeSet::from([1, 2]);
        toggle(&mut set, &2);
        toggle(&mut set, &3);
        assert_eq!(set, BTreeSet::from([1, 3]));
    }

    #[test]
    fn validate_rejects_unknown_values() {
        let ds = fixtures::three_records();
        let mut spec = FilterSpec::all(ds.dimensions());
        assert_eq!(spec.validate(ds.dimensions()), Ok(()));

        spec.company_sizes.insert("Huge".to_string());
        assert_eq!(
            spec.validate(ds.dimensions()),
            Err(FilterError::UnknownValue {
                dimension: Dimension::CompanySize,
                value: "Huge".to_string(),
            })
        );
    }
}
