use std::collections::BTreeSet;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Record – one row of the salary CSV
// ---------------------------------------------------------------------------

/// One salary observation. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: i32,
    pub seniority: String,
    pub contract: String,
    pub company_size: String,
    pub role: String,
    /// Annual salary in the reference currency (USD).
    pub base_salary: f64,
    /// Work mode: remote, on-site or hybrid.
    pub remote: String,
    pub residence_iso3: Option<String>,
}

/// A CSV row as it appears on disk; the salary may be missing.
/// Field names are the source headers.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRecord {
    #[serde(rename = "ano")]
    pub year: String,
    #[serde(rename = "senioridade")]
    pub seniority: String,
    #[serde(rename = "contrato")]
    pub contract: String,
    #[serde(rename = "tamanho_empresa")]
    pub company_size: String,
    #[serde(rename = "cargo")]
    pub role: String,
    #[serde(rename = "usd")]
    pub base_salary: Option<f64>,
    #[serde(rename = "remoto")]
    pub remote: String,
    #[serde(rename = "residencia_iso3", default)]
    pub residence_iso3: Option<String>,
}

/// Why a [`RawRecord`] did not become a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Rejected {
    /// Salary missing, non-finite or negative; the row is skipped.
    NoSalary,
    /// `ano` is not a year; the row is malformed.
    InvalidYear(String),
}

impl RawRecord {
    pub(crate) fn into_record(self) -> Result<Record, Rejected> {
        let Some(year) = parse_year(&self.year) else {
            return Err(Rejected::InvalidYear(self.year));
        };
        let base_salary = self
            .base_salary
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or(Rejected::NoSalary)?;
        Ok(Record {
            year,
            seniority: self.seniority,
            contract: self.contract,
            company_size: self.company_size,
            role: self.role,
            base_salary,
            remote: self.remote,
            residence_iso3: self.residence_iso3.filter(|c| !c.is_empty()),
        })
    }
}

/// Years are sometimes written with a trailing `.0` by dataframe exports.
fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    s.strip_suffix(".0").unwrap_or(s).parse().ok()
}

// ---------------------------------------------------------------------------
// DimensionValues – distinct values of every filterable column
// ---------------------------------------------------------------------------

/// Sorted distinct values per filterable dimension, computed once at load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionValues {
    pub years: BTreeSet<i32>,
    pub seniorities: BTreeSet<String>,
    pub contracts: BTreeSet<String>,
    pub company_sizes: BTreeSet<String>,
}

impl DimensionValues {
    fn from_records(records: &[Record]) -> Self {
        let mut dims = DimensionValues::default();
        for r in records {
            dims.years.insert(r.year);
            dims.seniorities.insert(r.seniority.clone());
            dims.contracts.insert(r.contract.clone());
            dims.company_sizes.insert(r.company_size.clone());
        }
        dims
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    dimensions: DimensionValues,
}

impl Dataset {
    /// Build the dimension index from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let dimensions = DimensionValues::from_records(&records);
        Dataset {
            records,
            dimensions,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn dimensions(&self) -> &DimensionValues {
        &self.dimensions
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(
        year: i32,
        seniority: &str,
        size: &str,
        role: &str,
        usd: f64,
        remote: &str,
        iso3: Option<&str>,
    ) -> Record {
        Record {
            year,
            seniority: seniority.to_string(),
            contract: "FT".to_string(),
            company_size: size.to_string(),
            role: role.to_string(),
            base_salary: usd,
            remote: remote.to_string(),
            residence_iso3: iso3.map(str::to_string),
        }
    }

    /// The three-record dataset used across the pipeline tests.
    pub fn three_records() -> Dataset {
        Dataset::from_records(vec![
            record(2020, "Senior", "Large", "Data Scientist", 100_000.0, "Remote", Some("USA")),
            record(2020, "Junior", "Small", "Analyst", 50_000.0, "Onsite", Some("BRA")),
            record(2021, "Senior", "Large", "Data Scientist", 120_000.0, "Remote", Some("USA")),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_are_distinct_and_sorted() {
        let ds = fixtures::three_records();
        let dims = ds.dimensions();
        assert_eq!(dims.years.iter().copied().collect::<Vec<_>>(), vec![2020, 2021]);
        assert_eq!(
            dims.seniorities.iter().cloned().collect::<Vec<_>>(),
            vec!["Junior".to_string(), "Senior".to_string()]
        );
        assert_eq!(dims.contracts.len(), 1);
        assert_eq!(dims.company_sizes.len(), 2);
    }

    fn raw(year: &str, usd: Option<f64>) -> RawRecord {
        RawRecord {
            year: year.to_string(),
            seniority: "Senior".to_string(),
            contract: "FT".to_string(),
            company_size: "Large".to_string(),
            role: "Analyst".to_string(),
            base_salary: usd,
            remote: "Remote".to_string(),
            residence_iso3: Some(String::new()),
        }
    }

    #[test]
    fn accepts_float_years_and_blank_country() {
        let record = raw(" 2024.0", Some(0.0)).into_record().unwrap();
        assert_eq!(record.year, 2024);
        assert_eq!(record.base_salary, 0.0);
        assert_eq!(record.residence_iso3, None);
    }

    #[test]
    fn rejects_unusable_salaries() {
        for usd in [None, Some(-5000.0), Some(f64::NAN), Some(f64::INFINITY)] {
            assert_eq!(raw("2020", usd).into_record(), Err(Rejected::NoSalary));
        }
    }

    #[test]
    fn rejects_bad_years() {
        assert_eq!(
            raw("", Some(1.0)).into_record(),
            Err(Rejected::InvalidYear(String::new()))
        );
        assert_eq!(
            raw("2020.5", None).into_record(),
            Err(Rejected::InvalidYear("2020.5".to_string()))
        );
    }
}
