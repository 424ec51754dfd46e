use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use super::model::{Dataset, RawRecord, Rejected};
use crate::cache::TtlCache;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The dataset could not be obtained or parsed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// `row` counts data rows from 1; 0 is the header.
    #[error("malformed CSV at row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("invalid year '{value}' at row {row}")]
    InvalidYear { row: usize, value: String },
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Somewhere raw CSV bytes can be read from.
pub trait DataSource {
    /// Human-readable location, used in log lines.
    fn location(&self) -> String;

    fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

impl<T: DataSource + ?Sized> DataSource for Box<T> {
    fn location(&self) -> String {
        (**self).location()
    }

    fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        (**self).fetch()
    }
}

/// A CSV published over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl DataSource for HttpSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let http_err = |source: reqwest::Error| FetchError::Http {
            url: self.url.clone(),
            source,
        };

        // The dataset is a few MB; only the connect phase gets the short timeout.
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(self.timeout)
            .build()
            .map_err(http_err)?;
        let response = client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?;
        let bytes = response.bytes().map_err(http_err)?;
        Ok(bytes.to_vec())
    }
}

/// A CSV file on the local disk (*File → Open*).
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl DataSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        std::fs::read(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse salary CSV into a [`Dataset`], dropping rows without a usable
/// (present, non-negative) salary.
///
/// Required columns: `ano`, `senioridade`, `contrato`, `tamanho_empresa`,
/// `cargo`, `usd`, `remoto`. `residencia_iso3` is optional; any other
/// column is ignored.
pub fn parse_csv<R: Read>(input: R) -> Result<Dataset, FetchError> {
    let mut reader = csv::Reader::from_reader(input);
    reader
        .headers()
        .map_err(|source| FetchError::Csv { row: 0, source })?;

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (row, result) in reader.deserialize::<RawRecord>().enumerate() {
        let row = row + 1;
        let raw = result.map_err(|source| FetchError::Csv { row, source })?;
        match raw.into_record() {
            Ok(record) => records.push(record),
            Err(Rejected::NoSalary) => dropped += 1,
            Err(Rejected::InvalidYear(value)) => {
                return Err(FetchError::InvalidYear { row, value });
            }
        }
    }

    if dropped > 0 {
        log::warn!("Dropped {dropped} rows without a usable base salary");
    }
    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// DatasetLoader – fetch once, keep for the process lifetime
// ---------------------------------------------------------------------------

/// Loads a dataset from a [`DataSource`] and memoizes the first success.
pub struct DatasetLoader<S> {
    source: S,
    cache: TtlCache<Arc<Dataset>>,
}

impl<S: DataSource> DatasetLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: TtlCache::forever(),
        }
    }

    /// Return the cached dataset, fetching and parsing it on first use.
    pub fn load(&mut self) -> Result<Arc<Dataset>, FetchError> {
        let source = &self.source;
        let dataset = self.cache.get_or_try_insert_with(Instant::now(), || {
            log::info!("Fetching dataset from {}", source.location());
            let bytes = source.fetch()?;
            let dataset = parse_csv(bytes.as_slice())?;
            if dataset.is_empty() {
                log::warn!("{} has no rows with a salary", source.location());
            } else {
                log::info!("Loaded {} salary records", dataset.len());
            }
            Ok::<_, FetchError>(Arc::new(dataset))
        })?;
        Ok(Arc::clone(dataset))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    const CSV: &str = "\
ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto,residencia_iso3,extra
2020,Senior,FT,Large,Data Scientist,100000,Remote,USA,x
2020.0,Junior,FT,Small,Analyst,50000,Onsite,BRA,y
2021,Senior,FT,Large,Data Scientist,,Remote,USA,z
2021,Senior,FT,Large,ML Engineer,150000,Hybrid,,w
";

    struct CountingSource {
        body: &'static str,
        calls: Cell<usize>,
    }

    impl DataSource for CountingSource {
        fn location(&self) -> String {
            "memory".to_string()
        }

        fn fetch(&self) -> Result<Vec<u8>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.body.as_bytes().to_vec())
        }
    }

    #[test]
    fn drops_rows_without_salary() {
        let ds = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert!(ds.records().iter().all(|r| r.base_salary > 0.0));
    }

    #[test]
    fn parses_float_years_and_missing_country() {
        let ds = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.records()[1].year, 2020);
        assert_eq!(ds.records()[2].residence_iso3, None);
        assert_eq!(ds.records()[0].residence_iso3.as_deref(), Some("USA"));
    }

    #[test]
    fn drops_negative_salaries() {
        let csv = "ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto,residencia_iso3\n\
                   2020,Senior,FT,Large,Analyst,-5000,Remote,USA\n\
                   2020,Senior,FT,Large,Analyst,0,Remote,USA\n";
        let ds = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].base_salary, 0.0);
    }

    #[test]
    fn malformed_row_is_an_error() {
        let bad = "ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto\n\
                   2020,Senior,FT,Large,Data Scientist,lots,Remote\n";
        let err = parse_csv(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, FetchError::Csv { row: 1, .. }));
    }

    #[test]
    fn bad_or_blank_year_is_an_error() {
        let bad = "ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto\n\
                   2020,Senior,FT,Large,Data Scientist,1,Remote\n\
                   twenty,Senior,FT,Large,Data Scientist,1,Remote\n";
        let err = parse_csv(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, FetchError::InvalidYear { row: 2, ref value } if value == "twenty"));

        let blank = "ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto\n\
                     ,Senior,FT,Large,Data Scientist,,Remote\n";
        let err = parse_csv(blank.as_bytes()).unwrap_err();
        assert!(matches!(err, FetchError::InvalidYear { row: 1, ref value } if value.is_empty()));
    }

    #[test]
    fn missing_column_is_an_error() {
        let bad = "ano,cargo\n2020,Analyst\n";
        assert!(parse_csv(bad.as_bytes()).is_err());
    }

    #[test]
    fn loader_fetches_once() {
        let source = CountingSource {
            body: CSV,
            calls: Cell::new(0),
        };
        let mut loader = DatasetLoader::new(source);

        let a = loader.load().unwrap();
        let b = loader.load().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(loader.source.calls.get(), 1);
    }

    #[test]
    fn failed_load_is_retried() {
        struct Down;
        impl DataSource for Down {
            fn location(&self) -> String {
                "nowhere".to_string()
            }
            fn fetch(&self) -> Result<Vec<u8>, FetchError> {
                Err(FetchError::Io {
                    path: PathBuf::from("nowhere.csv"),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
            }
        }
        let mut loader = DatasetLoader::new(Down);
        assert!(loader.load().is_err());
        assert!(loader.load().is_err());
    }
}
