use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;

use crate::cache::TtlCache;

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Display currencies offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Currency {
    Usd,
    Brl,
    Eur,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Brl, Currency::Eur];

    /// The currency salaries are stored in.
    pub const REFERENCE: Currency = Currency::Usd;

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Brl => "BRL",
            Currency::Eur => "EUR",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Brl => "R$",
            Currency::Eur => "€",
        }
    }

    /// Fixed USD-based rate used when the live fetch fails.
    fn fallback_usd_rate(self) -> f64 {
        match self {
            Currency::Usd => 1.0,
            Currency::Brl => 5.5,
            Currency::Eur => 0.85,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// RateTable
// ---------------------------------------------------------------------------

/// Multipliers from a base currency to every [`Currency`].
///
/// Only constructible with an entry for each currency, so lookups are total.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: Currency,
    rates: BTreeMap<Currency, f64>,
}

impl RateTable {
    /// Build from a code → rate map; `None` if any currency is missing.
    pub fn from_codes(base: Currency, quotes: &HashMap<String, f64>) -> Option<Self> {
        let rates = Currency::ALL
            .into_iter()
            .map(|c| {
                let rate = if c == base { 1.0 } else { *quotes.get(c.code())? };
                Some((c, rate))
            })
            .collect::<Option<BTreeMap<_, _>>>()?;
        Some(RateTable { base, rates })
    }

    /// The static defaults, rebased onto `base`.
    pub fn fallback(base: Currency) -> Self {
        let base_usd = base.fallback_usd_rate();
        let rates = Currency::ALL
            .into_iter()
            .map(|c| {
                let rate = if c == base { 1.0 } else { c.fallback_usd_rate() / base_usd };
                (c, rate)
            })
            .collect();
        RateTable { base, rates }
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        self.rates.get(&currency).copied().unwrap_or(1.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        self.rates.iter().map(|(c, r)| (*c, *r))
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RateError {
    #[error("rate request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rate response has no usable {0} quote")]
    MissingQuote(Currency),
}

/// Something that can quote live exchange rates.
pub trait RateSource {
    fn fetch(&self, base: Currency) -> Result<RateTable, RateError>;
}

#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

/// Queries a JSON "latest rates" endpoint.
pub struct HttpRateSource {
    url_template: String,
    client: reqwest::blocking::Client,
}

impl HttpRateSource {
    /// `url_template` must contain `{base}`.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, RateError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url_template: url_template.into(),
            client,
        })
    }
}

impl RateSource for HttpRateSource {
    fn fetch(&self, base: Currency) -> Result<RateTable, RateError> {
        let url = self.url_template.replace("{base}", base.code());
        let body = self.client.get(&url).send()?.error_for_status()?.text()?;
        parse_rates(base, &body)
    }
}

/// Parse `{"rates": {"BRL": 5.1, ...}}`, rejecting non-positive quotes.
pub fn parse_rates(base: Currency, body: &str) -> Result<RateTable, RateError> {
    let latest: LatestRates = serde_json::from_str(body)?;
    for c in Currency::ALL.into_iter().filter(|&c| c != base) {
        match latest.rates.get(c.code()) {
            Some(r) if r.is_finite() && *r > 0.0 => {}
            _ => return Err(RateError::MissingQuote(c)),
        }
    }
    RateTable::from_codes(base, &latest.rates).ok_or(RateError::MissingQuote(base))
}

// ---------------------------------------------------------------------------
// RateProvider – cached, never fails
// ---------------------------------------------------------------------------

/// Which path produced a rate table.
#[derive(Debug, Clone, PartialEq)]
pub enum RateOutcome {
    Fetched(RateTable),
    FellBack { table: RateTable, reason: String },
}

impl RateOutcome {
    pub fn table(&self) -> &RateTable {
        match self {
            RateOutcome::Fetched(table) | RateOutcome::FellBack { table, .. } => table,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RateOutcome::FellBack { .. })
    }
}

/// Memoizes one [`RateOutcome`] per base currency for `ttl`.
pub struct RateProvider<S> {
    source: S,
    ttl: Duration,
    cache: HashMap<Currency, TtlCache<RateOutcome>>,
}

impl<S: RateSource> RateProvider<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: HashMap::new(),
        }
    }

    pub fn get_rates(&mut self, base: Currency) -> &RateOutcome {
        self.get_rates_at(base, Instant::now())
    }

    /// [`get_rates`](Self::get_rates) with an explicit clock.
    pub fn get_rates_at(&mut self, base: Currency, now: Instant) -> &RateOutcome {
        let source = &self.source;
        let ttl = self.ttl;
        let cache = self
            .cache
            .entry(base)
            .or_insert_with(|| TtlCache::with_ttl(ttl));

        cache.get_or_insert_with(now, || match source.fetch(base) {
            Ok(table) => {
                log::info!("Fetched exchange rates for base {base}");
                RateOutcome::Fetched(table)
            }
            Err(e) => {
                log::warn!("Exchange rate fetch failed, using defaults: {e}");
                RateOutcome::FellBack {
                    table: RateTable::fallback(base),
                    reason: e.to_string(),
                }
            }
        })
    }
}
