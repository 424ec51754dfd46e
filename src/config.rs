use std::time::Duration;

/// Location of the published salary dataset.
pub const DATASET_URL: &str =
    "https://raw.githubusercontent.com/vqrca/dashboard_salarios_dados/refs/heads/main/dados-imersao-final.csv";

/// Latest-rates endpoint; `{base}` is replaced with the base currency code.
pub const RATES_URL: &str = "https://open.er-api.com/v6/latest/{base}";

/// Runtime settings for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Remote CSV the loader fetches at startup.
    pub dataset_url: String,
    /// Rate endpoint template (see [`RATES_URL`]).
    pub rates_url: String,
    /// How long a fetched rate table stays valid.
    pub rate_ttl: Duration,
    /// Timeout applied to every HTTP request.
    pub http_timeout: Duration,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_url: DATASET_URL.to_string(),
            rates_url: RATES_URL.to_string(),
            rate_ttl: Duration::from_secs(60 * 60),
            http_timeout: Duration::from_secs(5),
            window_size: [1400.0, 900.0],
        }
    }
}
