use std::collections::BTreeMap;

use super::filter::FilteredView;

/// Shown instead of the most frequent role when nothing matches.
pub const NO_DATA: &str = "-";

/// Length of the top-roles ranking.
pub const TOP_ROLES: usize = 10;

/// The role the per-country breakdown is restricted to.
pub const MAP_ROLE: &str = "Data Scientist";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// The four headline metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub max: f64,
    pub count: usize,
    pub top_role: String,
}

/// One histogram bar covering `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Everything the dashboard draws, derived from one normalized view.
///
/// Every table is empty when the view is empty; the UI treats an empty table
/// as "no data" for that chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub summary: Summary,
    /// Highest mean first.
    pub top_roles: Vec<(String, f64)>,
    pub histogram: Vec<HistogramBin>,
    /// Row count per work mode, most common first.
    pub work_mode_counts: Vec<(String, usize)>,
    pub work_mode_mean: Vec<(String, f64)>,
    /// Mean salary per residence country for [`MAP_ROLE`].
    pub country_mean: Vec<(String, f64)>,
    pub year_mean: Vec<(i32, f64)>,
}

impl Aggregates {
    /// The bundle for a view with no rows.
    pub fn empty() -> Self {
        Aggregates {
            summary: Summary {
                mean: 0.0,
                max: 0.0,
                count: 0,
                top_role: NO_DATA.to_string(),
            },
            top_roles: Vec::new(),
            histogram: Vec::new(),
            work_mode_counts: Vec::new(),
            work_mode_mean: Vec::new(),
            country_mean: Vec::new(),
            year_mean: Vec::new(),
        }
    }

    pub fn compute(view: &FilteredView) -> Self {
        if view.is_empty() {
            return Self::empty();
        }
        Aggregates {
            summary: summary(view),
            top_roles: top_roles(view, TOP_ROLES),
            histogram: histogram(view),
            work_mode_counts: work_mode_counts(view),
            work_mode_mean: grouped_mean(view.rows().map(|(r, c)| (r.remote.clone(), c))),
            country_mean: grouped_mean(view.rows().filter_map(|(r, c)| {
                let iso3 = r.residence_iso3.as_ref()?;
                (r.role == MAP_ROLE).then(|| (iso3.clone(), c))
            })),
            year_mean: grouped_mean(view.rows().map(|(r, c)| (r.year, c))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.count == 0
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

pub fn summary(view: &FilteredView) -> Summary {
    let values = view.converted();
    if values.is_empty() {
        return Summary {
            mean: 0.0,
            max: 0.0,
            count: 0,
            top_role: NO_DATA.to_string(),
        };
    }

    let sum: f64 = values.iter().sum();
    Summary {
        mean: sum / values.len() as f64,
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        count: values.len(),
        top_role: mode_role(view).unwrap_or_else(|| NO_DATA.to_string()),
    }
}

/// Most frequent role; ties go to the alphabetically first role.
pub fn mode_role(view: &FilteredView) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (r, _) in view.rows() {
        *counts.entry(r.role.as_str()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (role, n) in counts {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((role, n));
        }
    }
    best.map(|(role, _)| role.to_string())
}

// ---------------------------------------------------------------------------
// Grouped tables
// ---------------------------------------------------------------------------

/// Mean of the values per key, ordered by key.
pub fn grouped_mean<K, I>(pairs: I) -> Vec<(K, f64)>
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for (key, value) in pairs {
        let (sum, n) = groups.entry(key).or_insert((0.0, 0));
        *sum += value;
        *n += 1;
    }
    groups
        .into_iter()
        .map(|(key, (sum, n))| (key, sum / n as f64))
        .collect()
}

/// The `n` roles with the highest mean salary, highest first.
///
/// Equal means keep alphabetical role order.
pub fn top_roles(view: &FilteredView, n: usize) -> Vec<(String, f64)> {
    let mut means = grouped_mean(view.rows().map(|(r, c)| (r.role.clone(), c)));
    means.sort_by(|a, b| b.1.total_cmp(&a.1));
    means.truncate(n);
    means
}

/// Rows per work mode, most common first (ties alphabetical).
pub fn work_mode_counts(view: &FilteredView) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (r, _) in view.rows() {
        *counts.entry(r.remote.as_str()).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(mode, n)| (mode.to_string(), n))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// `clamp(rows / 5, 10, 50)`.
pub fn histogram_bin_count(rows: usize) -> usize {
    (rows / 5).clamp(10, 50)
}

/// Equal-width bins over the converted-salary range.
pub fn histogram(view: &FilteredView) -> Vec<HistogramBin> {
    let values = view.converted();
    if values.is_empty() {
        return Vec::new();
    }

    let bins = histogram_bin_count(values.len());
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (start, width) = if max > min {
        (min, (max - min) / bins as f64)
    } else {
        // All values equal: centre a unit-wide range on them.
        (min - 0.5, 1.0 / bins as f64)
    };

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: start + width * i as f64,
            end: start + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = ((v - start) / width).floor();
        let idx = if idx.is_finite() && idx > 0.0 { idx as usize } else { 0 };
        out[idx.min(bins - 1)].count += 1;
    }
    out
}
