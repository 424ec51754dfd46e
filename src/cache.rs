use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// TtlCache – a single memoized value with an optional expiry
// ---------------------------------------------------------------------------

/// Holds at most one value together with the instant it was stored.
///
/// With `ttl == None` the value never expires (process-lifetime cache).
/// The caller passes `now` explicitly so expiry can be stepped in tests.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    entry: Option<(T, Instant)>,
    ttl: Option<Duration>,
}

impl<T> TtlCache<T> {
    /// A cache whose entries expire `ttl` after being stored.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entry: None,
            ttl: Some(ttl),
        }
    }

    /// A cache whose entry lives until the cache is dropped.
    pub fn forever() -> Self {
        Self {
            entry: None,
            ttl: None,
        }
    }

    /// Return the fresh value or compute, store and return a new one.
    pub fn get_or_insert_with<F>(&mut self, now: Instant, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        let entry = match self.entry.take() {
            Some((value, stored_at)) if self.is_fresh(stored_at, now) => (value, stored_at),
            _ => (f(), now),
        };
        let (value, _) = self.entry.insert(entry);
        value
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with) but only stores
    /// successful results. On error the cache is left empty.
    pub fn get_or_try_insert_with<F, E>(&mut self, now: Instant, f: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let entry = match self.entry.take() {
            Some((value, stored_at)) if self.is_fresh(stored_at, now) => (value, stored_at),
            _ => (f()?, now),
        };
        let (value, _) = self.entry.insert(entry);
        Ok(value)
    }

    fn is_fresh(&self, stored_at: Instant, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(stored_at) < ttl,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_ttl() {
        let t0 = Instant::now();
        let mut cache = TtlCache::with_ttl(Duration::from_secs(10));
        cache.get_or_insert_with(t0, || 1);

        assert_eq!(*cache.get_or_insert_with(t0 + Duration::from_secs(9), || 2), 1);
        assert_eq!(*cache.get_or_insert_with(t0 + Duration::from_secs(10), || 3), 3);
    }

    #[test]
    fn forever_never_expires() {
        let t0 = Instant::now();
        let mut cache = TtlCache::forever();
        cache.get_or_insert_with(t0, || "x");
        let later = t0 + Duration::from_secs(1_000_000);
        assert_eq!(*cache.get_or_insert_with(later, || "y"), "x");
    }

    #[test]
    fn compute_runs_once_within_window() {
        let t0 = Instant::now();
        let mut cache = TtlCache::with_ttl(Duration::from_secs(60));
        let mut calls = 0;

        cache.get_or_insert_with(t0, || {
            calls += 1;
            7
        });
        let v = *cache.get_or_insert_with(t0 + Duration::from_secs(30), || {
            calls += 1;
            8
        });
        assert_eq!((v, calls), (7, 1));

        let v = *cache.get_or_insert_with(t0 + Duration::from_secs(61), || {
            calls += 1;
            9
        });
        assert_eq!((v, calls), (9, 2));
    }

    #[test]
    fn failed_compute_is_not_cached() {
        let t0 = Instant::now();
        let mut cache: TtlCache<i32> = TtlCache::forever();

        let err: Result<&i32, &str> = cache.get_or_try_insert_with(t0, || Err("down"));
        assert!(err.is_err());

        let ok: Result<&i32, &str> = cache.get_or_try_insert_with(t0, || Ok(3));
        assert_eq!(ok, Ok(&3));
        let kept: Result<&i32, &str> = cache.get_or_try_insert_with(t0, || Ok(4));
        assert_eq!(kept, Ok(&3));
    }
}
