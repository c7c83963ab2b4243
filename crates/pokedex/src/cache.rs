//! In-memory query cache with request deduplication
//!
//! Entries are keyed by [`QueryKey`]. A fetch for a key that is already in
//! flight joins the existing request instead of issuing a new one, and fresh
//! data is served without touching the network. Every fetch is spawned on the
//! runtime so it keeps running while callers render a loading state, and it
//! writes its own result back when it settles (last fetch wins).

use crate::prelude::*;
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use pokedex_core::aggregate::FetchState;
use pokedex_core::query::QueryKey;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// A fetch that any number of callers can await
pub type SharedFetch<V> = Shared<BoxFuture<'static, FetchResult<V>>>;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// How many times a failed fetch is retried, with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            base_delay: Duration::from_secs(1),
        }
    }

    /// Fail on the first error
    pub fn none() -> Self {
        Self::new(0)
    }

    #[cfg(test)]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Delay before retry number `attempt` (zero-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(MAX_RETRY_DELAY)
            .min(MAX_RETRY_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

struct Entry<V> {
    data: Option<(V, Instant)>,
    in_flight: Option<SharedFetch<V>>,
    error: Option<Error>,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            data: None,
            in_flight: None,
            error: None,
        }
    }
}

type Entries<V> = Arc<Mutex<HashMap<QueryKey, Entry<V>>>>;

fn lock<V>(
    entries: &Mutex<HashMap<QueryKey, Entry<V>>>,
) -> MutexGuard<'_, HashMap<QueryKey, Entry<V>>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct QueryCache<V> {
    entries: Entries<V>,
    stale_after: Duration,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            stale_after: self.stale_after,
        }
    }
}

impl<V> QueryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            stale_after,
        }
    }

    /// Current state of `key`, without triggering a fetch
    pub fn peek(&self, key: &QueryKey) -> FetchState<V> {
        let entries = lock(&self.entries);
        let Some(entry) = entries.get(key) else {
            return FetchState::Idle;
        };

        if entry.in_flight.is_some() {
            return FetchState::Loading {
                previous: entry.data.as_ref().map(|(data, _)| data.clone()),
            };
        }

        if let Some(error) = &entry.error {
            return FetchState::Failed(error.to_string());
        }

        match &entry.data {
            Some((data, _)) => FetchState::Ready(data.clone()),
            None => FetchState::Idle,
        }
    }

    /// Fresh cached data, the in-flight request, or a new request for `key`.
    ///
    /// `fetcher` is called once per attempt; `retry` governs how many attempts a new request makes.
    pub fn fetch<F, Fut>(&self, key: QueryKey, retry: RetryPolicy, fetcher: F) -> SharedFetch<V>
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = FetchResult<V>> + Send + 'static,
    {
        let mut entries = lock(&self.entries);
        let entry = entries.entry(key.clone()).or_default();

        if let Some(in_flight) = &entry.in_flight {
            debug!("{key}: joining in-flight request");
            return in_flight.clone();
        }

        if let (Some((data, fetched_at)), None) = (&entry.data, &entry.error) {
            if fetched_at.elapsed() < self.stale_after {
                debug!("{key}: cache hit");
                let data = data.clone();
                return async move { Ok::<V, Error>(data) }.boxed().shared();
            }
        }

        debug!("{key}: cache miss, fetching");
        let handle = Arc::clone(&self.entries);
        let stale_after = self.stale_after;
        let task_key = key.clone();
        let request = async move {
            let result = with_retry(&task_key, retry, fetcher).await;
            store(&handle, &task_key, &result, stale_after);
            result
        }
        .boxed()
        .shared();

        entry.in_flight = Some(request.clone());
        drop(entries);

        tokio::spawn(request.clone());
        request
    }
}

/// Write `result` back under `key` and drop other entries that are stale and idle
fn store<V: Clone>(
    entries: &Mutex<HashMap<QueryKey, Entry<V>>>,
    key: &QueryKey,
    result: &FetchResult<V>,
    stale_after: Duration,
) {
    let mut entries = lock(entries);
    let entry = entries.entry(key.clone()).or_default();
    entry.in_flight = None;
    match result {
        Ok(data) => {
            entry.data = Some((data.clone(), Instant::now()));
            entry.error = None;
        }
        Err(error) => entry.error = Some(error.clone()),
    }

    let before = entries.len();
    entries.retain(|k, entry| {
        k == key
            || entry.in_flight.is_some()
            || matches!(&entry.data, Some((_, fetched_at)) if fetched_at.elapsed() < stale_after)
    });
    let pruned = before - entries.len();
    if pruned > 0 {
        debug!("{}: pruned {pruned} stale entries", key.operation());
    }
}

async fn with_retry<V, F, Fut>(key: &QueryKey, policy: RetryPolicy, fetcher: F) -> FetchResult<V>
where
    F: Fn() -> Fut,
    Fut: Future<Output = FetchResult<V>>,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(data) => return Ok(data),
            Err(error) if attempt < policy.retries() => {
                let delay = policy.delay(attempt);
                warn!(
                    "{key}: attempt {} failed ({error}), retrying in {delay:?}",
                    attempt + 1
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => {
                warn!("{key}: giving up after {} attempt(s): {error}", attempt + 1);
                return Err(error);
            }
        }
    }
}
