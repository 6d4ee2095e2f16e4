use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;

/// Organization ids a resource or account belongs to
pub type OrgSet = HashSet<String>;

#[derive(Debug)]
struct Entry {
    orgs: Arc<OrgSet>,
    generation: u64,
}

/// Concurrent map from resource or account id to the organizations it
/// belongs to.
///
/// Refreshes are single-flight per key: concurrent misses on the same key
/// share one fetch. Failed fetches are not cached.
/// Drops the flight lock for a key once no caller holds or waits on it
struct Flight<'a> {
    flights: &'a DashMap<String, Arc<Mutex<()>>>,
    key: &'a str,
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.flights
            .remove_if(self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[derive(Debug, Default)]
pub struct ResourceMap {
    entries: RwLock<HashMap<String, Entry>>,
    flights: DashMap<String, Arc<Mutex<()>>>,
    generation: AtomicU64,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<OrgSet>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).map(|entry| entry.orgs.clone())
    }

    pub fn set(&self, key: impl Into<String>, orgs: OrgSet) -> Arc<OrgSet> {
        let orgs = Arc::new(orgs);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.into(),
            Entry {
                orgs: orgs.clone(),
                generation,
            },
        );
        orgs
    }

    pub fn evict(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        self.flights
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn generation_of(&self, key: &str) -> Option<u64> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).map(|entry| entry.generation)
    }

    /// Replace the entry for `key` with a freshly fetched value.
    ///
    /// When another caller completes a refresh of the same key while this one
    /// waits, its value is returned and `fetch` is never called.
    pub async fn refresh<F, Fut, E>(&self, key: &str, fetch: F) -> Result<Arc<OrgSet>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<OrgSet, E>>,
    {
        let observed = self.generation_of(key);
        // Declared before the guard so the lock is released first
        let _flight = Flight {
            flights: &self.flights,
            key,
        };
        let lock = self
            .flights
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock_owned().await;

        if let Some(current) = self.generation_of(key) {
            if Some(current) != observed {
                if let Some(orgs) = self.get(key) {
                    return Ok(orgs);
                }
            }
        }

        let orgs = fetch().await?;
        Ok(self.set(key, orgs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn orgs(ids: &[&str]) -> OrgSet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_set_get_evict() {
        let map = ResourceMap::new();
        assert!(map.get("t_1").is_none());

        map.set("t_1", orgs(&["o_1"]));
        assert!(map.get("t_1").unwrap().contains("o_1"));

        map.evict("t_1");
        assert!(map.get("t_1").is_none());
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_refresh_fetches_once() {
        let map = Arc::new(ResourceMap::new());
        let fetches = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let map = map.clone();
                let fetches = fetches.clone();
                tokio::spawn(async move {
                    map.refresh("t_1", || async {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, ()>(orgs(&["o_1"]))
                    })
                    .await
                })
            })
            .collect();

        for task in tasks {
            let result = task.await.unwrap().unwrap();
            assert!(result.contains("o_1"));
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_flights_are_released() {
        let map = ResourceMap::new();
        for i in 0..1000 {
            let key = format!("t_{}", i);
            map.refresh(&key, || async { Ok::<_, ()>(orgs(&["o_1"])) })
                .await
                .unwrap();
            map.evict(&key);
        }
        assert!(map.is_empty());
        assert!(map.flights.is_empty());

        let result = map
            .refresh("t_1", || async { Err::<OrgSet, _>("unavailable") })
            .await;
        assert!(result.is_err());
        assert!(map.flights.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_refresh_releases_flight() {
        let map = Arc::new(ResourceMap::new());
        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let map = map.clone();
                tokio::spawn(async move {
                    map.refresh("t_1", || async {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        Ok::<_, ()>(orgs(&["o_1"]))
                    })
                    .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert!(map.flights.is_empty());
        assert!(map.get("t_1").is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_is_not_cached() {
        let map = ResourceMap::new();
        let result = map
            .refresh("t_1", || async { Err::<OrgSet, _>("unavailable") })
            .await;
        assert!(result.is_err());
        assert!(map.get("t_1").is_none());

        let result = map
            .refresh("t_1", || async { Ok::<_, &str>(orgs(&["o_2"])) })
            .await;
        assert!(result.unwrap().contains("o_2"));
    }
}
