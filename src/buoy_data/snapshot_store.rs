use crate::buoy_data::error::BuoyDataError;
use crate::buoy_data::loader::HistoricalLoader;
use log::{info, warn};
use polars::frame::DataFrame;
use std::collections::{hash_map::Entry, HashMap};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Default lifetime of a cached historical snapshot.
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(86_400);

struct CacheEntry {
    frame: DataFrame,
    expires_at: Instant,
}

impl CacheEntry {
    fn fresh(frame: DataFrame, ttl: Duration) -> CacheEntry {
        CacheEntry {
            frame,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Time-to-live cache over the historical loader, keyed by storage file id.
///
/// Each entry holds the loaded snapshot and its expiry instant. Callers get a
/// clone of the cached frame; the entry itself is never handed out mutably,
/// so a merge pass downstream cannot alter what later callers see.
pub struct SnapshotStore {
    loader: HistoricalLoader,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl SnapshotStore {
    pub fn new(loader: HistoricalLoader, ttl: Duration) -> Self {
        Self {
            loader,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Gets the historical snapshot for a file id, served from the cache when
    /// an unexpired entry exists.
    pub async fn get_cache_frame(&self, file: &str) -> Result<DataFrame, BuoyDataError> {
        // --- Fast path: unexpired entry. Lock released before any loading ---
        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(file) {
                if !entry.is_expired() {
                    info!("Snapshot cache hit for file {}", file);
                    return Ok(entry.frame.clone());
                }
            }
        }

        warn!(
            "Snapshot cache miss or expiry for file {}. Downloading and processing.",
            file
        );
        let loaded = self.loader.load_frame(file).await?;

        // --- Insert, rechecking for a concurrent refresh while we loaded ---
        let mut entries = self.entries.lock().await;
        match entries.entry(file.to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_expired() {
                    entry.insert(CacheEntry::fresh(loaded.clone(), self.ttl));
                    Ok(loaded)
                } else {
                    // Another task refreshed this entry while we were loading;
                    // use its version and discard ours.
                    Ok(entry.get().frame.clone())
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(CacheEntry::fresh(loaded.clone(), self.ttl));
                Ok(loaded)
            }
        }
    }

    /// Empties the cache. The next call per file id reloads from storage.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
        info!("Snapshot cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const CSV_TWO_ROWS: &str = "Timestamp (GMT+7),Temperature (°C),pH,EC Raw,DO Raw,Salinity (ppt),EC (mS/cm)\n\
        2025-01-17 08:00:00,28.5,7.1,2400,1.2,0.9,1.2\n\
        2025-01-17 08:10:00,28.6,7.0,2420,1.3,0.9,1.21";

    const CSV_THREE_ROWS: &str = "Timestamp (GMT+7),Temperature (°C),pH,EC Raw,DO Raw,Salinity (ppt),EC (mS/cm)\n\
        2025-01-17 08:00:00,28.5,7.1,2400,1.2,0.9,1.2\n\
        2025-01-17 08:10:00,28.6,7.0,2420,1.3,0.9,1.21\n\
        2025-01-17 08:20:00,28.7,7.2,2410,1.2,0.9,1.205";

    async fn serve<'a>(server: &'a MockServer, body: &'static str) -> httpmock::Mock<'a> {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/uc").query_param("id", "combined");
                then.status(200).body(body);
            })
            .await
    }

    fn store(server: &MockServer, ttl: Duration) -> SnapshotStore {
        SnapshotStore::new(HistoricalLoader::new(server.url("/uc")), ttl)
    }

    #[tokio::test]
    async fn second_call_inside_ttl_is_served_from_cache() {
        let server = MockServer::start_async().await;
        let mut mock = serve(&server, CSV_TWO_ROWS).await;
        let store = store(&server, Duration::from_secs(3600));

        let first = store.get_cache_frame("combined").await.unwrap();
        assert_eq!(first.height(), 2);

        // Swap the remote contents; a cached call must not observe them.
        mock.delete_async().await;
        serve(&server, CSV_THREE_ROWS).await;

        let second = store.get_cache_frame("combined").await.unwrap();
        assert_eq!(second.height(), 2);
    }

    #[tokio::test]
    async fn expired_entry_is_reloaded() {
        let server = MockServer::start_async().await;
        let mut mock = serve(&server, CSV_TWO_ROWS).await;
        let store = store(&server, Duration::ZERO);

        let first = store.get_cache_frame("combined").await.unwrap();
        assert_eq!(first.height(), 2);

        mock.delete_async().await;
        serve(&server, CSV_THREE_ROWS).await;

        let second = store.get_cache_frame("combined").await.unwrap();
        assert_eq!(second.height(), 3);
    }

    #[tokio::test]
    async fn clear_forces_a_reload() {
        let server = MockServer::start_async().await;
        let mut mock = serve(&server, CSV_TWO_ROWS).await;
        let store = store(&server, Duration::from_secs(3600));

        store.get_cache_frame("combined").await.unwrap();

        mock.delete_async().await;
        serve(&server, CSV_THREE_ROWS).await;

        store.clear().await;
        let reloaded = store.get_cache_frame("combined").await.unwrap();
        assert_eq!(reloaded.height(), 3);
    }
}
