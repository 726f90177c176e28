use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Read records expire after 7 days and revert the article to unread.
const EXPIRY_WINDOW_MS: i64 = 7 * 24 * 3600 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRecord {
    pub link: String,
    #[serde(rename = "readAt")]
    pub read_at: i64,
}

/// Durable record of which articles have been read, kept as a JSON array
/// in a single local file.
///
/// Expired entries are purged lazily on every access, never proactively.
/// Storage trouble (missing directory, unreadable file, bad JSON) is never
/// surfaced to callers: writes become no-ops and reads return nothing,
/// with a log line as the only trace. Every operation is a synchronous
/// load-prune-apply-save pass, so interleaved async callers in the same
/// process cannot lose updates.
pub struct ReadLedger {
    path: PathBuf,
}

impl ReadLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Upserts a read record with the current timestamp. Re-reading an
    /// article refreshes its expiry.
    pub fn mark_read(&self, link: &str) {
        let now = Utc::now().timestamp_millis();
        let mut records = prune(self.load(), now);

        match records.iter_mut().find(|r| r.link == link) {
            Some(record) => record.read_at = now,
            None => records.push(ReadRecord {
                link: link.to_string(),
                read_at: now,
            }),
        }

        self.save(&records);
    }

    /// Removes the record for `link` if present; idempotent.
    pub fn mark_unread(&self, link: &str) {
        let now = Utc::now().timestamp_millis();
        let mut records = prune(self.load(), now);
        records.retain(|r| r.link != link);
        self.save(&records);
    }

    pub fn is_read(&self, link: &str) -> bool {
        let now = Utc::now().timestamp_millis();
        prune(self.load(), now).iter().any(|r| r.link == link)
    }

    /// Non-expired read links. Persists the pruned set back as amortized
    /// cleanup.
    pub fn all_read_links(&self) -> HashSet<String> {
        let now = Utc::now().timestamp_millis();
        let records = prune(self.load(), now);
        self.save(&records);
        records.into_iter().map(|r| r.link).collect()
    }

    pub fn clear_all(&self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!("failed to clear read ledger: {}", e);
            }
        }
    }

    fn load(&self) -> Vec<ReadRecord> {
        if !self.path.exists() {
            return Vec::new();
        }
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("failed to read read ledger: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&data) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("read ledger is corrupt, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    fn save(&self, records: &[ReadRecord]) {
        let data = match serde_json::to_string(records) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("failed to encode read ledger: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, data) {
            tracing::warn!("failed to write read ledger: {}", e);
        }
    }
}

fn prune(records: Vec<ReadRecord>, now: i64) -> Vec<ReadRecord> {
    records
        .into_iter()
        .filter(|r| now - r.read_at < EXPIRY_WINDOW_MS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DAY_MS: i64 = 24 * 3600 * 1000;

    fn ledger() -> (TempDir, ReadLedger) {
        let dir = TempDir::new().unwrap();
        let ledger = ReadLedger::new(dir.path().join("read_status.json"));
        (dir, ledger)
    }

    fn seed(ledger: &ReadLedger, records: &[ReadRecord]) {
        std::fs::write(&ledger.path, serde_json::to_string(records).unwrap()).unwrap();
    }

    #[test]
    fn mark_read_then_query() {
        let (_dir, ledger) = ledger();

        ledger.mark_read("https://e.com/a");
        assert!(ledger.is_read("https://e.com/a"));
        assert!(!ledger.is_read("https://e.com/b"));

        ledger.mark_unread("https://e.com/a");
        assert!(!ledger.is_read("https://e.com/a"));
        // Removing twice is fine.
        ledger.mark_unread("https://e.com/a");
    }

    #[test]
    fn mark_read_is_an_upsert() {
        let (_dir, ledger) = ledger();
        let stale = Utc::now().timestamp_millis() - 6 * DAY_MS;
        seed(
            &ledger,
            &[ReadRecord {
                link: "https://e.com/a".to_string(),
                read_at: stale,
            }],
        );

        ledger.mark_read("https://e.com/a");

        let records: Vec<ReadRecord> =
            serde_json::from_str(&std::fs::read_to_string(&ledger.path).unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].read_at > stale);
    }

    #[test]
    fn entries_expire_after_seven_days() {
        let (_dir, ledger) = ledger();
        let now = Utc::now().timestamp_millis();
        seed(
            &ledger,
            &[
                ReadRecord {
                    link: "https://e.com/old".to_string(),
                    read_at: now - 8 * DAY_MS,
                },
                ReadRecord {
                    link: "https://e.com/recent".to_string(),
                    read_at: now - 6 * DAY_MS,
                },
            ],
        );

        let links = ledger.all_read_links();
        assert!(!links.contains("https://e.com/old"));
        assert!(links.contains("https://e.com/recent"));

        // Amortized cleanup wrote the pruned set back.
        let records: Vec<ReadRecord> =
            serde_json::from_str(&std::fs::read_to_string(&ledger.path).unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].link, "https://e.com/recent");
    }

    #[test]
    fn corrupt_file_degrades_to_empty() {
        let (_dir, ledger) = ledger();
        std::fs::write(&ledger.path, "not json").unwrap();

        assert!(ledger.all_read_links().is_empty());
        // And the store recovers on the next write.
        ledger.mark_read("https://e.com/a");
        assert!(ledger.is_read("https://e.com/a"));
    }

    #[test]
    fn unavailable_storage_never_panics() {
        let ledger = ReadLedger::new("/nonexistent-dir/feedflow/read_status.json");
        ledger.mark_read("https://e.com/a");
        ledger.mark_unread("https://e.com/a");
        ledger.clear_all();
        assert!(!ledger.is_read("https://e.com/a"));
        assert!(ledger.all_read_links().is_empty());
    }

    #[test]
    fn clear_all_removes_everything() {
        let (_dir, ledger) = ledger();
        ledger.mark_read("https://e.com/a");
        ledger.mark_read("https://e.com/b");

        ledger.clear_all();
        assert!(ledger.all_read_links().is_empty());
    }

    #[test]
    fn records_use_the_wire_field_names() {
        let record = ReadRecord {
            link: "https://e.com/a".to_string(),
            read_at: 123,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "link": "https://e.com/a", "readAt": 123 }));
    }
}
