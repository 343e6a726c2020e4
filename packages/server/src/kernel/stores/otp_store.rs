use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domains::otp::OtpEntry;
use crate::kernel::BaseOtpStore;

/// Process-local OTP store keyed by phone number.
///
/// Each operation on a single phone is atomic; concurrent issues for the same
/// phone resolve last-write-wins.
#[derive(Debug, Default)]
pub struct InMemoryOtpStore {
    entries: DashMap<String, OtpEntry>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl BaseOtpStore for InMemoryOtpStore {
    async fn get(&self, phone: &str) -> Result<Option<OtpEntry>> {
        Ok(self.entries.get(phone).map(|entry| entry.value().clone()))
    }

    async fn set(&self, entry: OtpEntry) -> Result<()> {
        self.entries.insert(entry.phone.clone(), entry);
        Ok(())
    }

    async fn delete(&self, phone: &str) -> Result<()> {
        self.entries.remove(phone);
        Ok(())
    }

    async fn delete_matching(&self, entry: &OtpEntry) -> Result<bool> {
        Ok(self
            .entries
            .remove_if(entry.phone.as_str(), |_, current| current == entry)
            .is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let live = !entry.is_expired(now);
            if !live {
                removed += 1;
            }
            live
        });
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_entry() {
        let store = InMemoryOtpStore::new();
        store.set(OtpEntry::new("+15551234567", "111111", t0())).await.unwrap();
        store.set(OtpEntry::new("+15551234567", "222222", t0())).await.unwrap();

        let entry = store.get("+15551234567").await.unwrap().unwrap();
        assert_eq!(entry.code, "222222");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryOtpStore::new();
        store.set(OtpEntry::new("+15551234567", "111111", t0())).await.unwrap();
        store.delete("+15551234567").await.unwrap();

        assert!(store.get("+15551234567").await.unwrap().is_none());
        // Deleting a missing key is not an error
        store.delete("+15551234567").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_matching_only_removes_same_entry() {
        let store = InMemoryOtpStore::new();
        let old = OtpEntry::new("+15551234567", "111111", t0());
        let new = OtpEntry::new("+15551234567", "222222", t0() + Duration::seconds(30));

        store.set(old.clone()).await.unwrap();
        store.set(new.clone()).await.unwrap();

        assert!(!store.delete_matching(&old).await.unwrap());
        assert!(store.get("+15551234567").await.unwrap().is_some());

        assert!(store.delete_matching(&new).await.unwrap());
        assert!(!store.delete_matching(&new).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = InMemoryOtpStore::new();
        store.set(OtpEntry::new("+15550000001", "111111", t0())).await.unwrap();
        store
            .set(OtpEntry::new("+15550000002", "222222", t0() + Duration::minutes(3)))
            .await
            .unwrap();

        let removed = store.purge_expired(t0() + Duration::minutes(6)).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.get("+15550000001").await.unwrap().is_none());
        assert!(store.get("+15550000002").await.unwrap().is_some());
    }
}
