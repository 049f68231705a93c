use std::sync::Arc;
use tracing::{debug, info, warn};

use super::lead_store::{InsertOutcome, LeadStore, Result, StoreError};
use crate::error::SubscribeError;
use crate::models::Lead;

/// Records leads exactly once on top of a [`LeadStore`].
#[derive(Clone)]
pub struct LeadService {
    store: Arc<dyn LeadStore>,
}

impl LeadService {
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self { store }
    }

    /// Get or create the lead for a normalized email.
    /// Returns (lead, is_new)
    ///
    /// Store calls run on the blocking pool; SQLite I/O never holds up the
    /// async workers.
    pub async fn capture(
        &self,
        email: String,
    ) -> std::result::Result<(Lead, bool), SubscribeError> {
        let service = self.clone();
        let captured = tokio::task::spawn_blocking(move || service.capture_blocking(&email))
            .await
            .map_err(|e| anyhow::anyhow!("capture task failed: {}", e))??;
        Ok(captured)
    }

    /// Synchronous get-or-create.
    ///
    /// The insert is insert-if-absent, so the gap between lookup and insert is
    /// harmless: whoever loses the race sees `Conflict` and returns the
    /// winner's row.
    pub fn capture_blocking(&self, email: &str) -> Result<(Lead, bool)> {
        if let Some(existing) = self.store.find_by_email(email)? {
            debug!("Lead {} already captured at {}", existing.email, existing.timestamp);
            return Ok((existing, false));
        }

        let lead = Lead::new(email);
        match self.store.insert_lead(&lead)? {
            InsertOutcome::Inserted => {
                info!("Captured new lead {}", lead.email);
                Ok((lead, true))
            }
            InsertOutcome::Conflict => {
                debug!("Insert for {} lost a race, re-reading", email);
                match self.store.find_by_email(email)? {
                    Some(existing) => Ok((existing, false)),
                    None => {
                        warn!("Lead {} conflicted on insert but is not readable", email);
                        Err(StoreError::Vanished(email.to_string()))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::lead_store::MemoryLeadStore;
    use parking_lot::Mutex;

    /// Hides the first lookup so the service walks into the insert conflict,
    /// the way a concurrent writer would make it.
    struct RacingStore {
        inner: MemoryLeadStore,
        hide_next_lookup: Mutex<bool>,
    }

    impl LeadStore for RacingStore {
        fn find_by_email(&self, email: &str) -> Result<Option<Lead>> {
            let mut hide = self.hide_next_lookup.lock();
            if *hide {
                *hide = false;
                return Ok(None);
            }
            self.inner.find_by_email(email)
        }

        fn insert_lead(&self, lead: &Lead) -> Result<InsertOutcome> {
            self.inner.insert_lead(lead)
        }
    }

    /// Reports a conflict but never has the row.
    struct PhantomStore;

    impl LeadStore for PhantomStore {
        fn find_by_email(&self, _email: &str) -> Result<Option<Lead>> {
            Ok(None)
        }

        fn insert_lead(&self, _lead: &Lead) -> Result<InsertOutcome> {
            Ok(InsertOutcome::Conflict)
        }
    }

    #[test]
    fn test_first_capture_creates_second_returns_existing() {
        let service = LeadService::new(Arc::new(MemoryLeadStore::new()));

        let (first, created) = service.capture_blocking("a@test.com").unwrap();
        assert!(created);
        assert_eq!(first.email, "a@test.com");

        let (second, created) = service.capture_blocking("a@test.com").unwrap();
        assert!(!created);
        assert_eq!(second, first);
    }

    #[test]
    fn test_conflict_returns_winner() {
        let inner = MemoryLeadStore::new();
        let winner = Lead {
            email: "race@test.com".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        };
        inner.insert_lead(&winner).unwrap();

        let service = LeadService::new(Arc::new(RacingStore {
            inner,
            hide_next_lookup: Mutex::new(true),
        }));

        let (lead, created) = service.capture_blocking("race@test.com").unwrap();
        assert!(!created);
        assert_eq!(lead, winner);
    }

    #[test]
    fn test_conflict_without_row_is_an_error() {
        let service = LeadService::new(Arc::new(PhantomStore));
        let err = service.capture_blocking("ghost@test.com").unwrap_err();
        assert!(matches!(err, StoreError::Vanished(email) if email == "ghost@test.com"));
    }

    #[tokio::test]
    async fn test_async_capture() {
        let service = LeadService::new(Arc::new(MemoryLeadStore::new()));
        let (lead, created) = service.capture("async@test.com".to_string()).await.unwrap();
        assert!(created);
        assert_eq!(lead.email, "async@test.com");
    }
}
