use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::Lead;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("lead vanished after insert conflict: {0}")]
    Vanished(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Result of an insert-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A lead with the same email already exists; nothing was written.
    Conflict,
}

/// Persistence interface for leads.
///
/// Emails passed in are already normalized. Implementations must make
/// `insert_lead` atomic per email: two concurrent inserts of the same email
/// yield one `Inserted` and one `Conflict`.
pub trait LeadStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<Lead>>;

    fn insert_lead(&self, lead: &Lead) -> Result<InsertOutcome>;
}

/// Leads kept in process memory. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryLeadStore {
    leads: RwLock<HashMap<String, Lead>>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.leads.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.read().is_empty()
    }
}

impl LeadStore for MemoryLeadStore {
    fn find_by_email(&self, email: &str) -> Result<Option<Lead>> {
        Ok(self.leads.read().get(email).cloned())
    }

    fn insert_lead(&self, lead: &Lead) -> Result<InsertOutcome> {
        let mut leads = self.leads.write();
        if leads.contains_key(&lead.email) {
            return Ok(InsertOutcome::Conflict);
        }
        leads.insert(lead.email.clone(), lead.clone());
        Ok(InsertOutcome::Inserted)
    }
}
