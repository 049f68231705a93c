pub mod lead_store;
pub mod leads;
pub mod sqlite_store;

pub use lead_store::{InsertOutcome, LeadStore, MemoryLeadStore, StoreError};
pub use leads::LeadService;
pub use sqlite_store::SqliteLeadStore;
