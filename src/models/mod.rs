pub mod lead;
pub mod requests;

// Re-export commonly used types
pub use lead::{format_timestamp, Lead};
pub use requests::SubscribeRequest;
