pub mod email_check;
pub mod origin_policy;

pub use email_check::{normalize_email, parse_email_field, validate_email, EmailValidationError};
pub use origin_policy::origin_headers;
