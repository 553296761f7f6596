//! Business services for the storefront.
//!
//! # Services
//!
//! - `submission` - Placeholder submitter for orders and enquiries. It logs
//!   and acknowledges; a real order backend replaces it behind the
//!   [`fixev_core::Submitter`] trait.

pub mod submission;

pub use submission::LoggingSubmitter;
