pub mod drop_service;

pub use drop_service::{DropError, DropListing, DropService, DropStats, PublishOutcome};
