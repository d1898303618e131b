//! Listing domain: the finished entity handed off for publication.

mod listing;

pub use listing::{Listing, ListingCopy, ListingStatus, PublicationOutcome};
