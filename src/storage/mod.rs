#[cfg(test)]
pub mod memory;
pub mod mongo;
pub mod review;

pub use mongo::MongoReviewStore;
pub use review::{Comments, NewReview, Ratings, Review};

use async_trait::async_trait;

/// Failures surfaced by a review store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("mongodb driver error: {0}")]
    Driver(#[from] mongodb::error::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence seam for review documents.
///
/// The production implementation is [`MongoReviewStore`], connected once at
/// startup and shared read-only across requests. Handler tests substitute
/// the in-memory store.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Persists a validated review as a single atomic insert, assigning its
    /// identifier and timestamps. Returns the completed document.
    async fn insert(&self, review: NewReview) -> Result<Review, StoreError>;

    /// Every stored review, in store-native order. No sort is imposed.
    async fn list_all(&self) -> Result<Vec<Review>, StoreError>;

    /// Number of stored reviews.
    async fn count(&self) -> Result<u64, StoreError>;
}
