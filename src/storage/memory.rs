use std::sync::Mutex;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;

use crate::storage::review::{NewReview, Review};
use crate::storage::{ReviewStore, StoreError};

/// Test double for [`ReviewStore`]: keeps documents in a `Vec` and can
/// simulate an unreachable backend for exercising the 500 path.
#[derive(Default)]
pub struct InMemoryReviewStore {
    reviews: Mutex<Vec<Review>>,
    unavailable: bool,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails.
    pub fn unavailable() -> Self {
        Self {
            reviews: Mutex::new(Vec::new()),
            unavailable: true,
        }
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review, StoreError> {
        self.check_available()?;
        let document = review.into_review(ObjectId::new(), Utc::now());
        self.reviews.lock().unwrap().push(document.clone());
        Ok(document)
    }

    async fn list_all(&self) -> Result<Vec<Review>, StoreError> {
        self.check_available()?;
        Ok(self.reviews.lock().unwrap().clone())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.check_available()?;
        Ok(self.reviews.lock().unwrap().len() as u64)
    }
}
