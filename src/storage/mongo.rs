use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::{Client, Collection};
use tracing::info;

use crate::storage::review::{NewReview, Review};
use crate::storage::{ReviewStore, StoreError};

/// Collection holding review documents.
const COLLECTION: &str = "reviews";

/// Database used when the connection string does not name one.
const FALLBACK_DATABASE: &str = "test";

/// MongoDB-backed review store.
///
/// The underlying client pools connections internally, so one store handle
/// is shared across all requests.
pub struct MongoReviewStore {
    reviews: Collection<Review>,
}

impl MongoReviewStore {
    /// Connects to the deployment named by `uri` and verifies it responds.
    ///
    /// The ping makes a bad connection string or an unreachable server fail
    /// at startup instead of on the first request.
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(FALLBACK_DATABASE));

        database.run_command(doc! { "ping": 1 }).await?;
        info!(database = %database.name(), "✅ Connected to MongoDB");

        Ok(Self {
            reviews: database.collection(COLLECTION),
        })
    }
}

#[async_trait]
impl ReviewStore for MongoReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review, StoreError> {
        let document = review.into_review(ObjectId::new(), Utc::now());
        self.reviews.insert_one(&document).await?;
        Ok(document)
    }

    async fn list_all(&self) -> Result<Vec<Review>, StoreError> {
        let cursor = self.reviews.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.reviews.count_documents(doc! {}).await?)
    }
}
