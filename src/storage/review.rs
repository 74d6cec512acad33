use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-category scores. Only `overall` is mandatory; every number is
/// accepted as-is, no range is enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    pub overall: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuality: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comfort: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entertainment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_service: Option<f64>,
}

/// Free-text remarks mirroring the rating categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comfort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entertainment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<String>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.punctuality.is_none()
            && self.food.is_none()
            && self.comfort.is_none()
            && self.staff.is_none()
            && self.entertainment.is_none()
            && self.value.is_none()
            && self.wifi.is_none()
            && self.ground_service.is_none()
            && self.overall.is_none()
    }
}

/// A validated review candidate with defaults applied, ready for insertion.
/// Identity and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub airline: String,
    pub flight: Option<String>,
    pub route: Option<String>,
    pub date: String,
    pub ratings: Ratings,
    pub comments: Comments,
    pub user: String,
}

impl NewReview {
    /// Completes the candidate with store-assigned identity and timestamps.
    pub fn into_review(self, id: ObjectId, now: DateTime<Utc>) -> Review {
        Review {
            id,
            airline: self.airline,
            flight: self.flight,
            route: self.route,
            date: self.date,
            ratings: self.ratings,
            comments: self.comments,
            user: self.user,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A persisted review document, exactly as it lives in the `reviews`
/// collection. Absent optional fields are not written; an all-empty
/// `comments` sub-document is dropped entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub airline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    pub date: String,
    pub ratings: Ratings,
    #[serde(default, skip_serializing_if = "Comments::is_empty")]
    pub comments: Comments,
    pub user: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}
