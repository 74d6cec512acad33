use crate::storage::{Comments, NewReview, Ratings, Review, ReviewStore};
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// User recorded when a submission names none.
const DEFAULT_USER: &str = "Anonymous";

/// Application state shared across handlers. The store handle is created
/// once at startup and never replaced.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReviewStore>,
}

/// An incoming review submission. Every field is optional here; required
/// fields are enforced by [`ReviewSubmission::validate`], and fields the
/// schema does not know are dropped during deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub airline: Option<String>,
    pub flight: Option<String>,
    pub route: Option<String>,
    pub date: Option<String>,
    pub ratings: Option<RatingsPayload>,
    pub comments: Option<Comments>,
    pub user: Option<String>,
}

/// Ratings as submitted: `overall` is still optional at this stage.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsPayload {
    pub overall: Option<f64>,
    pub punctuality: Option<f64>,
    pub food: Option<f64>,
    pub comfort: Option<f64>,
    pub staff: Option<f64>,
    pub entertainment: Option<f64>,
    pub value: Option<f64>,
    pub wifi: Option<f64>,
    pub ground_service: Option<f64>,
}

/// A review as returned to clients: identifier as a hex string, timestamps
/// as RFC 3339 text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub airline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    pub date: String,
    pub ratings: Ratings,
    #[serde(skip_serializing_if = "Comments::is_empty")]
    pub comments: Comments,
    pub user: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_hex(),
            airline: review.airline,
            flight: review.flight,
            route: review.route,
            date: review.date,
            ratings: review.ratings,
            comments: review.comments,
            user: review.user,
            created_at: review
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_at: review
                .updated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_reviews: u64,
}

/// Error response body, the single `{message}` shape every failure uses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ReviewSubmission {
    /// Checks the required fields and applies the schema defaults, turning
    /// the raw submission into an insertable candidate. All violations are
    /// collected so the client sees every offending field at once.
    pub fn validate(self) -> Result<NewReview, ValidationError> {
        let mut violations = Vec::new();

        let airline = match self.airline {
            None => {
                violations.push(Violation::Missing { field: "airline" });
                None
            }
            Some(a) if a.trim().is_empty() => {
                violations.push(Violation::Empty { field: "airline" });
                None
            }
            Some(a) => Some(a),
        };

        let ratings = self.ratings.unwrap_or_default();
        if ratings.overall.is_none() {
            violations.push(Violation::Missing {
                field: "ratings.overall",
            });
        }

        match (airline, ratings.overall) {
            (Some(airline), Some(overall)) => Ok(NewReview {
                airline,
                flight: self.flight,
                route: self.route,
                date: self.date.unwrap_or_else(current_utc_date),
                ratings: Ratings {
                    overall,
                    punctuality: ratings.punctuality,
                    food: ratings.food,
                    comfort: ratings.comfort,
                    staff: ratings.staff,
                    entertainment: ratings.entertainment,
                    value: ratings.value,
                    wifi: ratings.wifi,
                    ground_service: ratings.ground_service,
                },
                comments: self.comments.unwrap_or_default(),
                user: self.user.unwrap_or_else(|| DEFAULT_USER.to_string()),
            }),
            _ => Err(ValidationError::new(violations)),
        }
    }
}

/// Current UTC date in `YYYY-MM-DD` form, the default for omitted dates.
fn current_utc_date() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// One failed requirement on a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Missing { field: &'static str },
    Empty { field: &'static str },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{field} is required"),
            Self::Empty { field } => write!(f, "{field} must not be empty"),
        }
    }
}

/// Every requirement a submission failed, reported together.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "review validation failed:")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request rejected before it reached the store (400).
    BadRequest(String),
    /// Schema validation failed (400).
    Validation(ValidationError),
    /// Store failure. The payload is the client-facing generic message;
    /// the underlying detail is logged at the call site, never returned.
    Internal(&'static str),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message.to_string()),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// JSON body extractor that reports malformed payloads (bad syntax, wrong
/// field kinds) as a 400 with the standard `{message}` shape instead of
/// axum's default rejection.
pub struct ReviewJson(pub ReviewSubmission);

impl<S> FromRequest<S> for ReviewJson
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<ReviewSubmission>::from_request(req, state).await {
            Ok(Json(submission)) => Ok(Self(submission)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use bson::oid::ObjectId;
    use serde_json::json;

    fn submission(value: serde_json::Value) -> ReviewSubmission {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn valid_submission_passes_validation() {
        let candidate = submission(json!({
            "airline": "Delta",
            "flight": "DL100",
            "ratings": { "overall": 4, "groundService": 2.5 },
            "comments": { "overall": "fine" },
            "user": "kim"
        }))
        .validate()
        .unwrap();

        assert_eq!(candidate.airline, "Delta");
        assert_eq!(candidate.flight.as_deref(), Some("DL100"));
        assert_eq!(candidate.ratings.overall, 4.0);
        assert_eq!(candidate.ratings.ground_service, Some(2.5));
        assert_eq!(candidate.comments.overall.as_deref(), Some("fine"));
        assert_eq!(candidate.user, "kim");
    }

    #[test]
    fn missing_airline_and_ratings_are_both_reported() {
        let err = submission(json!({ "flight": "DL100" })).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "review validation failed: airline is required, ratings.overall is required"
        );
    }

    #[test]
    fn blank_airline_is_rejected() {
        let err = submission(json!({
            "airline": "   ",
            "ratings": { "overall": 3 }
        }))
        .validate()
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "review validation failed: airline must not be empty"
        );
    }

    #[test]
    fn ratings_without_overall_are_rejected() {
        let err = submission(json!({
            "airline": "Delta",
            "ratings": { "food": 5 }
        }))
        .validate()
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "review validation failed: ratings.overall is required"
        );
    }

    #[test]
    fn omitted_user_defaults_to_anonymous() {
        let candidate = submission(json!({
            "airline": "Delta",
            "ratings": { "overall": 4 }
        }))
        .validate()
        .unwrap();

        assert_eq!(candidate.user, "Anonymous");
    }

    #[test]
    fn omitted_date_defaults_to_current_utc_date() {
        let candidate = submission(json!({
            "airline": "Delta",
            "ratings": { "overall": 4 }
        }))
        .validate()
        .unwrap();

        assert_eq!(candidate.date, Utc::now().format("%Y-%m-%d").to_string());
    }

    #[test]
    fn submitted_date_is_kept_verbatim() {
        let candidate = submission(json!({
            "airline": "Delta",
            "date": "2024-01-31",
            "ratings": { "overall": 4 }
        }))
        .validate()
        .unwrap();

        assert_eq!(candidate.date, "2024-01-31");
    }

    #[test]
    fn unknown_fields_are_dropped_silently() {
        let candidate = submission(json!({
            "airline": "X",
            "ratings": { "overall": 5, "cleanliness": 1 },
            "foo": "bar"
        }))
        .validate()
        .unwrap();

        assert_eq!(candidate.airline, "X");
        assert_eq!(candidate.ratings.overall, 5.0);
    }

    #[test]
    fn response_serializes_with_wire_field_names() {
        let review = NewReview {
            airline: "Delta".to_string(),
            flight: None,
            route: None,
            date: "2026-08-21".to_string(),
            ratings: Ratings {
                overall: 4.0,
                punctuality: None,
                food: None,
                comfort: None,
                staff: None,
                entertainment: None,
                value: None,
                wifi: None,
                ground_service: Some(2.0),
            },
            comments: Comments::default(),
            user: "Anonymous".to_string(),
        }
        .into_review(ObjectId::new(), Utc::now());

        let body = serde_json::to_value(ReviewResponse::from(review)).unwrap();

        assert!(body["_id"].is_string());
        assert_eq!(body["airline"], "Delta");
        assert_eq!(body["ratings"]["groundService"], 2.0);
        assert!(body.get("flight").is_none());
        assert!(body.get("comments").is_none());
        let created_at = body["createdAt"].as_str().unwrap();
        assert!(created_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = AppError::Validation(ValidationError::new(vec![Violation::Missing {
            field: "airline",
        }]));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn internal_error_is_500_with_message_only() {
        let response = AppError::Internal("Server error saving review.").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Server error saving review.");
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_as_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/reviews")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"airline": "Delta", "ratings": {"overall": "five"}}"#))
            .unwrap();

        match ReviewJson::from_request(request, &()).await {
            Err(AppError::BadRequest(message)) => assert!(!message.is_empty()),
            Err(other) => panic!("expected BadRequest, got {other:?}"),
            Ok(_) => panic!("expected BadRequest, extraction succeeded"),
        }
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/reviews")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"airline": "Delta", "ratings": {"overall": 4}}"#))
            .unwrap();

        let ReviewJson(submission) = ReviewJson::from_request(request, &()).await.unwrap();
        assert_eq!(submission.airline.as_deref(), Some("Delta"));
    }
}
