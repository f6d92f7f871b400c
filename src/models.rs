use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Represents a user's canonical identity record stored in the `users` table.
/// The password hash is carried for credential verification only and is never
/// serialized into any response body.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    // Unique across all users; doubles as the login identifier.
    pub email: String,
    /// Bcrypt hash of the password. Excluded from serialization so no envelope
    /// can ever leak it.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    #[schema(ignore)]
    pub password_hash: String,
    // The RBAC field: 'user', 'admin' or 'superUser'.
    pub role: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// PlaceImage
///
/// The image block of a place. Stored as three flat columns (`image_src`,
/// `image_alt`, `image_thumbnail`) and nested back into an object on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct PlaceImage {
    #[sqlx(rename = "image_src")]
    pub src: String,
    #[sqlx(rename = "image_alt")]
    pub alt: String,
    #[sqlx(rename = "image_thumbnail")]
    pub thumbnail: String,
}

/// Place
///
/// A place record from the `places` table. `average_rating` and `review_count`
/// are derived fields, recomputed from the live review set after every review
/// mutation; they are never written directly by any handler.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    #[sqlx(flatten)]
    pub image: PlaceImage,
    // Degrees, constrained to [-180, 180] by validation and the schema.
    pub longitude: f64,
    // Degrees, constrained to [-90, 90].
    pub latitude: f64,
    pub summary: String,
    pub tags: Vec<String>,
    // FK to users.id (creator). Populated variants replace this with an object.
    pub created_by: Uuid,
    // Derived: round(mean(ratings), 1), 0.0 with no reviews.
    pub average_rating: f64,
    // Derived: live count of reviews referencing this place.
    pub review_count: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Review
///
/// A review record from the `reviews` table. At most one review exists per
/// (user, place) pair, enforced by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Review {
    pub id: Uuid,
    // Integer stars, 1 through 5.
    pub rating: i32,
    pub comment: String,
    #[serde(rename = "user")]
    #[sqlx(rename = "user_id")]
    pub user_id: Uuid,
    #[serde(rename = "place")]
    #[sqlx(rename = "place_id")]
    pub place_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Populated (Joined) Response Schemas ---

/// CreatorInfo
///
/// The populated form of a user reference: id, name and email, loaded via a
/// JOIN with the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct CreatorInfo {
    #[sqlx(rename = "creator_id")]
    pub id: Uuid,
    #[sqlx(rename = "creator_name")]
    pub name: String,
    #[sqlx(rename = "creator_email")]
    pub email: String,
}

/// ReviewAuthor
///
/// The minimal populated form of a review's author (name only), used where
/// reviews are embedded inside place payloads.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ReviewAuthor {
    #[sqlx(rename = "author_id")]
    pub id: Uuid,
    #[sqlx(rename = "author_name")]
    pub name: String,
}

/// EmbeddedReview
///
/// A review as it appears inside a place payload: author populated with the
/// name only. Place listings embed the 5 most recent of these; the single-place
/// view embeds the full set.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EmbeddedReview {
    pub id: Uuid,
    pub rating: i32,
    pub comment: String,
    #[sqlx(flatten)]
    pub user: ReviewAuthor,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// ReviewWithAuthor
///
/// A standalone review response with the author populated (name and email).
/// Returned by the review list endpoint and by review create/update.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReviewWithAuthor {
    pub id: Uuid,
    pub rating: i32,
    pub comment: String,
    #[sqlx(flatten)]
    pub user: CreatorInfo,
    #[serde(rename = "place")]
    #[sqlx(rename = "place_id")]
    pub place_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// PlaceRef
///
/// The populated form of a place reference inside a review (title and image
/// only), used by the my-reviews listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct PlaceRef {
    #[sqlx(rename = "place_id")]
    pub id: Uuid,
    pub title: String,
    #[sqlx(flatten)]
    pub image: PlaceImage,
}

/// ReviewWithPlace
///
/// A review with its place populated (title and image), as returned by
/// GET /api/reviews/my-reviews.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReviewWithPlace {
    pub id: Uuid,
    pub rating: i32,
    pub comment: String,
    #[serde(rename = "user")]
    #[sqlx(rename = "user_id")]
    pub user_id: Uuid,
    #[serde(rename = "place")]
    #[sqlx(flatten)]
    pub place: PlaceRef,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// PlaceWithCreator
///
/// A place with its creator populated, used by the single-place view and the
/// nearby query.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlaceWithCreator {
    pub id: Uuid,
    pub title: String,
    #[sqlx(flatten)]
    pub image: PlaceImage,
    pub longitude: f64,
    pub latitude: f64,
    pub summary: String,
    pub tags: Vec<String>,
    #[sqlx(flatten)]
    pub created_by: CreatorInfo,
    pub average_rating: f64,
    pub review_count: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// PlaceListItem
///
/// A place as it appears in the paginated listing: base fields plus the 5 most
/// recent reviews with author names.
#[derive(Debug, Clone, Serialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PlaceListItem {
    #[serde(flatten)]
    pub place: Place,
    pub reviews: Vec<EmbeddedReview>,
}

/// PlaceDetail
///
/// The full single-place view: creator populated, complete review list sorted
/// newest first.
#[derive(Debug, Clone, Serialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PlaceDetail {
    #[serde(flatten)]
    pub place: PlaceWithCreator,
    pub reviews: Vec<EmbeddedReview>,
}

/// NearbyPlace
///
/// A nearby-query result: the place (creator populated) plus the great-circle
/// distance from the query point, rounded to whole meters.
#[derive(Debug, Clone, Serialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct NearbyPlace {
    #[serde(flatten)]
    pub place: PlaceWithCreator,
    pub distance: i64,
}

// --- Request Payloads (Input Schemas) ---

/// ImagePayload
///
/// The image block of a place payload. Every field is optional at the type
/// level so missing values flow into the validation layer instead of failing
/// JSON extraction; `src` is required by rule.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ImagePayload {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub thumbnail: Option<String>,
}

/// PlacePayload
///
/// Input for POST /api/places and PUT /api/places/{id} (full replacement).
/// All fields are optional at the type level and checked by the declarative
/// rule table, so a missing title produces a 400 field error rather than a
/// deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PlacePayload {
    pub title: Option<String>,
    pub image: Option<ImagePayload>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// ReviewPayload
///
/// Input for review create/update. `rating` accepts any JSON number; the rule
/// table enforces that it is an integral value between 1 and 5.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReviewPayload {
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

/// RegisterRequest
///
/// Input payload for POST /api/auth/register. The password is hashed before
/// storage and never persisted or logged in clear text.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// LoginRequest
///
/// Input payload for POST /api/auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// UpdateUserRequest
///
/// Partial update payload for PUT /api/users/{id}. Only provided fields are
/// written (COALESCE semantics in the repository).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// AuthResponse
///
/// Output of register/login: a signed bearer token plus the user it
/// identifies (password hash excluded by the User serializer).
#[derive(Debug, Clone, Serialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// --- Repository-Level Filters ---

/// PlaceFilter
///
/// The resolved (already leniently parsed) filter set for the place listing:
/// tag overlap, minimum average rating, and the pagination window.
#[derive(Debug, Clone, Default)]
pub struct PlaceFilter {
    pub tags: Option<Vec<String>>,
    pub min_rating: Option<f64>,
    pub limit: i64,
    pub page: i64,
}
