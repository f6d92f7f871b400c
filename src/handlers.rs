use crate::{
    AppState,
    auth::{self, AuthUser},
    envelope::{ApiResponse, ApiResult},
    error::ApiError,
    geo::haversine_distance,
    logging::{ChannelLogger, channels},
    models::{
        AuthResponse, EmbeddedReview, LoginRequest, NearbyPlace, PlaceDetail, PlaceFilter,
        PlaceImage, PlaceListItem, PlacePayload, PlaceWithCreator, RegisterRequest, ReviewPayload,
        ReviewWithAuthor, ReviewWithPlace, UpdateUserRequest, User,
    },
    repository::NewPlace,
    validation::{LOGIN_RULES, PLACE_RULES, REGISTER_RULES, REVIEW_RULES, validate},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use uuid::Uuid;

// Channel loggers for the subsystems this module serves. Each handler group
// logs through its own channel so log streams can be filtered independently.
const ACCOUNT_LOG: ChannelLogger = ChannelLogger::new(channels::ACCOUNT);
const PLACES_LOG: ChannelLogger = ChannelLogger::new(channels::PLACES);
const REVIEWS_LOG: ChannelLogger = ChannelLogger::new(channels::REVIEWS);

/// Number of most-recent reviews embedded into each place in the listing.
const LISTING_EMBED_LIMIT: i64 = 5;
/// Default page size for the place listing.
const DEFAULT_PAGE_SIZE: i64 = 20;
/// Default radius for the nearby query, in meters.
const DEFAULT_MAX_DISTANCE_M: f64 = 10_000.0;

// --- Filter Structs ---

/// PlaceListQuery
///
/// Query parameters for the public place listing. Numeric parameters are
/// accepted as raw strings and parsed leniently: an unparseable `minRating`
/// matches nothing (preserving the permissive behavior clients may rely on),
/// while unparseable `limit`/`page` fall back to their defaults.
#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PlaceListQuery {
    /// Comma-separated tag list; places matching any of the tags are returned.
    pub tags: Option<String>,
    /// Lower bound on averageRating.
    pub min_rating: Option<String>,
    /// Page size, default 20.
    pub limit: Option<String>,
    /// 1-based page number, default 1.
    pub page: Option<String>,
}

/// NearbyQuery
///
/// Query parameters for the nearby-places scan.
#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    /// Maximum distance from the query point in meters, default 10000.
    pub max_distance: Option<String>,
}

// --- Parsing helpers ---

/// Lenient positive-integer parse with a fallback, for limit/page.
fn parse_positive(value: &Option<String>, default: i64) -> i64 {
    value
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

/// Converts a validated place payload into the resolved document. Only called
/// after PLACE_RULES passed, so the required fields are present.
fn to_new_place(payload: PlacePayload) -> NewPlace {
    let image = payload.image.unwrap_or_default();
    NewPlace {
        title: payload.title.unwrap_or_default().trim().to_string(),
        image: PlaceImage {
            src: image.src.unwrap_or_default(),
            alt: image.alt.unwrap_or_default(),
            thumbnail: image.thumbnail.unwrap_or_default(),
        },
        longitude: payload.longitude.unwrap_or_default(),
        latitude: payload.latitude.unwrap_or_default(),
        summary: payload.summary.unwrap_or_default().trim().to_string(),
        tags: payload
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
    }
}

// --- Auth Handlers ---

/// register
///
/// [Public Route] Creates a new user account. The password is bcrypt-hashed
/// before storage; the response carries a signed bearer token plus the user.
/// A duplicate email is rejected with 400 - pre-checked for the friendly
/// message, with the unique constraint as the authority under races.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = AuthResponse),
        (status = 400, description = "Validation failed or email taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    validate(&payload, REGISTER_RULES)?;

    let name = payload.name.unwrap_or_default().trim().to_string();
    let email = payload.email.unwrap_or_default().trim().to_lowercase();
    let password = payload.password.unwrap_or_default();

    if state.repo.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::duplicate("Email already registered"));
    }

    let password_hash = auth::hash_password(&password)?;
    let user = state.repo.create_user(&name, &email, &password_hash).await?;
    let token = auth::issue_token(user.id, &state.config)?;

    ACCOUNT_LOG.info(&format!("user registered: {}", user.id));

    Ok(ApiResponse::created(AuthResponse { token, user }))
}

/// login
///
/// [Public Route] Verifies credentials and issues a fresh bearer token. A
/// missing user and a wrong password are indistinguishable to the client.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    validate(&payload, LOGIN_RULES)?;

    let email = payload.email.unwrap_or_default().trim().to_lowercase();
    let password = payload.password.unwrap_or_default();

    let user = state
        .repo
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !auth::verify_password(&password, &user.password_hash)? {
        ACCOUNT_LOG.warn(&format!("failed login attempt for user {}", user.id));
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = auth::issue_token(user.id, &state.config)?;

    Ok(ApiResponse::success(AuthResponse { token, user }))
}

/// get_me
///
/// [Authenticated Route] The authenticated user's own profile.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses((status = 200, description = "Profile", body = User))
)]
pub async fn get_me(AuthUser { id, .. }: AuthUser, State(state): State<AppState>) -> ApiResult<User> {
    let user = state
        .repo
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user))
}

// --- User Handlers ---

/// get_all_users
///
/// [Authenticated Route] Lists every user. Password hashes are excluded by the
/// serializer, never by the query.
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users", body = [User]))
)]
pub async fn get_all_users(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Vec<User>> {
    let users = state.repo.list_users().await?;
    let count = users.len();
    Ok(ApiResponse::success(users).with_count(count))
}

/// get_user
///
/// [Authenticated Route] Retrieves a single user by id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Found", body = User),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<User> {
    let user = state
        .repo
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user))
}

/// update_user
///
/// [Authenticated Route] Profile update, restricted to the profile's owner.
/// There is deliberately no admin override here: accounts are self-managed.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 403, description = "Not the profile owner")
    )
)]
pub async fn update_user(
    AuthUser { id: caller_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<User> {
    if caller_id != id {
        return Err(ApiError::forbidden("Not authorized to update this user"));
    }

    let user = state
        .repo
        .update_user(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(user))
}

/// delete_user
///
/// [Authenticated Route] Account deletion, restricted to the account's owner.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_user(
    AuthUser { id: caller_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    if caller_id != id {
        return Err(ApiError::forbidden("Not authorized to delete this user"));
    }

    if !state.repo.delete_user(id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    ACCOUNT_LOG.info(&format!("user deleted: {}", id));

    Ok(ApiResponse::success(json!({})).with_message("User deleted successfully"))
}

// --- Place Handlers ---

/// get_all_places
///
/// [Public Route] The paginated place listing with tag and minimum-rating
/// filters. Each place embeds its 5 most recent reviews (author name only).
/// The envelope carries count/total/page/pages; a page past the end returns
/// an empty data array, not an error.
#[utoipa::path(
    get,
    path = "/api/places",
    params(PlaceListQuery),
    responses((status = 200, description = "Page of places", body = [PlaceListItem]))
)]
pub async fn get_all_places(
    State(state): State<AppState>,
    Query(query): Query<PlaceListQuery>,
) -> ApiResult<Vec<PlaceListItem>> {
    // An empty tags parameter counts as absent, not as an impossible filter.
    let tags = query.tags.as_deref().and_then(|raw| {
        let parsed: Vec<String> = raw
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        (!parsed.is_empty()).then_some(parsed)
    });

    // An unparseable bound deliberately yields a filter nothing satisfies
    // (empty result) rather than a 400; see the listing contract.
    let min_rating = query
        .min_rating
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<f64>().unwrap_or(f64::NAN));

    let limit = parse_positive(&query.limit, DEFAULT_PAGE_SIZE);
    let page = parse_positive(&query.page, 1);

    let filter = PlaceFilter {
        tags,
        min_rating,
        limit,
        page,
    };

    let (places, total) = state.repo.list_places(&filter).await?;

    // Single windowed query for the whole page's embedded reviews.
    let place_ids: Vec<Uuid> = places.iter().map(|p| p.id).collect();
    let mut reviews_by_place: HashMap<Uuid, Vec<EmbeddedReview>> = HashMap::new();
    for (place_id, review) in state
        .repo
        .recent_reviews_for_places(&place_ids, LISTING_EMBED_LIMIT)
        .await?
    {
        reviews_by_place.entry(place_id).or_default().push(review);
    }

    let items: Vec<PlaceListItem> = places
        .into_iter()
        .map(|place| {
            let reviews = reviews_by_place.remove(&place.id).unwrap_or_default();
            PlaceListItem { place, reviews }
        })
        .collect();

    let count = items.len();
    let pages = (total + limit - 1) / limit;

    Ok(ApiResponse::success(items).with_pagination(count, total, page, pages))
}

/// get_place
///
/// [Public Route] A single place with its creator populated and the full
/// review list, newest first.
#[utoipa::path(
    get,
    path = "/api/places/{id}",
    params(("id" = Uuid, Path, description = "Place ID")),
    responses(
        (status = 200, description = "Found", body = PlaceDetail),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<PlaceDetail> {
    let place = state
        .repo
        .get_place_with_creator(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Place not found"))?;

    let reviews = state.repo.embedded_reviews_for_place(id).await?;

    Ok(ApiResponse::success(PlaceDetail { place, reviews }))
}

/// create_place
///
/// [Authenticated Route] Creates a place owned by the caller. `createdBy` is
/// always the authenticated user; the response returns the place with its
/// creator populated.
#[utoipa::path(
    post,
    path = "/api/places",
    request_body = PlacePayload,
    responses(
        (status = 201, description = "Created", body = PlaceWithCreator),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_place(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<PlacePayload>,
) -> ApiResult<PlaceWithCreator> {
    validate(&payload, PLACE_RULES)?;

    let place = state
        .repo
        .create_place(to_new_place(payload), user_id)
        .await?;

    PLACES_LOG.info(&format!("place created: {} by {}", place.id, user_id));

    let populated = state
        .repo
        .get_place_with_creator(place.id)
        .await?
        .ok_or_else(|| ApiError::internal(format!("created place {} not readable", place.id)))?;

    Ok(ApiResponse::created(populated))
}

/// update_place
///
/// [Authenticated Route] Full-document replacement of a place. Allowed for the
/// creator and for admin/superUser roles; everyone else gets 403 with the
/// resource untouched.
#[utoipa::path(
    put,
    path = "/api/places/{id}",
    params(("id" = Uuid, Path, description = "Place ID")),
    request_body = PlacePayload,
    responses(
        (status = 200, description = "Updated", body = PlaceWithCreator),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_place(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlacePayload>,
) -> ApiResult<PlaceWithCreator> {
    validate(&payload, PLACE_RULES)?;

    let place = state
        .repo
        .get_place(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Place not found"))?;

    if !auth::can_modify(user_id, &role, place.created_by) {
        return Err(ApiError::forbidden("Not authorized to update this place"));
    }

    state
        .repo
        .update_place(id, to_new_place(payload))
        .await?
        .ok_or_else(|| ApiError::not_found("Place not found"))?;

    let populated = state
        .repo
        .get_place_with_creator(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Place not found"))?;

    Ok(ApiResponse::success(populated))
}

/// delete_place
///
/// [Authenticated Route] Deletes a place and cascades to every review that
/// references it. Allowed for the creator and for admin/superUser roles.
#[utoipa::path(
    delete,
    path = "/api/places/{id}",
    params(("id" = Uuid, Path, description = "Place ID")),
    responses(
        (status = 200, description = "Deleted with cascade"),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_place(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let place = state
        .repo
        .get_place(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Place not found"))?;

    if !auth::can_modify(user_id, &role, place.created_by) {
        return Err(ApiError::forbidden("Not authorized to delete this place"));
    }

    state.repo.delete_place(id).await?;

    PLACES_LOG.info(&format!("place deleted with cascade: {}", id));

    Ok(ApiResponse::success(json!({}))
        .with_message("Place and associated reviews deleted successfully"))
}

/// get_places_nearby
///
/// [Public Route] Full-scan proximity query: loads every place, computes the
/// haversine distance to the query point, keeps those within `maxDistance`
/// meters and returns them closest-first with the rounded distance attached.
/// Path coordinates that do not parse as finite numbers are a 400.
#[utoipa::path(
    get,
    path = "/api/places/nearby/{longitude}/{latitude}",
    params(
        ("longitude" = String, Path, description = "Query point longitude in degrees"),
        ("latitude" = String, Path, description = "Query point latitude in degrees"),
        NearbyQuery
    ),
    responses(
        (status = 200, description = "Places sorted by distance", body = [NearbyPlace]),
        (status = 400, description = "Invalid coordinates")
    )
)]
pub async fn get_places_nearby(
    State(state): State<AppState>,
    Path((longitude, latitude)): Path<(String, String)>,
    Query(query): Query<NearbyQuery>,
) -> ApiResult<Vec<NearbyPlace>> {
    let lon = longitude.parse::<f64>().ok().filter(|v| v.is_finite());
    let lat = latitude.parse::<f64>().ok().filter(|v| v.is_finite());
    let (Some(lon), Some(lat)) = (lon, lat) else {
        return Err(ApiError::bad_request("Invalid coordinates"));
    };

    let max_distance = query
        .max_distance
        .as_deref()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(DEFAULT_MAX_DISTANCE_M);

    let places = state.repo.all_places_with_creator().await?;

    let mut nearby: Vec<NearbyPlace> = places
        .into_iter()
        .filter_map(|place| {
            let distance = haversine_distance(lon, lat, place.longitude, place.latitude);
            if distance <= max_distance {
                Some(NearbyPlace {
                    place,
                    distance: distance.round() as i64,
                })
            } else {
                None
            }
        })
        .collect();

    nearby.sort_by_key(|p| p.distance);

    let count = nearby.len();
    Ok(ApiResponse::success(nearby).with_count(count))
}

// --- Review Handlers ---

/// get_reviews
///
/// [Public Route] All reviews for a place, author populated, newest first.
/// An unknown place simply yields an empty list.
#[utoipa::path(
    get,
    path = "/api/places/{placeId}/reviews",
    params(("placeId" = Uuid, Path, description = "Place ID")),
    responses((status = 200, description = "Reviews", body = [ReviewWithAuthor]))
)]
pub async fn get_reviews(
    State(state): State<AppState>,
    Path(place_id): Path<Uuid>,
) -> ApiResult<Vec<ReviewWithAuthor>> {
    let reviews = state.repo.reviews_with_author_for_place(place_id).await?;
    let count = reviews.len();
    Ok(ApiResponse::success(reviews).with_count(count))
}

/// create_review
///
/// [Authenticated Route] Posts a review on a place. The place must exist (404)
/// and the caller must not have reviewed it before (400); the rating
/// aggregation runs to completion before the response so clients always read
/// a consistent place/review pair.
#[utoipa::path(
    post,
    path = "/api/places/{placeId}/reviews",
    params(("placeId" = Uuid, Path, description = "Place ID")),
    request_body = ReviewPayload,
    responses(
        (status = 201, description = "Created", body = ReviewWithAuthor),
        (status = 400, description = "Validation failed or already reviewed"),
        (status = 404, description = "Place not found")
    )
)]
pub async fn create_review(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(place_id): Path<Uuid>,
    Json(payload): Json<ReviewPayload>,
) -> ApiResult<ReviewWithAuthor> {
    validate(&payload, REVIEW_RULES)?;

    state
        .repo
        .get_place(place_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Place not found"))?;

    // Friendly pre-check; the unique index still backs this under races, and a
    // constraint violation surfaces as the same 400.
    if state
        .repo
        .find_review_by_user_and_place(user_id, place_id)
        .await?
        .is_some()
    {
        return Err(ApiError::duplicate("You have already reviewed this place"));
    }

    let rating = payload.rating.unwrap_or_default() as i32;
    let comment = payload.comment.unwrap_or_default().trim().to_string();

    let review = state
        .repo
        .create_review(place_id, user_id, rating, &comment)
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Duplicate(_) => ApiError::duplicate("You have already reviewed this place"),
            other => other,
        })?;

    // The derived fields must be consistent before the client sees the review.
    state.repo.recalculate_rating(place_id).await?;

    REVIEWS_LOG.info(&format!("review created: {} on place {}", review.id, place_id));

    let populated = state
        .repo
        .get_review_with_author(review.id)
        .await?
        .ok_or_else(|| ApiError::internal(format!("created review {} not readable", review.id)))?;

    Ok(ApiResponse::created(populated))
}

/// update_review
///
/// [Authenticated Route] Replaces a review's rating and comment. Allowed for
/// the author and for admin/superUser roles; re-aggregates the place after.
#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = ReviewPayload,
    responses(
        (status = 200, description = "Updated", body = ReviewWithAuthor),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not author or admin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_review(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewPayload>,
) -> ApiResult<ReviewWithAuthor> {
    validate(&payload, REVIEW_RULES)?;

    let review = state
        .repo
        .get_review(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    if !auth::can_modify(user_id, &role, review.user_id) {
        return Err(ApiError::forbidden("Not authorized to update this review"));
    }

    let rating = payload.rating.unwrap_or_default() as i32;
    let comment = payload.comment.unwrap_or_default().trim().to_string();

    state
        .repo
        .update_review(id, rating, &comment)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    state.repo.recalculate_rating(review.place_id).await?;

    let populated = state
        .repo
        .get_review_with_author(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    Ok(ApiResponse::success(populated))
}

/// delete_review
///
/// [Authenticated Route] Removes a review and re-aggregates its place before
/// responding. Allowed for the author and for admin/superUser roles.
#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not author or admin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_review(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let review = state
        .repo
        .get_review(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    if !auth::can_modify(user_id, &role, review.user_id) {
        return Err(ApiError::forbidden("Not authorized to delete this review"));
    }

    state.repo.delete_review(id).await?;
    state.repo.recalculate_rating(review.place_id).await?;

    REVIEWS_LOG.info(&format!("review deleted: {}", id));

    Ok(ApiResponse::success(json!({})).with_message("Review deleted successfully"))
}

/// get_my_reviews
///
/// [Authenticated Route] The caller's reviews, each with its place populated
/// (title and image), newest first.
#[utoipa::path(
    get,
    path = "/api/reviews/my-reviews",
    responses((status = 200, description = "My reviews", body = [ReviewWithPlace]))
)]
pub async fn get_my_reviews(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Vec<ReviewWithPlace>> {
    let reviews = state.repo.reviews_with_place_for_user(id).await?;
    let count = reviews.len();
    Ok(ApiResponse::success(reviews).with_count(count))
}

// --- Service Handlers ---

/// health
///
/// [Public Route] Liveness endpoint for monitors and load balancers.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": format!("{:?}", state.config.env).to_lowercase(),
    }))
}

/// not_found
///
/// Global fallback for unknown routes: the uniform 404 error envelope.
/// Internal detail of real failures is logged, never echoed; this handler
/// only ever reports the route miss.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
