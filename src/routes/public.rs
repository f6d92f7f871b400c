use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client
/// (anonymous or logged-in): read-only place and review data, plus the auth
/// gateway (register/login).
///
/// Route-order note: `/api/places/nearby/{longitude}/{latitude}` must be
/// registered alongside `/api/places/{id}` - Axum routes literal segments
/// before captures, so `nearby` never collides with a place id.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load
        // balancer checks.
        .route("/health", get(handlers::health))
        // POST /api/auth/register
        // New account creation: validates the payload, hashes the password,
        // stores the user and returns a signed bearer token.
        .route("/api/auth/register", post(handlers::register))
        // POST /api/auth/login
        // Credential verification and token issuance.
        .route("/api/auth/login", post(handlers::login))
        // GET /api/places?tags=...&minRating=...&limit=...&page=...
        // The paginated place listing with tag/rating filters and the
        // 5-most-recent-reviews embed per place.
        .route("/api/places", get(handlers::get_all_places))
        // GET /api/places/nearby/{longitude}/{latitude}?maxDistance=...
        // Proximity scan: haversine distance from the query point, ascending.
        .route(
            "/api/places/nearby/{longitude}/{latitude}",
            get(handlers::get_places_nearby),
        )
        // GET /api/places/{id}
        // Single place with populated creator and full review list.
        .route("/api/places/{id}", get(handlers::get_place))
        // GET /api/places/{placeId}/reviews
        // All reviews for a place, author populated, newest first.
        .route("/api/places/{placeId}/reviews", get(handlers::get_reviews))
}
