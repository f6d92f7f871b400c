use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Authenticated Router Module
///
/// Defines the routes accessible only to callers who pass the authentication
/// layer. Every handler here receives a validated `AuthUser` (id + role) from
/// the extractor, which drives all ownership checks: place and review
/// mutations are allowed for the resource owner and for the admin/superUser
/// roles, user-profile mutations strictly for the profile owner.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/auth/me
        // The authenticated user's own profile.
        .route("/api/auth/me", get(handlers::get_me))
        // --- Users ---
        // GET /api/users
        // Lists every user account. Password hashes never serialize.
        .route("/api/users", get(handlers::get_all_users))
        // GET/PUT/DELETE /api/users/{id}
        // Read any profile; update and delete are restricted to the owner.
        .route(
            "/api/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // --- Places ---
        // POST /api/places
        // Creates a place owned by the caller (`createdBy` is never client-supplied).
        .route("/api/places", post(handlers::create_place))
        // PUT/DELETE /api/places/{id}
        // Full-document update and cascading delete, gated by the ownership
        // predicate (creator or admin/superUser).
        .route(
            "/api/places/{id}",
            put(handlers::update_place).delete(handlers::delete_place),
        )
        // --- Reviews ---
        // POST /api/places/{placeId}/reviews
        // One review per user per place; triggers rating aggregation before
        // the response is sent.
        .route(
            "/api/places/{placeId}/reviews",
            post(handlers::create_review),
        )
        // GET /api/reviews/my-reviews
        // The caller's own reviews with each place populated.
        .route("/api/reviews/my-reviews", get(handlers::get_my_reviews))
        // PUT/DELETE /api/reviews/{id}
        // Author-or-admin mutations; both re-aggregate the review's place.
        .route(
            "/api/reviews/{id}",
            put(handlers::update_review).delete(handlers::delete_review),
        )
}
