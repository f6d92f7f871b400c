// Shared test scaffolding: a controllable mock Repository plus state and
// fixture builders. Handlers depend on the trait, so the mock is the central
// control point for exercising handler logic without a database.
#![allow(dead_code)]

use async_trait::async_trait;
use places_portal::{
    AppState,
    auth::AuthUser,
    config::AppConfig,
    models::{
        EmbeddedReview, Place, PlaceFilter, PlaceWithCreator, Review, ReviewWithAuthor,
        ReviewWithPlace, UpdateUserRequest, User,
    },
    repository::{NewPlace, Repository},
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const TEST_USER_ID: Uuid = Uuid::from_u128(123);
pub const TEST_ADMIN_ID: Uuid = Uuid::from_u128(456);
pub const TEST_OTHER_ID: Uuid = Uuid::from_u128(789);
pub const TEST_PLACE_ID: Uuid = Uuid::from_u128(1001);
pub const TEST_REVIEW_ID: Uuid = Uuid::from_u128(2002);

/// Everything the mock records about the calls it received, so tests can
/// verify what a handler actually did (and did not do).
#[derive(Default)]
pub struct Recorded {
    pub created_place: Option<(NewPlace, Uuid)>,
    pub created_review: Option<(Uuid, Uuid, i32, String)>,
    pub recalculated_places: Vec<Uuid>,
    pub deleted_place: Option<Uuid>,
    pub deleted_review: Option<Uuid>,
    pub updated_place: bool,
    pub updated_review: bool,
    pub updated_user: bool,
    pub deleted_user: Option<Uuid>,
}

/// MockRepoControl
///
/// Pre-canned outputs for every repository method plus call recording. Fields
/// default to "empty store"; tests override only what they need.
pub struct MockRepoControl {
    pub user_to_return: Option<User>,
    pub user_by_email: Option<User>,
    pub users_to_return: Vec<User>,
    pub place_to_return: Option<Place>,
    pub place_with_creator_to_return: Option<PlaceWithCreator>,
    pub places_with_creator_to_return: Vec<PlaceWithCreator>,
    pub listing_to_return: (Vec<Place>, i64),
    pub recent_reviews_to_return: Vec<(Uuid, EmbeddedReview)>,
    pub review_to_return: Option<Review>,
    pub review_with_author_to_return: Option<ReviewWithAuthor>,
    pub existing_review: Option<Review>,
    pub reviews_with_author_to_return: Vec<ReviewWithAuthor>,
    pub embedded_reviews_to_return: Vec<EmbeddedReview>,
    pub reviews_with_place_to_return: Vec<ReviewWithPlace>,
    pub delete_result: bool,
    pub recorded: Mutex<Recorded>,
}

impl Default for MockRepoControl {
    fn default() -> Self {
        MockRepoControl {
            user_to_return: None,
            user_by_email: None,
            users_to_return: vec![],
            place_to_return: None,
            place_with_creator_to_return: None,
            places_with_creator_to_return: vec![],
            listing_to_return: (vec![], 0),
            recent_reviews_to_return: vec![],
            review_to_return: None,
            review_with_author_to_return: None,
            existing_review: None,
            reviews_with_author_to_return: vec![],
            embedded_reviews_to_return: vec![],
            reviews_with_place_to_return: vec![],
            // Default to success for simpler tests.
            delete_result: true,
            recorded: Mutex::new(Recorded::default()),
        }
    }
}

#[async_trait]
impl Repository for MockRepoControl {
    // --- Users ---
    async fn get_user(&self, _id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self.user_to_return.clone())
    }
    async fn get_user_by_email(&self, _email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self.user_by_email.clone())
    }
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        Ok(User {
            id: TEST_USER_ID,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: "user".to_string(),
            ..User::default()
        })
    }
    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        Ok(self.users_to_return.clone())
    }
    async fn update_user(
        &self,
        _id: Uuid,
        _req: UpdateUserRequest,
    ) -> Result<Option<User>, sqlx::Error> {
        self.recorded.lock().unwrap().updated_user = true;
        Ok(self.user_to_return.clone())
    }
    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.recorded.lock().unwrap().deleted_user = Some(id);
        Ok(self.delete_result)
    }

    // --- Places ---
    async fn list_places(&self, _filter: &PlaceFilter) -> Result<(Vec<Place>, i64), sqlx::Error> {
        Ok(self.listing_to_return.clone())
    }
    async fn recent_reviews_for_places(
        &self,
        _place_ids: &[Uuid],
        _per_place: i64,
    ) -> Result<Vec<(Uuid, EmbeddedReview)>, sqlx::Error> {
        Ok(self.recent_reviews_to_return.clone())
    }
    async fn get_place(&self, _id: Uuid) -> Result<Option<Place>, sqlx::Error> {
        Ok(self.place_to_return.clone())
    }
    async fn get_place_with_creator(
        &self,
        _id: Uuid,
    ) -> Result<Option<PlaceWithCreator>, sqlx::Error> {
        Ok(self.place_with_creator_to_return.clone())
    }
    async fn all_places_with_creator(&self) -> Result<Vec<PlaceWithCreator>, sqlx::Error> {
        Ok(self.places_with_creator_to_return.clone())
    }
    async fn create_place(&self, place: NewPlace, created_by: Uuid) -> Result<Place, sqlx::Error> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.created_place = Some((place, created_by));
        Ok(Place {
            id: TEST_PLACE_ID,
            created_by,
            ..Place::default()
        })
    }
    async fn update_place(
        &self,
        _id: Uuid,
        _place: NewPlace,
    ) -> Result<Option<Place>, sqlx::Error> {
        self.recorded.lock().unwrap().updated_place = true;
        Ok(self.place_to_return.clone())
    }
    async fn delete_place(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.recorded.lock().unwrap().deleted_place = Some(id);
        Ok(self.delete_result)
    }

    // --- Reviews ---
    async fn get_review(&self, _id: Uuid) -> Result<Option<Review>, sqlx::Error> {
        Ok(self.review_to_return.clone())
    }
    async fn find_review_by_user_and_place(
        &self,
        _user_id: Uuid,
        _place_id: Uuid,
    ) -> Result<Option<Review>, sqlx::Error> {
        Ok(self.existing_review.clone())
    }
    async fn create_review(
        &self,
        place_id: Uuid,
        user_id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<Review, sqlx::Error> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.created_review = Some((place_id, user_id, rating, comment.to_string()));
        Ok(Review {
            id: TEST_REVIEW_ID,
            rating,
            comment: comment.to_string(),
            user_id,
            place_id,
            ..Review::default()
        })
    }
    async fn update_review(
        &self,
        _id: Uuid,
        _rating: i32,
        _comment: &str,
    ) -> Result<Option<Review>, sqlx::Error> {
        self.recorded.lock().unwrap().updated_review = true;
        Ok(self.review_to_return.clone())
    }
    async fn delete_review(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.recorded.lock().unwrap().deleted_review = Some(id);
        Ok(self.delete_result)
    }
    async fn get_review_with_author(
        &self,
        _id: Uuid,
    ) -> Result<Option<ReviewWithAuthor>, sqlx::Error> {
        Ok(self.review_with_author_to_return.clone())
    }
    async fn reviews_with_author_for_place(
        &self,
        _place_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        Ok(self.reviews_with_author_to_return.clone())
    }
    async fn embedded_reviews_for_place(
        &self,
        _place_id: Uuid,
    ) -> Result<Vec<EmbeddedReview>, sqlx::Error> {
        Ok(self.embedded_reviews_to_return.clone())
    }
    async fn reviews_with_place_for_user(
        &self,
        _user_id: Uuid,
    ) -> Result<Vec<ReviewWithPlace>, sqlx::Error> {
        Ok(self.reviews_with_place_to_return.clone())
    }

    // --- Aggregation ---
    async fn recalculate_rating(&self, place_id: Uuid) -> Result<(), sqlx::Error> {
        self.recorded.lock().unwrap().recalculated_places.push(place_id);
        Ok(())
    }
}

// --- State and fixture builders ---

/// Creates an AppState over a mock repository, returning the Arc so tests can
/// inspect the recorded calls afterwards.
pub fn create_test_state(repo_control: MockRepoControl) -> (AppState, Arc<MockRepoControl>) {
    let repo = Arc::new(repo_control);
    let state = AppState {
        repo: repo.clone(),
        config: AppConfig::default(),
    };
    (state, repo)
}

pub fn regular_user() -> AuthUser {
    AuthUser {
        id: TEST_USER_ID,
        role: "user".to_string(),
    }
}

pub fn admin_user() -> AuthUser {
    AuthUser {
        id: TEST_ADMIN_ID,
        role: "admin".to_string(),
    }
}

pub fn super_user() -> AuthUser {
    AuthUser {
        id: TEST_ADMIN_ID,
        role: "superUser".to_string(),
    }
}

pub fn other_user() -> AuthUser {
    AuthUser {
        id: TEST_OTHER_ID,
        role: "user".to_string(),
    }
}

/// A place row owned by the given user.
pub fn place_owned_by(owner: Uuid) -> Place {
    Place {
        id: TEST_PLACE_ID,
        title: "Brandenburg Gate".to_string(),
        longitude: 13.405,
        latitude: 52.52,
        summary: "Neoclassical monument".to_string(),
        created_by: owner,
        ..Place::default()
    }
}

/// A review row authored by the given user on the standard test place.
pub fn review_by(author: Uuid) -> Review {
    Review {
        id: TEST_REVIEW_ID,
        rating: 4,
        comment: "Worth the detour".to_string(),
        user_id: author,
        place_id: TEST_PLACE_ID,
        ..Review::default()
    }
}

/// A populated place at the given coordinates.
pub fn place_with_creator_at(longitude: f64, latitude: f64) -> PlaceWithCreator {
    PlaceWithCreator {
        id: Uuid::new_v4(),
        title: "Somewhere".to_string(),
        longitude,
        latitude,
        ..PlaceWithCreator::default()
    }
}
