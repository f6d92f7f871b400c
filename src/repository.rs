use crate::models::{
    EmbeddedReview, Place, PlaceFilter, PlaceImage, PlaceWithCreator, Review, ReviewWithAuthor,
    ReviewWithPlace, UpdateUserRequest, User,
};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool, query_builder::QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

/// NewPlace
///
/// A fully validated place document, ready for insertion or full replacement.
/// Built by the handlers after the rule table has passed, so the repository
/// never sees partial or out-of-range values.
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub title: String,
    pub image: PlaceImage,
    pub longitude: f64,
    pub latitude: f64,
    pub summary: String,
    pub tags: Vec<String>,
}

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, allowing the
/// handlers to interact with the data layer without knowing the specific
/// implementation (Postgres, mock, etc.).
///
/// Every method returns `Result` so store failures propagate to the handlers,
/// which map them onto the error envelope; nothing is swallowed down here.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    // Registration: role is always 'user'; elevated roles are granted out of band.
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error>;
    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error>;
    // Partial update via COALESCE; returns None when the id does not resolve.
    async fn update_user(
        &self,
        id: Uuid,
        req: UpdateUserRequest,
    ) -> Result<Option<User>, sqlx::Error>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Places ---
    // Filtered, paginated page plus the total matching count.
    async fn list_places(&self, filter: &PlaceFilter) -> Result<(Vec<Place>, i64), sqlx::Error>;
    // The most recent reviews (author name only) for each of the given places,
    // capped per place. Returned as (place_id, review) pairs, newest first
    // within each place.
    async fn recent_reviews_for_places(
        &self,
        place_ids: &[Uuid],
        per_place: i64,
    ) -> Result<Vec<(Uuid, EmbeddedReview)>, sqlx::Error>;
    async fn get_place(&self, id: Uuid) -> Result<Option<Place>, sqlx::Error>;
    async fn get_place_with_creator(
        &self,
        id: Uuid,
    ) -> Result<Option<PlaceWithCreator>, sqlx::Error>;
    // Full scan for the nearby query; distance math happens in the handler.
    async fn all_places_with_creator(&self) -> Result<Vec<PlaceWithCreator>, sqlx::Error>;
    async fn create_place(&self, place: NewPlace, created_by: Uuid) -> Result<Place, sqlx::Error>;
    // Full-document replacement. Authorization happens in the handler, which
    // loads the place first to run the ownership predicate.
    async fn update_place(&self, id: Uuid, place: NewPlace) -> Result<Option<Place>, sqlx::Error>;
    // Cascades: deletes the place's reviews, then the place, in one transaction.
    async fn delete_place(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Reviews ---
    async fn get_review(&self, id: Uuid) -> Result<Option<Review>, sqlx::Error>;
    // The application-level duplicate pre-check; the unique index remains the
    // authority under concurrency.
    async fn find_review_by_user_and_place(
        &self,
        user_id: Uuid,
        place_id: Uuid,
    ) -> Result<Option<Review>, sqlx::Error>;
    async fn create_review(
        &self,
        place_id: Uuid,
        user_id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<Review, sqlx::Error>;
    async fn update_review(
        &self,
        id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<Option<Review>, sqlx::Error>;
    async fn delete_review(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    async fn get_review_with_author(
        &self,
        id: Uuid,
    ) -> Result<Option<ReviewWithAuthor>, sqlx::Error>;
    // All reviews of a place, author populated, newest first.
    async fn reviews_with_author_for_place(
        &self,
        place_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error>;
    // All reviews of a place in embedded form (author name only), newest first.
    async fn embedded_reviews_for_place(
        &self,
        place_id: Uuid,
    ) -> Result<Vec<EmbeddedReview>, sqlx::Error>;
    // The caller's reviews with each place populated, newest first.
    async fn reviews_with_place_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ReviewWithPlace>, sqlx::Error>;

    // --- Aggregation ---
    // Recomputes average_rating (mean rounded to one decimal) and review_count
    // from the live review set; resets both to 0 with no reviews. Must complete
    // before the triggering request responds.
    async fn recalculate_rating(&self, place_id: Uuid) -> Result<(), sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// All queries use the runtime-bound sqlx API.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Column list for queries returning PlaceWithCreator rows.
const PLACE_WITH_CREATOR_COLS: &str = "p.id, p.title, p.image_src, p.image_alt, \
     p.image_thumbnail, p.longitude, p.latitude, p.summary, p.tags, \
     p.average_rating, p.review_count, p.created_at, p.updated_at, \
     u.id AS creator_id, u.name AS creator_name, u.email AS creator_email";

// Row shape for the windowed recent-reviews query; carries the owning place id
// alongside the embedded review columns.
#[derive(FromRow)]
struct PlacedReviewRow {
    place_id: Uuid,
    #[sqlx(flatten)]
    review: EmbeddedReview,
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    /// get_user
    ///
    /// Retrieves the full user record (including the password hash, which the
    /// serializer strips) for authentication and profile lookups.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// get_user_by_email
    ///
    /// Login lookup; email is unique so at most one row matches.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// create_user
    ///
    /// Inserts a new user with the default 'user' role. A duplicate email
    /// violates the unique constraint and surfaces as a database error the
    /// caller maps to a 400.
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, 'user', NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }

    /// list_users
    ///
    /// All users, newest first. Password hashes never serialize, so returning
    /// the full row here is safe.
    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    /// update_user
    ///
    /// Uses COALESCE so only the provided fields are written, leaving the rest
    /// untouched.
    async fn update_user(
        &self,
        id: Uuid,
        req: UpdateUserRequest,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users \
             SET name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(req.name)
        .bind(req.email)
        .fetch_optional(&self.pool)
        .await
    }

    /// delete_user
    ///
    /// Returns true only if a row was removed.
    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- PLACES ---

    /// list_places
    ///
    /// Implements the tag/rating filters and pagination with QueryBuilder for
    /// safe parameterization. The same WHERE clauses drive both the page query
    /// and the total count so the two can never disagree.
    async fn list_places(&self, filter: &PlaceFilter) -> Result<(Vec<Place>, i64), sqlx::Error> {
        // Shared filter clauses; tags uses array overlap to match the
        // any-of-these-tags semantics of the listing contract.
        let push_filters = |builder: &mut QueryBuilder<sqlx::Postgres>| {
            if let Some(tags) = &filter.tags {
                builder.push(" AND tags && ");
                builder.push_bind(tags.clone());
            }
            if let Some(min_rating) = filter.min_rating {
                builder.push(" AND average_rating >= ");
                builder.push_bind(min_rating);
            }
        };

        let mut count_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM places WHERE TRUE");
        push_filters(&mut count_builder);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT * FROM places WHERE TRUE");
        push_filters(&mut builder);
        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(filter.limit);
        builder.push(" OFFSET ");
        builder.push_bind((filter.page - 1) * filter.limit);

        let places = builder
            .build_query_as::<Place>()
            .fetch_all(&self.pool)
            .await?;

        Ok((places, total))
    }

    /// recent_reviews_for_places
    ///
    /// One windowed query for the whole page: rank each place's reviews by
    /// recency and keep the top `per_place`, instead of a query per place.
    async fn recent_reviews_for_places(
        &self,
        place_ids: &[Uuid],
        per_place: i64,
    ) -> Result<Vec<(Uuid, EmbeddedReview)>, sqlx::Error> {
        if place_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, PlacedReviewRow>(
            "SELECT place_id, id, rating, comment, author_id, author_name, created_at FROM ( \
                 SELECT r.place_id, r.id, r.rating, r.comment, \
                        u.id AS author_id, u.name AS author_name, r.created_at, \
                        ROW_NUMBER() OVER (PARTITION BY r.place_id ORDER BY r.created_at DESC) AS rn \
                 FROM reviews r \
                 JOIN users u ON r.user_id = u.id \
                 WHERE r.place_id = ANY($1) \
             ) ranked \
             WHERE rn <= $2 \
             ORDER BY place_id, created_at DESC",
        )
        .bind(place_ids.to_vec())
        .bind(per_place)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.place_id, row.review))
            .collect())
    }

    /// get_place
    ///
    /// Raw row retrieval, used before mutations to run the ownership predicate.
    async fn get_place(&self, id: Uuid) -> Result<Option<Place>, sqlx::Error> {
        sqlx::query_as::<_, Place>("SELECT * FROM places WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// get_place_with_creator
    ///
    /// The populated variant for the single-place view and mutation responses.
    async fn get_place_with_creator(
        &self,
        id: Uuid,
    ) -> Result<Option<PlaceWithCreator>, sqlx::Error> {
        let sql = format!(
            "SELECT {PLACE_WITH_CREATOR_COLS} FROM places p \
             JOIN users u ON p.created_by = u.id WHERE p.id = $1"
        );
        sqlx::query_as::<_, PlaceWithCreator>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// all_places_with_creator
    ///
    /// Loads every place for the nearby full scan.
    async fn all_places_with_creator(&self) -> Result<Vec<PlaceWithCreator>, sqlx::Error> {
        let sql = format!(
            "SELECT {PLACE_WITH_CREATOR_COLS} FROM places p \
             JOIN users u ON p.created_by = u.id"
        );
        sqlx::query_as::<_, PlaceWithCreator>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    /// create_place
    ///
    /// Inserts a new place with derived rating fields at their zero state.
    async fn create_place(&self, place: NewPlace, created_by: Uuid) -> Result<Place, sqlx::Error> {
        sqlx::query_as::<_, Place>(
            "INSERT INTO places \
             (id, title, image_src, image_alt, image_thumbnail, longitude, latitude, \
              summary, tags, created_by, average_rating, review_count, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0, 0, NOW(), NOW()) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(place.title)
        .bind(place.image.src)
        .bind(place.image.alt)
        .bind(place.image.thumbnail)
        .bind(place.longitude)
        .bind(place.latitude)
        .bind(place.summary)
        .bind(place.tags)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
    }

    /// update_place
    ///
    /// Full-document replacement of the mutable fields; derived fields and the
    /// creator are untouched.
    async fn update_place(&self, id: Uuid, place: NewPlace) -> Result<Option<Place>, sqlx::Error> {
        sqlx::query_as::<_, Place>(
            "UPDATE places \
             SET title = $2, image_src = $3, image_alt = $4, image_thumbnail = $5, \
                 longitude = $6, latitude = $7, summary = $8, tags = $9, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(place.title)
        .bind(place.image.src)
        .bind(place.image.alt)
        .bind(place.image.thumbnail)
        .bind(place.longitude)
        .bind(place.latitude)
        .bind(place.summary)
        .bind(place.tags)
        .fetch_optional(&self.pool)
        .await
    }

    /// delete_place
    ///
    /// The cascade: every review referencing the place goes first, then the
    /// place itself, atomically.
    async fn delete_place(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reviews WHERE place_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    // --- REVIEWS ---

    /// get_review
    ///
    /// Raw row retrieval, used before mutations for the author ownership check.
    async fn get_review(&self, id: Uuid) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// find_review_by_user_and_place
    ///
    /// The friendly duplicate pre-check. The unique index on (user_id,
    /// place_id) stays authoritative when two creates race.
    async fn find_review_by_user_and_place(
        &self,
        user_id: Uuid,
        place_id: Uuid,
    ) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE user_id = $1 AND place_id = $2")
            .bind(user_id)
            .bind(place_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// create_review
    ///
    /// Plain insert; the duplicate constraint violation (if any) propagates to
    /// the caller as a database error.
    async fn create_review(
        &self,
        place_id: Uuid,
        user_id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<Review, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (id, rating, comment, user_id, place_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(rating)
        .bind(comment)
        .bind(user_id)
        .bind(place_id)
        .fetch_one(&self.pool)
        .await
    }

    /// update_review
    ///
    /// Replaces rating and comment; author and place references are immutable.
    async fn update_review(
        &self,
        id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "UPDATE reviews SET rating = $2, comment = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(rating)
        .bind(comment)
        .fetch_optional(&self.pool)
        .await
    }

    /// delete_review
    ///
    /// Returns true only if a row was removed.
    async fn delete_review(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// get_review_with_author
    ///
    /// The populated variant returned by review create/update.
    async fn get_review_with_author(
        &self,
        id: Uuid,
    ) -> Result<Option<ReviewWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithAuthor>(
            "SELECT r.id, r.rating, r.comment, r.place_id, r.created_at, r.updated_at, \
                    u.id AS creator_id, u.name AS creator_name, u.email AS creator_email \
             FROM reviews r JOIN users u ON r.user_id = u.id WHERE r.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// reviews_with_author_for_place
    ///
    /// The review listing for a place, author populated, newest first.
    async fn reviews_with_author_for_place(
        &self,
        place_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithAuthor>(
            "SELECT r.id, r.rating, r.comment, r.place_id, r.created_at, r.updated_at, \
                    u.id AS creator_id, u.name AS creator_name, u.email AS creator_email \
             FROM reviews r JOIN users u ON r.user_id = u.id \
             WHERE r.place_id = $1 ORDER BY r.created_at DESC",
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await
    }

    /// embedded_reviews_for_place
    ///
    /// The full embedded review set for the single-place view.
    async fn embedded_reviews_for_place(
        &self,
        place_id: Uuid,
    ) -> Result<Vec<EmbeddedReview>, sqlx::Error> {
        sqlx::query_as::<_, EmbeddedReview>(
            "SELECT r.id, r.rating, r.comment, u.id AS author_id, u.name AS author_name, \
                    r.created_at \
             FROM reviews r JOIN users u ON r.user_id = u.id \
             WHERE r.place_id = $1 ORDER BY r.created_at DESC",
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await
    }

    /// reviews_with_place_for_user
    ///
    /// The my-reviews listing: the caller's reviews with each place populated
    /// (title and image), newest first.
    async fn reviews_with_place_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ReviewWithPlace>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithPlace>(
            "SELECT r.id, r.rating, r.comment, r.user_id, r.place_id, p.title, \
                    p.image_src, p.image_alt, p.image_thumbnail, r.created_at, r.updated_at \
             FROM reviews r JOIN places p ON r.place_id = p.id \
             WHERE r.user_id = $1 ORDER BY r.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    // --- AGGREGATION ---

    /// recalculate_rating
    ///
    /// Recomputes the derived rating fields from the live review set and
    /// persists them. Runs synchronously in the request that mutated the
    /// review set, before that request responds. Not transactionally coupled
    /// to the triggering write: concurrent writers race benignly and the last
    /// recomputation wins.
    async fn recalculate_rating(&self, place_id: Uuid) -> Result<(), sqlx::Error> {
        let (average, count): (Option<f64>, i64) = sqlx::query_as(
            "SELECT AVG(rating)::float8, COUNT(*) FROM reviews WHERE place_id = $1",
        )
        .bind(place_id)
        .fetch_one(&self.pool)
        .await?;

        // Mean rounded to one decimal place; zero reviews resets both fields.
        let average_rating = average.map(|a| (a * 10.0).round() / 10.0).unwrap_or(0.0);

        sqlx::query("UPDATE places SET average_rating = $2, review_count = $3 WHERE id = $1")
            .bind(place_id)
            .bind(average_rating)
            .bind(count as i32)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
