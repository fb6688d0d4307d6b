// Repository layer for PostgreSQL
//
// Queries are runtime-checked (no compile-time DATABASE_URL requirement) and
// always list their columns explicitly. Ids are generated app-side with UUID
// v7 so both backends produce time-ordered ids.
//
// The admission decision (`register_for_event`) is the one operation here
// with real concurrency hazards; see its comment for the locking discipline.

use sqlx::PgPool;
use uuid::Uuid;

use gather_core::{AdmissionOutcome, GatherError, JoinOutcome, PaymentStatus, Result};

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending migrations (embedded into the binary at compile time)
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| GatherError::database(e.to_string()))?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRow> {
        let inserted = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, role, bio, city, interests)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, email, password_hash, first_name, last_name, role, bio, city, interests, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.role.to_string())
        .bind(&input.bio)
        .bind(&input.city)
        .bind(&input.interests)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(GatherError::validation("email is already registered"))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, role, bio, city, interests, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, role, bio, city, interests, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn set_user_role(&self, id: Uuid, role: gather_core::UserRole) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(role.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_users(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ============================================
    // Clubs
    // ============================================

    pub async fn create_club(&self, input: CreateClub) -> Result<ClubRow> {
        let row = sqlx::query_as::<_, ClubRow>(
            r#"
            INSERT INTO clubs (id, name, description, city, category, manager_id, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, city, category, manager_id, image_url, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.city)
        .bind(&input.category)
        .bind(input.manager_id)
        .bind(&input.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_club(&self, id: Uuid) -> Result<Option<ClubRow>> {
        let row = sqlx::query_as::<_, ClubRow>(
            r#"
            SELECT id, name, description, city, category, manager_id, image_url, created_at
            FROM clubs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_clubs(&self, filter: ClubFilter) -> Result<Vec<ClubRow>> {
        let rows = sqlx::query_as::<_, ClubRow>(
            r#"
            SELECT id, name, description, city, category, manager_id, image_url, created_at
            FROM clubs
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR city ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(&filter.category)
        .bind(&filter.city)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_clubs_for_user(&self, user_id: Uuid) -> Result<Vec<ClubRow>> {
        let rows = sqlx::query_as::<_, ClubRow>(
            r#"
            SELECT c.id, c.name, c.description, c.city, c.category, c.manager_id, c.image_url, c.created_at
            FROM clubs c
            JOIN club_memberships m ON m.club_id = c.id
            WHERE m.user_id = $1
            ORDER BY m.joined_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_clubs(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clubs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_members_for_club(&self, club_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM club_memberships WHERE club_id = $1")
                .bind(club_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (id, title, description, category, starts_at, location, city,
                                price_cents, capacity, image_url, creator_id, club_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, title, description, category, starts_at, location, city,
                      price_cents, capacity, image_url, creator_id, club_id, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.starts_at)
        .bind(&input.location)
        .bind(&input.city)
        .bind(input.price_cents)
        .bind(input.capacity)
        .bind(&input.image_url)
        .bind(input.creator_id)
        .bind(input.club_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, category, starts_at, location, city,
                   price_cents, capacity, image_url, creator_id, club_id, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_upcoming_events(&self, filter: EventFilter) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, category, starts_at, location, city,
                   price_cents, capacity, image_url, creator_id, club_id, created_at
            FROM events
            WHERE starts_at > NOW()
              AND ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR city ILIKE '%' || $2 || '%')
            ORDER BY starts_at ASC
            LIMIT $3
            "#,
        )
        .bind(&filter.category)
        .bind(&filter.city)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_upcoming_events_for_club(&self, club_id: Uuid) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, category, starts_at, location, city,
                   price_cents, capacity, image_url, creator_id, club_id, created_at
            FROM events
            WHERE club_id = $1
              AND starts_at > NOW()
            ORDER BY starts_at ASC
            "#,
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_registered_upcoming_events(&self, user_id: Uuid) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT e.id, e.title, e.description, e.category, e.starts_at, e.location, e.city,
                   e.price_cents, e.capacity, e.image_url, e.creator_id, e.club_id, e.created_at
            FROM events e
            JOIN event_registrations r ON r.event_id = e.id
            WHERE r.user_id = $1
              AND e.starts_at > NOW()
            ORDER BY e.starts_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_events(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_event_cities(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT city) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ============================================
    // Registrations (admission)
    // ============================================

    /// Admission decision for one (user, event) pair.
    ///
    /// The whole check-then-insert runs as one transaction holding an
    /// exclusive lock on the event row, so no concurrent admission for the
    /// same event can interleave between the occupancy count and the insert.
    /// The wait for the row lock is bounded; timing out surfaces as a
    /// transient error the caller may retry from the top.
    pub async fn register_for_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<AdmissionOutcome> {
        let mut tx = self.pool.begin().await?;

        // Lock timeout surfaces as SQLSTATE 55P03, classified transient.
        sqlx::query("SET LOCAL lock_timeout = '2s'")
            .execute(&mut *tx)
            .await?;

        let event = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, category, starts_at, location, city,
                   price_cents, capacity, image_url, creator_id, club_id, created_at
            FROM events
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(event) = event else {
            tx.rollback().await?;
            return Ok(AdmissionOutcome::NotFound);
        };

        let occupancy: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM event_registrations WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&mut *tx)
                .await?;

        if occupancy >= i64::from(event.capacity) {
            tx.rollback().await?;
            return Ok(AdmissionOutcome::EventFull);
        }

        let payment_status = PaymentStatus::for_price(event.price_cents);
        let inserted = sqlx::query_as::<_, RegistrationRow>(
            r#"
            INSERT INTO event_registrations (id, user_id, event_id, payment_status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, event_id, payment_status, payment_ref, registered_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(event_id)
        .bind(payment_status.to_string())
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(row) => {
                tx.commit().await?;
                Ok(AdmissionOutcome::Admitted {
                    registration: row.into(),
                })
            }
            // The uniqueness constraint holds even if the locking discipline
            // were imperfect; hitting it means this user already has a spot.
            // Roll back fully so the attempt leaves no partial state.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tx.rollback().await?;
                Ok(AdmissionOutcome::AlreadyRegistered)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_registration(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<RegistrationRow>> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, user_id, event_id, payment_status, payment_ref, registered_at
            FROM event_registrations
            WHERE user_id = $1 AND event_id = $2
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn count_registrations_for_event(&self, event_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM event_registrations WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    // ============================================
    // Memberships
    // ============================================

    /// Join decision for one (user, club) pair.
    ///
    /// No capacity budget, so no lock: the insert is guarded only by the
    /// uniqueness constraint, and a duplicate resolves to AlreadyMember.
    pub async fn join_club(&self, user_id: Uuid, club_id: Uuid) -> Result<JoinOutcome> {
        if self.get_club(club_id).await?.is_none() {
            return Ok(JoinOutcome::NotFound);
        }

        let inserted = sqlx::query_as::<_, MembershipRow>(
            r#"
            INSERT INTO club_memberships (id, user_id, club_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, club_id, joined_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(club_id)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => Ok(JoinOutcome::Joined {
                membership: row.into(),
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(JoinOutcome::AlreadyMember)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_membership(
        &self,
        user_id: Uuid,
        club_id: Uuid,
    ) -> Result<Option<MembershipRow>> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT id, user_id, club_id, joined_at
            FROM club_memberships
            WHERE user_id = $1 AND club_id = $2
            "#,
        )
        .bind(user_id)
        .bind(club_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Contact messages
    // ============================================

    pub async fn create_contact_message(
        &self,
        input: CreateContactMessage,
    ) -> Result<ContactMessageRow> {
        let row = sqlx::query_as::<_, ContactMessageRow>(
            r#"
            INSERT INTO contact_messages (id, name, email, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, message, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
