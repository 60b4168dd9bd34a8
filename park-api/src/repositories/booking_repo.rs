//! Queries run inside a booking transaction.

use sqlx::PgConnection;

use super::{repo_error::RepositoryError, DatabaseActivity};

/// Key columns shared by `capacity_slots` and `bookings`.
#[derive(Debug, Clone, Copy)]
pub struct DatabaseScheduleKey {
    pub activity_id: i32,
    pub time_slot_id: i32,
    pub visit_date: time::Date,
}

pub struct NewDatabaseVisitor<'a> {
    pub national_id: &'a str,
    pub name: &'a str,
    pub age: i32,
    pub size: Option<&'a str>,
}

/// Booking queries; every function runs on the caller's transaction.
pub struct BookingRepo;

impl BookingRepo {
    pub async fn find_activity(
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<Option<DatabaseActivity>, RepositoryError> {
        let activity = sqlx::query_as::<_, DatabaseActivity>(
            "SELECT id, name, requires_size, description, terms FROM activities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(activity)
    }

    pub async fn time_slot_exists(conn: &mut PgConnection, id: i32) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM time_slots WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await?;

        Ok(exists)
    }

    /// Read the remaining capacity and hold a row lock until the transaction ends.
    pub async fn lock_capacity(
        conn: &mut PgConnection,
        key: &DatabaseScheduleKey,
    ) -> Result<Option<i32>, RepositoryError> {
        let capacity: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT capacity
            FROM capacity_slots
            WHERE activity_id = $1 AND time_slot_id = $2 AND visit_date = $3
            FOR UPDATE
            "#,
        )
        .bind(key.activity_id)
        .bind(key.time_slot_id)
        .bind(key.visit_date)
        .fetch_optional(conn)
        .await?;

        Ok(capacity)
    }

    pub async fn find_visitor_id(
        conn: &mut PgConnection,
        national_id: &str,
    ) -> Result<Option<i32>, RepositoryError> {
        let id: Option<i32> = sqlx::query_scalar("SELECT id FROM visitors WHERE national_id = $1")
            .bind(national_id)
            .fetch_optional(conn)
            .await?;

        Ok(id)
    }

    /// Insert the visitor unless the national id is taken.
    ///
    /// Returns `None` if another transaction created it first.
    pub async fn insert_visitor(
        conn: &mut PgConnection,
        visitor: &NewDatabaseVisitor<'_>,
    ) -> Result<Option<i32>, RepositoryError> {
        let id: Option<i32> = sqlx::query_scalar(
            r#"
            INSERT INTO visitors (national_id, name, age, size)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (national_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(visitor.national_id)
        .bind(visitor.name)
        .bind(visitor.age)
        .bind(visitor.size)
        .fetch_optional(conn)
        .await?;

        Ok(id)
    }

    pub async fn insert_booking(
        conn: &mut PgConnection,
        visitor_id: i32,
        key: &DatabaseScheduleKey,
    ) -> Result<i32, RepositoryError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (visitor_id, activity_id, time_slot_id, visit_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(visitor_id)
        .bind(key.activity_id)
        .bind(key.time_slot_id)
        .bind(key.visit_date)
        .fetch_one(conn)
        .await?;

        Ok(id)
    }

    /// Subtract one place if any is left. Returns whether a row changed.
    pub async fn decrement_capacity(
        conn: &mut PgConnection,
        key: &DatabaseScheduleKey,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE capacity_slots
            SET capacity = capacity - 1
            WHERE activity_id = $1 AND time_slot_id = $2 AND visit_date = $3 AND capacity > 0
            "#,
        )
        .bind(key.activity_id)
        .bind(key.time_slot_id)
        .bind(key.visit_date)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
