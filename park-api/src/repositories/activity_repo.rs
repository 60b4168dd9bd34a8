use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_error::RepositoryError;

#[async_trait]
pub trait ActivityRepository {
    async fn list_with_capacity(&self) -> Result<Vec<DatabaseActivitySummary>, RepositoryError>;
    async fn get_activity(&self, id: i32) -> Result<Option<DatabaseActivity>, RepositoryError>;
    async fn get_schedule(
        &self,
        activity_id: i32,
    ) -> Result<Vec<DatabaseScheduleEntry>, RepositoryError>;
    async fn ping(&self) -> Result<(), RepositoryError>;
    async fn ensure_activity(&self, activity: &NewDatabaseActivity) -> Result<i32, RepositoryError>;
    async fn ensure_time_slot(&self, starts_at: &time::Time) -> Result<i32, RepositoryError>;
    async fn insert_capacity_rows(
        &self,
        rows: &[DatabaseCapacityRow],
    ) -> Result<u64, RepositoryError>;
}

pub struct ActivityRepositoryImpl {
    pool: PgPool,
}

impl ActivityRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DatabaseActivity {
    pub id: i32,
    pub name: String,
    pub requires_size: bool,
    pub description: Option<String>,
    pub terms: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DatabaseActivitySummary {
    pub id: i32,
    pub name: String,
    pub requires_size: bool,
    pub description: Option<String>,
    pub terms: Option<String>,
    pub total_capacity: i64,
    pub schedule_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DatabaseScheduleEntry {
    pub time_slot_id: i32,
    pub starts_at: time::Time,
    pub visit_date: time::Date,
    pub capacity: i32,
}

pub struct NewDatabaseActivity {
    pub name: String,
    pub requires_size: bool,
    pub description: Option<String>,
    pub terms: Option<String>,
}

pub struct DatabaseCapacityRow {
    pub activity_id: i32,
    pub time_slot_id: i32,
    pub visit_date: time::Date,
    pub capacity: i32,
}

/// Column list for the `activities` table.
const ACTIVITY_COLUMNS: &str = "id, name, requires_size, description, terms";

#[async_trait]
impl ActivityRepository for ActivityRepositoryImpl {
    async fn list_with_capacity(&self) -> Result<Vec<DatabaseActivitySummary>, RepositoryError> {
        let summaries = sqlx::query_as::<_, DatabaseActivitySummary>(
            r#"
            SELECT a.id, a.name, a.requires_size, a.description, a.terms,
                   COALESCE(SUM(c.capacity), 0)::BIGINT AS total_capacity,
                   COUNT(c.activity_id) AS schedule_count
            FROM activities a
            LEFT JOIN capacity_slots c ON c.activity_id = a.id
            GROUP BY a.id
            ORDER BY a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    async fn get_activity(&self, id: i32) -> Result<Option<DatabaseActivity>, RepositoryError> {
        let query = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = $1");
        let activity = sqlx::query_as::<_, DatabaseActivity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(activity)
    }

    async fn get_schedule(
        &self,
        activity_id: i32,
    ) -> Result<Vec<DatabaseScheduleEntry>, RepositoryError> {
        let schedule = sqlx::query_as::<_, DatabaseScheduleEntry>(
            r#"
            SELECT t.id AS time_slot_id, t.starts_at, c.visit_date, c.capacity
            FROM capacity_slots c
            JOIN time_slots t ON t.id = c.time_slot_id
            WHERE c.activity_id = $1
            ORDER BY c.visit_date, t.starts_at
            "#,
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(schedule)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_activity(&self, activity: &NewDatabaseActivity) -> Result<i32, RepositoryError> {
        let inserted: Option<i32> = sqlx::query_scalar(
            r#"
            INSERT INTO activities (name, requires_size, description, terms)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&activity.name)
        .bind(activity.requires_size)
        .bind(&activity.description)
        .bind(&activity.terms)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(id) = inserted {
            return Ok(id);
        }

        sqlx::query_scalar("SELECT id FROM activities WHERE name = $1")
            .bind(&activity.name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(activity.name.clone()))
    }

    async fn ensure_time_slot(&self, starts_at: &time::Time) -> Result<i32, RepositoryError> {
        let inserted: Option<i32> = sqlx::query_scalar(
            r#"
            INSERT INTO time_slots (starts_at)
            VALUES ($1)
            ON CONFLICT (starts_at) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(starts_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(id) = inserted {
            return Ok(id);
        }

        sqlx::query_scalar("SELECT id FROM time_slots WHERE starts_at = $1")
            .bind(starts_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(starts_at.to_string()))
    }

    async fn insert_capacity_rows(
        &self,
        rows: &[DatabaseCapacityRow],
    ) -> Result<u64, RepositoryError> {
        let activity_ids: Vec<i32> = rows.iter().map(|r| r.activity_id).collect();
        let time_slot_ids: Vec<i32> = rows.iter().map(|r| r.time_slot_id).collect();
        let dates: Vec<time::Date> = rows.iter().map(|r| r.visit_date).collect();
        let capacities: Vec<i32> = rows.iter().map(|r| r.capacity).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO capacity_slots (activity_id, time_slot_id, visit_date, capacity)
            SELECT * FROM UNNEST($1::INT4[], $2::INT4[], $3::DATE[], $4::INT4[])
            ON CONFLICT (activity_id, time_slot_id, visit_date) DO NOTHING
            "#,
        )
        .bind(&activity_ids)
        .bind(&time_slot_ids)
        .bind(&dates)
        .bind(&capacities)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
