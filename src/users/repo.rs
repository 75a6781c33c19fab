use axum::async_trait;
use sqlx::PgPool;

use crate::users::repo_types::{NewUser, User, UserChanges};

/// Persistence gateway for the `users` table. Object-safe so the service
/// can run against an in-memory fake in tests.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<User>>;
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn insert(&self, new: NewUser) -> anyhow::Result<User>;
    async fn update(&self, id: i32, changes: UserChanges) -> anyhow::Result<Option<User>>;
    async fn delete(&self, id: i32) -> anyhow::Result<bool>;
}

/// True when the error is a Postgres unique violation (23505). Lets the
/// service classify the insert that lost a create/create race.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505")
    )
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, photo, created_at, updated_at";

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at DESC
            "#,
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1
            "#,
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role, photo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(new.name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.role)
        .bind(new.photo)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $1, email = $2, password_hash = $3, role = $4, photo = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.role)
        .bind(changes.photo)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
