use chrono::NaiveDateTime;
use sqlx::FromRow;

use super::id::UserId;
use crate::database::{ErrorExt, Result};

#[derive(Debug, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    /// Stable identity assigned by the OAuth provider at first login,
    /// e.g. `github:183456`.
    pub provider_id: String,
    pub name: Option<String>,
    /// Public URL slug; stored lowercase, NULL until the first save.
    pub handle: Option<String>,
}

/// One row of the sitemap: a published handle plus its freshness stamp.
#[derive(Debug, FromRow, PartialEq, Eq)]
pub struct PublishedHandle {
    pub handle: String,
    pub updated_at: Option<NaiveDateTime>,
}

impl User {
    #[tracing::instrument(skip(conn))]
    pub async fn by_id(conn: &mut sqlx::PgConnection, id: UserId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip(conn))]
    pub async fn by_handle(conn: &mut sqlx::PgConnection, handle: &str) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE handle = $1"#)
            .bind(handle)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    /// First login creates the row; later logins refresh the display
    /// name the provider reports unless the user has set their own.
    #[tracing::instrument(skip(conn))]
    pub async fn upsert_from_provider(
        conn: &mut sqlx::PgConnection,
        provider_id: &str,
        name: Option<&str>,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "users" (provider_id, name)
            VALUES ($1, $2)
            ON CONFLICT (provider_id) DO UPDATE
                SET name = COALESCE("users".name, EXCLUDED.name)
            RETURNING *"#,
        )
        .bind(provider_id)
        .bind(name)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    /// Updates the caller-editable identity fields. The unique
    /// constraint on `handle` fires here when another user holds the
    /// requested handle.
    #[tracing::instrument(skip(conn))]
    pub async fn update_identity(
        conn: &mut sqlx::PgConnection,
        id: UserId,
        name: &str,
        handle: &str,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE "users"
            SET name = $2, handle = $3, updated_at = now()
            WHERE id = $1
            RETURNING *"#,
        )
        .bind(id)
        .bind(name)
        .bind(handle)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(conn))]
    pub async fn touch(conn: &mut sqlx::PgConnection, id: UserId) -> Result<()> {
        sqlx::query(r#"UPDATE "users" SET updated_at = now() WHERE id = $1"#)
            .bind(id)
            .execute(conn)
            .await
            .into_db_error()?;

        Ok(())
    }

    /// Every user that is reachable through the public page: a non-null
    /// handle with a published profile.
    #[tracing::instrument(skip(conn))]
    pub async fn published_handles(conn: &mut sqlx::PgConnection) -> Result<Vec<PublishedHandle>> {
        sqlx::query_as::<_, PublishedHandle>(
            r#"SELECT u.handle, u.updated_at
            FROM "users" u
            INNER JOIN "profiles" p ON p.user_id = u.id
            WHERE u.handle IS NOT NULL AND p.is_public
            ORDER BY u.handle"#,
        )
        .fetch_all(conn)
        .await
        .into_db_error()
    }
}
