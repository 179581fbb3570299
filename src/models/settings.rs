use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::id::UserId;
use crate::database::{ErrorExt, Result};

/// Whether the user wants to be approached about new roles. Shown as a
/// badge on the public page.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "availability", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    #[default]
    Open,
    Busy,
    NotLooking,
}

#[derive(Debug, FromRow, PartialEq, Eq)]
pub struct UserSettings {
    pub user_id: UserId,
    pub availability: Availability,
}

impl UserSettings {
    /// Creates the default settings row unless one already exists.
    /// Safe under concurrent first reads; the row is only ever
    /// inserted once.
    #[tracing::instrument(skip(conn))]
    pub async fn provision(conn: &mut sqlx::PgConnection, user_id: UserId) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO "user_settings" (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING"#,
        )
        .bind(user_id)
        .execute(conn)
        .await
        .into_db_error()?;

        Ok(())
    }

    #[tracing::instrument(skip(conn))]
    pub async fn upsert(
        conn: &mut sqlx::PgConnection,
        user_id: UserId,
        availability: Availability,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "user_settings" (user_id, availability)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET availability = EXCLUDED.availability
            RETURNING *"#,
        )
        .bind(user_id)
        .bind(availability)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(conn))]
    pub async fn by_user_id(
        conn: &mut sqlx::PgConnection,
        user_id: UserId,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "user_settings" WHERE user_id = $1"#)
            .bind(user_id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::Availability;

    #[test]
    fn availability_wire_names() {
        assert_eq!(
            serde_json::to_value(Availability::NotLooking).unwrap(),
            serde_json::json!("NOT_LOOKING")
        );

        let parsed: Availability = serde_json::from_str("\"OPEN\"").unwrap();
        assert_eq!(parsed, Availability::Open);
    }

    #[test]
    fn availability_defaults_to_open() {
        assert_eq!(Availability::default(), Availability::Open);
    }
}
