use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;

use super::id::{ExperienceId, ProfileId, ProjectId, SkillId, UserId};
use crate::database::{ErrorExt, Result};
use crate::types::form::profile::{
    ExperienceDocument, ProfileDocument, ProjectDocument, SkillDocument,
};

#[derive(Debug, FromRow, PartialEq, Eq)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub headline: String,
    pub bio: String,
    pub location: String,
    pub current_company: String,
    pub current_role: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub website_url: String,
    pub twitter_url: String,
    pub is_public: bool,
}

#[derive(Debug, FromRow, PartialEq, Eq)]
pub struct Experience {
    pub id: ExperienceId,
    pub profile_id: ProfileId,
    pub company: String,
    pub title: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub description: String,
}

#[derive(Debug, FromRow, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub profile_id: ProfileId,
    pub created_at: NaiveDateTime,
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub highlight: bool,
    pub tech_stack: String,
}

#[derive(Debug, FromRow, PartialEq, Eq)]
pub struct Skill {
    pub id: SkillId,
    pub profile_id: ProfileId,
    pub name: String,
    pub level: Option<String>,
}

impl Profile {
    pub const DEFAULT_HEADLINE: &'static str = "Software Developer";

    #[tracing::instrument(skip(conn))]
    pub async fn by_user_id(
        conn: &mut sqlx::PgConnection,
        user_id: UserId,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "profiles" WHERE user_id = $1"#)
            .bind(user_id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    /// Creates the default profile row unless one already exists. The
    /// conflict target makes concurrent first reads converge on a
    /// single row.
    #[tracing::instrument(skip(conn))]
    pub async fn provision(conn: &mut sqlx::PgConnection, user_id: UserId) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO "profiles" (user_id, headline)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING"#,
        )
        .bind(user_id)
        .bind(Self::DEFAULT_HEADLINE)
        .execute(conn)
        .await
        .into_db_error()?;

        Ok(())
    }

    /// Writes the scalar fields from a validated submission. Child
    /// collections are replaced separately within the same transaction.
    #[tracing::instrument(skip(conn, doc))]
    pub async fn upsert_scalars(
        conn: &mut sqlx::PgConnection,
        user_id: UserId,
        doc: &ProfileDocument,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "profiles"
                (user_id, headline, bio, location, current_company, "current_role",
                 github_url, linkedin_url, website_url, twitter_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) DO UPDATE SET
                headline = EXCLUDED.headline,
                bio = EXCLUDED.bio,
                location = EXCLUDED.location,
                current_company = EXCLUDED.current_company,
                "current_role" = EXCLUDED."current_role",
                github_url = EXCLUDED.github_url,
                linkedin_url = EXCLUDED.linkedin_url,
                website_url = EXCLUDED.website_url,
                twitter_url = EXCLUDED.twitter_url,
                updated_at = now()
            RETURNING *"#,
        )
        .bind(user_id)
        .bind(&doc.headline)
        .bind(&doc.bio)
        .bind(&doc.location)
        .bind(&doc.current_company)
        .bind(&doc.current_role)
        .bind(&doc.links.github)
        .bind(&doc.links.linkedin)
        .bind(&doc.links.website)
        .bind(&doc.links.twitter)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(conn))]
    pub async fn set_visibility(
        conn: &mut sqlx::PgConnection,
        user_id: UserId,
        is_public: bool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE "profiles"
            SET is_public = $2, updated_at = now()
            WHERE user_id = $1
            RETURNING *"#,
        )
        .bind(user_id)
        .bind(is_public)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}

impl Experience {
    /// Replace-all semantics: drop the whole set and insert the
    /// submitted list in order. Insertion order is the only ordering;
    /// ids are reassigned every save.
    #[tracing::instrument(skip(conn, docs))]
    pub async fn replace_all(
        conn: &mut sqlx::PgConnection,
        profile_id: ProfileId,
        docs: &[ExperienceDocument],
    ) -> Result<()> {
        sqlx::query(r#"DELETE FROM "experiences" WHERE profile_id = $1"#)
            .bind(profile_id)
            .execute(&mut *conn)
            .await
            .into_db_error()?;

        for doc in docs {
            sqlx::query(
                r#"INSERT INTO "experiences"
                    (profile_id, company, title, location, start_date, end_date,
                     is_current, description)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
            )
            .bind(profile_id)
            .bind(&doc.company)
            .bind(&doc.title)
            .bind(doc.location.as_deref())
            .bind(doc.start_date)
            .bind(doc.end_date)
            .bind(doc.is_current)
            .bind(&doc.description)
            .execute(&mut *conn)
            .await
            .into_db_error()?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(conn))]
    pub async fn for_profile(
        conn: &mut sqlx::PgConnection,
        profile_id: ProfileId,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"SELECT * FROM "experiences" WHERE profile_id = $1 ORDER BY id"#,
        )
        .bind(profile_id)
        .fetch_all(conn)
        .await
        .into_db_error()
    }
}

impl Project {
    #[tracing::instrument(skip(conn, docs))]
    pub async fn replace_all(
        conn: &mut sqlx::PgConnection,
        profile_id: ProfileId,
        docs: &[ProjectDocument],
    ) -> Result<()> {
        sqlx::query(r#"DELETE FROM "projects" WHERE profile_id = $1"#)
            .bind(profile_id)
            .execute(&mut *conn)
            .await
            .into_db_error()?;

        for doc in docs {
            sqlx::query(
                r#"INSERT INTO "projects"
                    (profile_id, name, description, url, highlight, tech_stack)
                VALUES ($1, $2, $3, $4, $5, $6)"#,
            )
            .bind(profile_id)
            .bind(&doc.name)
            .bind(&doc.description)
            .bind(doc.url.as_deref())
            .bind(doc.highlight)
            .bind(&doc.tech_stack)
            .execute(&mut *conn)
            .await
            .into_db_error()?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(conn))]
    pub async fn for_profile(
        conn: &mut sqlx::PgConnection,
        profile_id: ProfileId,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "projects" WHERE profile_id = $1 ORDER BY id"#)
            .bind(profile_id)
            .fetch_all(conn)
            .await
            .into_db_error()
    }
}

impl Skill {
    #[tracing::instrument(skip(conn, docs))]
    pub async fn replace_all(
        conn: &mut sqlx::PgConnection,
        profile_id: ProfileId,
        docs: &[SkillDocument],
    ) -> Result<()> {
        sqlx::query(r#"DELETE FROM "skills" WHERE profile_id = $1"#)
            .bind(profile_id)
            .execute(&mut *conn)
            .await
            .into_db_error()?;

        for doc in docs {
            sqlx::query(r#"INSERT INTO "skills" (profile_id, name, level) VALUES ($1, $2, $3)"#)
                .bind(profile_id)
                .bind(&doc.name)
                .bind(doc.level.as_deref())
                .execute(&mut *conn)
                .await
                .into_db_error()?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(conn))]
    pub async fn for_profile(
        conn: &mut sqlx::PgConnection,
        profile_id: ProfileId,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "skills" WHERE profile_id = $1 ORDER BY id"#)
            .bind(profile_id)
            .fetch_all(conn)
            .await
            .into_db_error()
    }
}
