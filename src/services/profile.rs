use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error as ThisError;

use crate::database::{ErrorExt, ErrorExt2};
use crate::http::Error;
use crate::models::id::{ExperienceId, ProfileId, ProjectId, SkillId, UserId};
use crate::models::{Availability, Experience, Profile, Project, Skill, User, UserSettings};
use crate::types::{self, form::ProfileInput};
use crate::App;

/// The full record both contracts return: the user merged with their
/// (possibly freshly provisioned) profile and settings.
#[derive(Debug, Serialize)]
pub struct ProfileRecord {
    pub user: UserDocument,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub id: UserId,
    pub name: Option<String>,
    pub handle: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub profile: ProfileView,
    pub settings: SettingsView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: ProfileId,
    pub headline: String,
    pub bio: String,
    pub location: String,
    pub current_company: String,
    pub current_role: String,
    pub links: LinksView,
    pub is_public: bool,
    pub experiences: Vec<ExperienceView>,
    pub projects: Vec<ProjectView>,
    pub skills: Vec<SkillView>,
}

#[derive(Debug, Serialize)]
pub struct LinksView {
    pub github: String,
    pub linkedin: String,
    pub website: String,
    pub twitter: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceView {
    pub id: ExperienceId,
    pub company: String,
    pub title: String,
    pub location: Option<String>,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
    pub is_current: bool,
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub highlight: bool,
    pub tech_stack: String,
}

#[derive(Debug, Serialize)]
pub struct SkillView {
    pub id: SkillId,
    pub name: String,
    pub level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub availability: Availability,
}

impl From<Experience> for ExperienceView {
    fn from(row: Experience) -> Self {
        Self {
            id: row.id,
            company: row.company,
            title: row.title,
            location: row.location,
            start_date: row.start_date,
            end_date: row.end_date,
            is_current: row.is_current,
            description: row.description,
        }
    }
}

impl From<Project> for ProjectView {
    fn from(row: Project) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            url: row.url,
            highlight: row.highlight,
            tech_stack: row.tech_stack,
        }
    }
}

impl From<Skill> for SkillView {
    fn from(row: Skill) -> Self {
        Self {
            id: row.id,
            name: row.name,
            level: row.level,
        }
    }
}

#[derive(Debug, ThisError)]
#[error("no such user for an authenticated session")]
struct NoSuchUser;

#[derive(Debug, ThisError)]
#[error("profile submission was rejected")]
struct RejectedSubmission;

#[derive(Debug, ThisError)]
#[error("requested handle belongs to another user")]
struct HandleOwnedElsewhere;

#[derive(Debug, ThisError)]
#[error("profile or settings row went missing after provisioning")]
struct MissingRow;

/// Read contract. Provisions the default profile and settings rows on
/// first access; a second read returns the same rows. The caller has
/// already authenticated the user id.
#[tracing::instrument(skip(app))]
pub async fn get_or_create(app: &App, user_id: UserId) -> Result<ProfileRecord, Error> {
    let mut conn = app.db_write().await?;

    let user = User::by_id(&mut conn, user_id)
        .await?
        .ok_or_else(|| Error::from_context(types::Error::NotFound, NoSuchUser))?;

    Profile::provision(&mut conn, user.id).await?;
    UserSettings::provision(&mut conn, user.id).await?;

    load_record(&mut conn, user).await
}

/// Write contract. Validates the whole submission, then applies it in
/// one transaction: identity fields, profile scalars, replaced child
/// collections and availability. Either everything commits or nothing
/// does. The handle pre-check is an early exit only; the storage
/// constraint settles races between concurrent writers.
#[tracing::instrument(skip(app, input))]
pub async fn save(app: &App, user_id: UserId, input: ProfileInput) -> Result<ProfileRecord, Error> {
    let doc = input.into_document().map_err(|issues| {
        Error::from_context(types::Error::invalid_form(issues), RejectedSubmission)
    })?;

    let mut tx = app.primary_db.begin().await?;

    if let Some(owner) = User::by_handle(&mut tx, &doc.handle).await? {
        if owner.id != user_id {
            return Err(Error::from_context(
                types::Error::HandleTaken,
                HandleOwnedElsewhere,
            ));
        }
    }

    let user = match User::update_identity(&mut tx, user_id, &doc.name, &doc.handle).await {
        Ok(user) => user,
        Err(report) if report.is_unique_violation() => {
            return Err(Error::from_report(types::Error::HandleTaken, report));
        }
        Err(report) => return Err(report.into()),
    };

    let profile = Profile::upsert_scalars(&mut tx, user.id, &doc).await?;
    Experience::replace_all(&mut tx, profile.id, &doc.experiences).await?;
    Project::replace_all(&mut tx, profile.id, &doc.projects).await?;
    Skill::replace_all(&mut tx, profile.id, &doc.skills).await?;
    UserSettings::upsert(&mut tx, user.id, doc.availability).await?;

    tx.commit().await.into_db_error()?;

    let mut conn = app.db_write().await?;
    load_record(&mut conn, user).await
}

/// Explicit publish/unpublish action; the save contract never touches
/// the visibility flag.
#[tracing::instrument(skip(app))]
pub async fn set_visibility(
    app: &App,
    user_id: UserId,
    is_public: bool,
) -> Result<ProfileRecord, Error> {
    let mut conn = app.db_write().await?;

    let user = User::by_id(&mut conn, user_id)
        .await?
        .ok_or_else(|| Error::from_context(types::Error::NotFound, NoSuchUser))?;

    Profile::provision(&mut conn, user.id).await?;
    UserSettings::provision(&mut conn, user.id).await?;
    Profile::set_visibility(&mut conn, user.id, is_public)
        .await?
        .ok_or_else(|| Error::from_context(types::Error::Internal, MissingRow))?;

    // published state feeds the sitemap's last-modified stamp
    User::touch(&mut conn, user.id).await?;

    let user = User::by_id(&mut conn, user_id)
        .await?
        .ok_or_else(|| Error::from_context(types::Error::Internal, MissingRow))?;

    load_record(&mut conn, user).await
}

async fn load_record(conn: &mut sqlx::PgConnection, user: User) -> Result<ProfileRecord, Error> {
    let profile = Profile::by_user_id(&mut *conn, user.id)
        .await?
        .ok_or_else(|| Error::from_context(types::Error::Internal, MissingRow))?;
    let settings = UserSettings::by_user_id(&mut *conn, user.id)
        .await?
        .ok_or_else(|| Error::from_context(types::Error::Internal, MissingRow))?;

    let experiences = Experience::for_profile(&mut *conn, profile.id).await?;
    let projects = Project::for_profile(&mut *conn, profile.id).await?;
    let skills = Skill::for_profile(&mut *conn, profile.id).await?;

    Ok(ProfileRecord {
        user: UserDocument {
            id: user.id,
            name: user.name,
            handle: user.handle,
            created_at: user.created_at,
            updated_at: user.updated_at,
            profile: ProfileView {
                id: profile.id,
                headline: profile.headline,
                bio: profile.bio,
                location: profile.location,
                current_company: profile.current_company,
                current_role: profile.current_role,
                links: LinksView {
                    github: profile.github_url,
                    linkedin: profile.linkedin_url,
                    website: profile.website_url,
                    twitter: profile.twitter_url,
                },
                is_public: profile.is_public,
                experiences: experiences.into_iter().map(Into::into).collect(),
                projects: projects.into_iter().map(Into::into).collect(),
                skills: skills.into_iter().map(Into::into).collect(),
            },
            settings: SettingsView {
                availability: settings.availability,
            },
        },
    })
}
