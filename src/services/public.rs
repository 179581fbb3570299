use serde::Serialize;

use crate::http::Error;
use crate::models::{Availability, Experience, Profile, Project, Skill, User, UserSettings};
use crate::services::profile::{ExperienceView, LinksView, ProjectView, SkillView};
use crate::util::validation;
use crate::App;

/// Read-only projection of a published profile. Nothing here is tied to
/// the owning session; this is what anonymous visitors see.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub handle: String,
    pub name: String,
    pub headline: String,
    pub bio: String,
    pub location: String,
    pub current_company: String,
    pub current_role: String,
    pub availability: Availability,
    pub links: LinksView,
    pub experiences: Vec<ExperienceView>,
    pub projects: Vec<ProjectView>,
    pub skills: Vec<SkillView>,
}

/// Rendering metadata for the page shell around a public profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
}

impl PublicProfile {
    pub fn meta(&self, base_url: &str) -> PageMeta {
        let description = if !self.headline.is_empty() {
            self.headline.clone()
        } else if !self.bio.is_empty() {
            self.bio.clone()
        } else {
            format!("Developer profile of {}", self.name)
        };

        PageMeta {
            title: format!("{} - Developer profile", self.name),
            description,
            canonical_url: format!("{}/u/{}", base_url.trim_end_matches('/'), self.handle),
        }
    }
}

/// Resolves a handle to its published profile. Unknown handles, users
/// without a profile and unpublished profiles are indistinguishable
/// from the outside; all three come back as `None`.
#[tracing::instrument(skip(app))]
pub async fn lookup(app: &App, handle: &str) -> Result<Option<PublicProfile>, Error> {
    let handle = handle.trim().to_ascii_lowercase();
    if !validation::is_valid_handle(&handle) {
        return Ok(None);
    }

    let mut conn = app.db_read().await?;

    let Some(user) = User::by_handle(&mut conn, &handle).await? else {
        return Ok(None);
    };
    let Some(profile) = Profile::by_user_id(&mut conn, user.id).await? else {
        return Ok(None);
    };
    if !profile.is_public {
        return Ok(None);
    }

    let availability = UserSettings::by_user_id(&mut conn, user.id)
        .await?
        .map(|s| s.availability)
        .unwrap_or_default();

    let experiences = Experience::for_profile(&mut conn, profile.id).await?;
    let projects = Project::for_profile(&mut conn, profile.id).await?;
    let skills = Skill::for_profile(&mut conn, profile.id).await?;

    Ok(Some(project(
        handle,
        user,
        profile,
        availability,
        experiences,
        projects,
        skills,
    )))
}

/// Pure assembly of the visitor-facing view. Experiences come out most
/// recent first, projects newest first; skills keep their stored order.
fn project(
    handle: String,
    user: User,
    profile: Profile,
    availability: Availability,
    mut experiences: Vec<Experience>,
    mut projects: Vec<Project>,
    skills: Vec<Skill>,
) -> PublicProfile {
    experiences.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    projects.sort_by(|a, b| b.id.0.cmp(&a.id.0));

    PublicProfile {
        name: user.name.unwrap_or_else(|| handle.clone()),
        handle,
        headline: profile.headline,
        bio: profile.bio,
        location: profile.location,
        current_company: profile.current_company,
        current_role: profile.current_role,
        availability,
        links: LinksView {
            github: profile.github_url,
            linkedin: profile.linkedin_url,
            website: profile.website_url,
            twitter: profile.twitter_url,
        },
        experiences: experiences.into_iter().map(Into::into).collect(),
        projects: projects.into_iter().map(Into::into).collect(),
        skills: skills.into_iter().map(Into::into).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::id::{ExperienceId, ProfileId, ProjectId, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_user(name: Option<&str>) -> User {
        User {
            id: UserId(1),
            created_at: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
            updated_at: None,
            provider_id: "github:1".into(),
            name: name.map(Into::into),
            handle: Some("ada-dev".into()),
        }
    }

    fn test_profile() -> Profile {
        Profile {
            id: ProfileId(1),
            user_id: UserId(1),
            created_at: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
            updated_at: None,
            headline: "Systems engineer".into(),
            bio: String::new(),
            location: String::new(),
            current_company: String::new(),
            current_role: String::new(),
            github_url: String::new(),
            linkedin_url: String::new(),
            website_url: String::new(),
            twitter_url: String::new(),
            is_public: true,
        }
    }

    fn experience(id: i64, start: NaiveDate) -> Experience {
        Experience {
            id: ExperienceId(id),
            profile_id: ProfileId(1),
            company: "Acme".into(),
            title: "Eng".into(),
            location: None,
            start_date: start,
            end_date: None,
            is_current: false,
            description: String::new(),
        }
    }

    fn project_row(id: i64) -> Project {
        Project {
            id: ProjectId(id),
            profile_id: ProfileId(1),
            created_at: date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
            name: format!("project-{id}"),
            description: String::new(),
            url: None,
            highlight: false,
            tech_stack: String::new(),
        }
    }

    #[test]
    fn experiences_sort_most_recent_first() {
        let view = project(
            "ada-dev".into(),
            test_user(Some("Ada")),
            test_profile(),
            Availability::Open,
            vec![
                experience(1, date(2019, 5, 1)),
                experience(2, date(2023, 2, 1)),
                experience(3, date(2021, 9, 1)),
            ],
            vec![],
            vec![],
        );

        let starts: Vec<_> = view.experiences.iter().map(|e| e.start_date).collect();
        assert_eq!(
            starts,
            vec![date(2023, 2, 1), date(2021, 9, 1), date(2019, 5, 1)]
        );
    }

    #[test]
    fn projects_sort_newest_first() {
        let view = project(
            "ada-dev".into(),
            test_user(Some("Ada")),
            test_profile(),
            Availability::Open,
            vec![],
            vec![project_row(1), project_row(3), project_row(2)],
            vec![],
        );

        let names: Vec<_> = view.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["project-3", "project-2", "project-1"]);
    }

    #[test]
    fn nameless_user_falls_back_to_handle() {
        let view = project(
            "ada-dev".into(),
            test_user(None),
            test_profile(),
            Availability::Open,
            vec![],
            vec![],
            vec![],
        );

        assert_eq!(view.name, "ada-dev");
    }

    #[test]
    fn meta_prefers_headline_then_bio() {
        let view = project(
            "ada-dev".into(),
            test_user(Some("Ada")),
            test_profile(),
            Availability::Open,
            vec![],
            vec![],
            vec![],
        );

        let meta = view.meta("http://localhost:3000/");
        assert_eq!(meta.title, "Ada - Developer profile");
        assert_eq!(meta.description, "Systems engineer");
        assert_eq!(meta.canonical_url, "http://localhost:3000/u/ada-dev");

        let mut profile = test_profile();
        profile.headline = String::new();
        profile.bio = "I write parsers.".into();
        let view = project(
            "ada-dev".into(),
            test_user(Some("Ada")),
            profile,
            Availability::Open,
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(view.meta("http://localhost:3000").description, "I write parsers.");
    }
}
