use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::settings::Availability;
use crate::types::error::FieldIssue;
use crate::util::validation;

/// Full profile submission. The save contract takes the whole document
/// at once; there is no per-field patching on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileInput {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(custom(function = "validation::is_valid_handle_str"))]
    pub handle: String,
    pub headline: String,
    #[validate(length(max = 1000, message = "bio must be at most 1000 characters"))]
    pub bio: String,
    pub location: String,
    pub current_company: String,
    pub current_role: String,
    pub availability: Availability,
    #[validate(nested)]
    pub links: LinksInput,
    #[validate(nested)]
    pub experiences: Vec<ExperienceInput>,
    #[validate(nested)]
    pub projects: Vec<ProjectInput>,
    #[validate(nested)]
    pub skills: Vec<SkillInput>,
}

/// Optional profile links. An empty string means "no link"; anything
/// else must parse as an absolute URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct LinksInput {
    #[validate(custom(function = "validation::is_link_url_str"))]
    pub github: String,
    #[validate(custom(function = "validation::is_link_url_str"))]
    pub linkedin: String,
    #[validate(custom(function = "validation::is_link_url_str"))]
    pub website: String,
    #[validate(custom(function = "validation::is_link_url_str"))]
    pub twitter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceInput {
    /// Accepted for wire compatibility but never used to preserve
    /// identity; every save reassigns child ids.
    pub id: Option<String>,
    #[validate(length(min = 1, message = "company must not be empty"))]
    pub company: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub location: Option<String>,
    #[validate(custom(function = "validation::is_valid_date_str"))]
    pub start_date: String,
    // end_date is validated during document conversion; it is forced to
    // null whenever is_current is set, regardless of the supplied value
    pub end_date: Option<String>,
    pub is_current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInput {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub description: String,
    #[validate(custom(function = "validation::is_link_url_str"))]
    pub url: Option<String>,
    pub highlight: bool,
    pub tech_stack: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillInput {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub level: Option<String>,
}

/// Fully validated submission, ready for the save transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDocument {
    pub name: String,
    /// Normalized to lowercase; storage compares handles exactly.
    pub handle: String,
    pub headline: String,
    pub bio: String,
    pub location: String,
    pub current_company: String,
    pub current_role: String,
    pub availability: Availability,
    pub links: LinksInput,
    pub experiences: Vec<ExperienceDocument>,
    pub projects: Vec<ProjectDocument>,
    pub skills: Vec<SkillDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceDocument {
    pub company: String,
    pub title: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDocument {
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub highlight: bool,
    pub tech_stack: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDocument {
    pub name: String,
    pub level: Option<String>,
}

impl ProfileInput {
    /// Validates the whole submission and produces the typed document
    /// used by the save transaction. Every issue is collected before
    /// anything can touch storage; a non-empty issue list means nothing
    /// was persisted.
    pub fn into_document(self) -> Result<ProfileDocument, Vec<FieldIssue>> {
        let mut issues = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => validation::collect_issues(&errors),
        };

        let mut experiences = Vec::with_capacity(self.experiences.len());
        for (index, exp) in self.experiences.iter().enumerate() {
            let end_date = if exp.is_current {
                None
            } else {
                match exp.end_date.as_deref().filter(|raw| !raw.is_empty()) {
                    Some(raw) => match validation::parse_date(raw) {
                        Some(date) => Some(date),
                        None => {
                            issues.push(FieldIssue::new(
                                format!("experiences[{index}].end_date"),
                                "must be a date in YYYY-MM-DD form",
                            ));
                            None
                        }
                    },
                    None => None,
                }
            };

            // an unparseable start date was already reported by the
            // derive validator above
            if let Some(start_date) = validation::parse_date(&exp.start_date) {
                experiences.push(ExperienceDocument {
                    company: exp.company.clone(),
                    title: exp.title.clone(),
                    location: exp.location.clone().filter(|v| !v.is_empty()),
                    start_date,
                    end_date,
                    is_current: exp.is_current,
                    description: exp.description.clone(),
                });
            }
        }

        if !issues.is_empty() {
            return Err(issues);
        }

        let projects = self
            .projects
            .into_iter()
            .map(|p| ProjectDocument {
                name: p.name,
                description: p.description,
                url: p.url.filter(|v| !v.is_empty()),
                highlight: p.highlight,
                tech_stack: p.tech_stack,
            })
            .collect();

        let skills = self
            .skills
            .into_iter()
            .map(|s| SkillDocument {
                name: s.name,
                level: s.level.filter(|v| !v.is_empty()),
            })
            .collect();

        Ok(ProfileDocument {
            name: self.name,
            handle: self.handle.to_ascii_lowercase(),
            headline: self.headline,
            bio: self.bio,
            location: self.location,
            current_company: self.current_company,
            current_role: self.current_role,
            availability: self.availability,
            links: self.links,
            experiences,
            projects,
            skills,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ada_input() -> ProfileInput {
        ProfileInput {
            name: "Ada".into(),
            handle: "ada-dev".into(),
            availability: Availability::Open,
            experiences: vec![ExperienceInput {
                company: "Acme".into(),
                title: "Eng".into(),
                start_date: "2022-01-01".into(),
                end_date: None,
                is_current: true,
                ..Default::default()
            }],
            skills: vec![SkillInput {
                name: "Rust".into(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn valid_submission_converts() {
        let doc = ada_input().into_document().unwrap();
        assert_eq!(doc.name, "Ada");
        assert_eq!(doc.handle, "ada-dev");
        assert_eq!(doc.experiences.len(), 1);
        assert!(doc.experiences[0].is_current);
        assert_eq!(doc.experiences[0].end_date, None);
        assert_eq!(doc.skills.len(), 1);
        assert_eq!(doc.skills[0].name, "Rust");
    }

    #[test]
    fn short_handle_is_rejected() {
        let mut input = ada_input();
        input.handle = "ab".into();

        let issues = input.into_document().unwrap_err();
        assert!(issues.iter().any(|issue| issue.field == "handle"));
    }

    #[test]
    fn handle_is_normalized_to_lowercase() {
        let mut input = ada_input();
        input.handle = "Ada-Dev".into();

        let doc = input.into_document().unwrap();
        assert_eq!(doc.handle, "ada-dev");
    }

    #[test]
    fn current_position_discards_submitted_end_date() {
        let mut input = ada_input();
        input.experiences[0].end_date = Some("definitely not a date".into());
        input.experiences[0].is_current = true;

        let doc = input.into_document().unwrap();
        assert_eq!(doc.experiences[0].end_date, None);
    }

    #[test]
    fn finished_position_requires_parseable_end_date() {
        let mut input = ada_input();
        input.experiences[0].is_current = false;
        input.experiences[0].end_date = Some("definitely not a date".into());

        let issues = input.into_document().unwrap_err();
        assert!(issues
            .iter()
            .any(|issue| issue.field == "experiences[0].end_date"));
    }

    #[test]
    fn missing_start_date_is_rejected() {
        let mut input = ada_input();
        input.experiences[0].start_date = String::new();

        let issues = input.into_document().unwrap_err();
        assert!(issues
            .iter()
            .any(|issue| issue.field == "experiences[0].start_date"));
    }

    #[test]
    fn relative_project_url_is_rejected() {
        let mut input = ada_input();
        input.projects.push(ProjectInput {
            name: "devfolio".into(),
            url: Some("/projects/devfolio".into()),
            ..Default::default()
        });

        let issues = input.into_document().unwrap_err();
        assert!(issues.iter().any(|issue| issue.field.starts_with("projects")));
    }

    #[test]
    fn empty_link_is_treated_as_absent() {
        let mut input = ada_input();
        input.links.github = String::new();
        input.projects.push(ProjectInput {
            name: "devfolio".into(),
            url: Some(String::new()),
            ..Default::default()
        });

        let doc = input.into_document().unwrap();
        assert_eq!(doc.projects[0].url, None);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let json = serde_json::json!({
            "name": "Ada",
            "handle": "ada-dev",
            "availability": "OPEN",
            "currentCompany": "Acme",
            "experiences": [{
                "company": "Acme",
                "title": "Eng",
                "startDate": "2022-01-01",
                "endDate": null,
                "isCurrent": true,
            }],
            "projects": [],
            "skills": [{ "name": "Rust" }],
        });

        let input: ProfileInput = serde_json::from_value(json).unwrap();
        assert_eq!(input.current_company, "Acme");
        assert_eq!(input.experiences[0].start_date, "2022-01-01");
        assert!(input.experiences[0].is_current);
    }
}
