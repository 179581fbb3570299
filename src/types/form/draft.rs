use super::profile::{ExperienceInput, ProfileInput, ProjectInput, SkillInput};
use crate::models::settings::Availability;

/// In-memory working copy of a profile submission.
///
/// The edit surface mutates this document field by field and submits it
/// wholesale; nothing here talks to storage. List operations address
/// elements by index and indices shift on removal, so a caller must not
/// hold on to an index across `remove_*`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    input: ProfileInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Handle,
    Headline,
    Bio,
    Location,
    CurrentCompany,
    CurrentRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    Github,
    Linkedin,
    Website,
    Twitter,
}

/// Partial update for one experience entry; `None` leaves the field
/// untouched (shallow merge).
#[derive(Debug, Clone, Default)]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<Option<String>>,
    pub is_current: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<Option<String>>,
    pub highlight: Option<bool>,
    pub tech_stack: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub level: Option<Option<String>>,
}

impl ProfileDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts editing from a previously loaded submission.
    #[must_use]
    pub fn from_input(input: ProfileInput) -> Self {
        Self { input }
    }

    #[must_use]
    pub fn input(&self) -> &ProfileInput {
        &self.input
    }

    /// Serializes the whole working document for the save contract; no
    /// per-field diffing happens on submission.
    #[must_use]
    pub fn into_input(self) -> ProfileInput {
        self.input
    }

    pub fn set_field(&mut self, field: TextField, value: impl Into<String>) {
        let value = value.into();
        match field {
            TextField::Name => self.input.name = value,
            TextField::Handle => self.input.handle = value,
            TextField::Headline => self.input.headline = value,
            TextField::Bio => self.input.bio = value,
            TextField::Location => self.input.location = value,
            TextField::CurrentCompany => self.input.current_company = value,
            TextField::CurrentRole => self.input.current_role = value,
        }
    }

    pub fn set_link(&mut self, field: LinkField, value: impl Into<String>) {
        let value = value.into();
        match field {
            LinkField::Github => self.input.links.github = value,
            LinkField::Linkedin => self.input.links.linkedin = value,
            LinkField::Website => self.input.links.website = value,
            LinkField::Twitter => self.input.links.twitter = value,
        }
    }

    pub fn set_availability(&mut self, availability: Availability) {
        self.input.availability = availability;
    }
}

impl ProfileDraft {
    /// Appends an empty experience entry and returns its index.
    pub fn add_experience(&mut self) -> usize {
        self.input.experiences.push(ExperienceInput::default());
        self.input.experiences.len() - 1
    }

    /// Merges a partial patch into the entry at `index`. Marking an
    /// entry as current clears its end date in the same update, so the
    /// working copy never holds the contradictory pair. Returns `false`
    /// when the index is out of bounds.
    pub fn update_experience(&mut self, index: usize, patch: ExperiencePatch) -> bool {
        let Some(entry) = self.input.experiences.get_mut(index) else {
            return false;
        };

        if let Some(company) = patch.company {
            entry.company = company;
        }
        if let Some(title) = patch.title {
            entry.title = title;
        }
        if let Some(location) = patch.location {
            entry.location = Some(location);
        }
        if let Some(start_date) = patch.start_date {
            entry.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            entry.end_date = end_date;
        }
        if let Some(is_current) = patch.is_current {
            entry.is_current = is_current;
            if is_current {
                entry.end_date = None;
            }
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }

        true
    }

    pub fn remove_experience(&mut self, index: usize) -> bool {
        if index < self.input.experiences.len() {
            self.input.experiences.remove(index);
            true
        } else {
            false
        }
    }

    pub fn add_project(&mut self) -> usize {
        self.input.projects.push(ProjectInput::default());
        self.input.projects.len() - 1
    }

    pub fn update_project(&mut self, index: usize, patch: ProjectPatch) -> bool {
        let Some(entry) = self.input.projects.get_mut(index) else {
            return false;
        };

        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(url) = patch.url {
            entry.url = url;
        }
        if let Some(highlight) = patch.highlight {
            entry.highlight = highlight;
        }
        if let Some(tech_stack) = patch.tech_stack {
            entry.tech_stack = tech_stack;
        }

        true
    }

    pub fn remove_project(&mut self, index: usize) -> bool {
        if index < self.input.projects.len() {
            self.input.projects.remove(index);
            true
        } else {
            false
        }
    }

    pub fn add_skill(&mut self) -> usize {
        self.input.skills.push(SkillInput::default());
        self.input.skills.len() - 1
    }

    pub fn update_skill(&mut self, index: usize, patch: SkillPatch) -> bool {
        let Some(entry) = self.input.skills.get_mut(index) else {
            return false;
        };

        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(level) = patch.level {
            entry.level = level;
        }

        true
    }

    pub fn remove_skill(&mut self, index: usize) -> bool {
        if index < self.input.skills.len() {
            self.input.skills.remove(index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_level_replace() {
        let mut draft = ProfileDraft::new();
        draft.set_field(TextField::Name, "Ada");
        draft.set_field(TextField::Handle, "ada-dev");
        draft.set_link(LinkField::Github, "https://github.com/ada");
        draft.set_availability(Availability::Busy);

        let input = draft.into_input();
        assert_eq!(input.name, "Ada");
        assert_eq!(input.handle, "ada-dev");
        assert_eq!(input.links.github, "https://github.com/ada");
        assert_eq!(input.availability, Availability::Busy);
    }

    #[test]
    fn marking_current_clears_end_date() {
        let mut draft = ProfileDraft::new();
        let index = draft.add_experience();
        assert!(draft.update_experience(
            index,
            ExperiencePatch {
                company: Some("Acme".into()),
                end_date: Some(Some("2023-06-30".into())),
                ..Default::default()
            },
        ));
        assert_eq!(
            draft.input().experiences[index].end_date.as_deref(),
            Some("2023-06-30")
        );

        assert!(draft.update_experience(
            index,
            ExperiencePatch {
                is_current: Some(true),
                ..Default::default()
            },
        ));

        let entry = &draft.input().experiences[index];
        assert!(entry.is_current);
        assert_eq!(entry.end_date, None);
    }

    #[test]
    fn removal_shifts_later_indices() {
        let mut draft = ProfileDraft::new();
        for name in ["first", "second", "third"] {
            let index = draft.add_skill();
            draft.update_skill(
                index,
                SkillPatch {
                    name: Some(name.into()),
                    ..Default::default()
                },
            );
        }

        assert!(draft.remove_skill(0));

        let names: Vec<_> = draft
            .input()
            .skills
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, ["second", "third"]);
    }

    #[test]
    fn out_of_bounds_operations_are_rejected() {
        let mut draft = ProfileDraft::new();
        assert!(!draft.update_experience(0, ExperiencePatch::default()));
        assert!(!draft.remove_project(3));
        assert!(!draft.remove_skill(0));
    }

    #[test]
    fn patch_merge_is_shallow() {
        let mut draft = ProfileDraft::new();
        let index = draft.add_project();
        draft.update_project(
            index,
            ProjectPatch {
                name: Some("devfolio".into()),
                url: Some(Some("https://example.com".into())),
                ..Default::default()
            },
        );
        draft.update_project(
            index,
            ProjectPatch {
                highlight: Some(true),
                ..Default::default()
            },
        );

        let entry = &draft.input().projects[index];
        assert_eq!(entry.name, "devfolio");
        assert_eq!(entry.url.as_deref(), Some("https://example.com"));
        assert!(entry.highlight);
    }
}
