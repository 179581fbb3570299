/// Inputs for a drafted cover letter. The summary is whichever of the
/// profile's bio or headline has content; skills are the stored names.
#[derive(Debug)]
pub struct CoverLetterParams<'a> {
    pub job_title: &'a str,
    pub company: &'a str,
    pub job_description: Option<&'a str>,
    pub profile_summary: &'a str,
    pub skills: &'a [String],
}

/// Drafts a deterministic, template-based cover letter. There is no
/// model call behind this; the output is a starting point the user is
/// expected to edit.
pub fn generate(params: &CoverLetterParams<'_>) -> String {
    let skills_line = if params.skills.is_empty() {
        "a broad range of software engineering skills".to_string()
    } else {
        params.skills.join(", ")
    };

    let posting_note = if params.job_description.is_some() {
        " as described in the job posting"
    } else {
        ""
    };

    format!(
        "Dear Hiring Manager at {company},\n\n\
        I am writing to express my interest in the {title} position.\n\n\
        {summary}\n\n\
        My core skills include {skills}. I believe these match the \
        requirements of this role{posting_note}.\n\n\
        Thank you for considering my application.\n\n\
        Best regards,\n\
        [Your Name Here]",
        company = params.company,
        title = params.job_title,
        summary = params.profile_summary,
        skills = skills_line,
        posting_note = posting_note,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_mentions_role_company_and_skills() {
        let skills = vec!["Rust".to_string(), "PostgreSQL".to_string()];
        let letter = generate(&CoverLetterParams {
            job_title: "Backend Engineer",
            company: "Ferrous Metals",
            job_description: None,
            profile_summary: "I build storage engines.",
            skills: &skills,
        });

        assert!(letter.starts_with("Dear Hiring Manager at Ferrous Metals,"));
        assert!(letter.contains("the Backend Engineer position"));
        assert!(letter.contains("I build storage engines."));
        assert!(letter.contains("Rust, PostgreSQL"));
        assert!(!letter.contains("as described in the job posting"));
    }

    #[test]
    fn job_description_adds_the_posting_note() {
        let letter = generate(&CoverLetterParams {
            job_title: "Backend Engineer",
            company: "Ferrous Metals",
            job_description: Some("We need someone who knows async Rust."),
            profile_summary: "I build storage engines.",
            skills: &[],
        });

        assert!(letter.contains("as described in the job posting"));
        assert!(letter.contains("a broad range of software engineering skills"));
    }
}
