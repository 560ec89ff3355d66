//! Server-side validation of the resume book submission form.
//!
//! Field names match the form's input names so errors can be shown next to
//! the field that caused them.

use bytes::Bytes;

use crate::errors::AppError;
use crate::forms::{FieldErrors, FormValues};
use crate::models::member::{Race, WorkAuthorizationStatus};
use crate::models::resume_book::{
    SponsorRow, SubmissionRow, CODING_LANGUAGES, JOB_SEARCH_STATUSES, ROLES,
};
use crate::resume_books::status::WindowStatus;

const REQUIRED: &str = "Required";
pub const PREFERRED_COMPANY_FIELDS: [&str; 3] =
    ["preferredCompany1", "preferredCompany2", "preferredCompany3"];

/// An uploaded resume, already bounded by the configured size limit.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ResumeUpload {
    pub fn is_pdf(&self) -> bool {
        let declared = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"))
            || self.file_name.to_ascii_lowercase().ends_with(".pdf");

        declared && self.bytes.starts_with(b"%PDF-")
    }
}

#[derive(Debug, Clone)]
pub struct Hometown {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A fully validated submission, ready to persist.
#[derive(Debug, Clone)]
pub struct SubmitResumeInput {
    pub member_id: String,
    pub resume_book_id: String,
    pub first_name: String,
    pub last_name: String,
    pub race: Vec<Race>,
    pub linked_in_url: String,
    pub work_authorization_status: WorkAuthorizationStatus,
    pub hometown: Hometown,
    pub education_id: String,
    pub coding_languages: Vec<String>,
    pub preferred_roles: Vec<String>,
    pub employment_search_status: String,
    pub preferred_companies: [String; 3],
    pub resume: Option<ResumeUpload>,
}

/// Validates the submission. `member_id` and `resume_book_id` come from the
/// session and URL; any values the form carries for them are ignored.
pub fn validate_submission(
    form: &FormValues,
    resume: Option<ResumeUpload>,
    member_id: &str,
    resume_book_id: &str,
) -> Result<SubmitResumeInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let first_name = required_text(form, "firstName", &mut errors);
    let last_name = required_text(form, "lastName", &mut errors);

    let race = form
        .all("race")
        .into_iter()
        .filter_map(|value| {
            let parsed = Race::parse(value);
            if parsed.is_none() {
                errors.add("race", format!("Unknown option: {value}"));
            }
            parsed
        })
        .collect::<Vec<_>>();
    if race.is_empty() {
        errors.add("race", "Please select at least one option.");
    }

    let linked_in_url = required_text(form, "linkedInUrl", &mut errors);
    if !linked_in_url.is_empty() && !is_linked_in_profile(&linked_in_url) {
        errors.add(
            "linkedInUrl",
            "Must be a LinkedIn profile URL (https://www.linkedin.com/in/...).",
        );
    }

    let work_authorization_status = match form.text("workAuthorizationStatus") {
        None => {
            errors.add("workAuthorizationStatus", REQUIRED);
            None
        }
        Some(value) => {
            let parsed = WorkAuthorizationStatus::parse(value);
            if parsed.is_none() {
                errors.add("workAuthorizationStatus", format!("Unknown option: {value}"));
            }
            parsed
        }
    };

    let hometown = Hometown {
        name: required_text(form, "hometown", &mut errors),
        latitude: coordinate(form, "hometownLatitude", 90.0, &mut errors),
        longitude: coordinate(form, "hometownLongitude", 180.0, &mut errors),
    };

    let education_id = required_text(form, "educationId", &mut errors);

    let coding_languages = choices(form, "codingLanguages", CODING_LANGUAGES, &mut errors);
    let preferred_roles = choices(form, "preferredRoles", ROLES, &mut errors);

    let employment_search_status = required_text(form, "employmentSearchStatus", &mut errors);
    if !employment_search_status.is_empty()
        && !JOB_SEARCH_STATUSES.contains(&employment_search_status.as_str())
    {
        errors.add("employmentSearchStatus", "Unknown option.");
    }

    let preferred_companies = PREFERRED_COMPANY_FIELDS.map(|field| required_text(form, field, &mut errors));
    for (index, company) in preferred_companies.iter().enumerate() {
        if !company.is_empty() && preferred_companies[..index].contains(company) {
            errors.add(
                PREFERRED_COMPANY_FIELDS[index],
                "Please choose a different company for each rank.",
            );
        }
    }

    if let Some(upload) = &resume {
        if !upload.is_pdf() {
            errors.add("resume", "Resume must be a PDF.");
        }
    }

    let Some(work_authorization_status) = work_authorization_status else {
        // Always accompanied by a field error.
        return Err(errors);
    };

    errors.finish(SubmitResumeInput {
        member_id: member_id.to_string(),
        resume_book_id: resume_book_id.to_string(),
        first_name,
        last_name,
        race,
        linked_in_url,
        work_authorization_status,
        hometown,
        education_id,
        coding_languages,
        preferred_roles,
        employment_search_status,
        preferred_companies,
        resume,
    })
}

/// Checks a validated submission against the book it targets: the window
/// must be open, every preferred company must sponsor the book, and a
/// first-time submitter must upload a resume.
pub fn check_submission(
    input: &SubmitResumeInput,
    status: WindowStatus,
    sponsors: &[SponsorRow],
    existing: Option<&SubmissionRow>,
) -> Result<(), AppError> {
    if status != WindowStatus::Active {
        return Err(AppError::form_message(
            "This resume book is not accepting submissions.",
            FieldErrors::new(),
        ));
    }

    let mut errors = FieldErrors::new();
    for (field, company) in PREFERRED_COMPANY_FIELDS.iter().zip(&input.preferred_companies) {
        if !sponsors.iter().any(|sponsor| &sponsor.id == company) {
            errors.add(field, "Please choose one of this resume book's sponsors.");
        }
    }
    if input.resume.is_none() && existing.and_then(|s| s.resume.as_ref()).is_none() {
        errors.add("resume", "Please upload your resume.");
    }

    errors.finish(()).map_err(AppError::form)
}

fn required_text(form: &FormValues, field: &str, errors: &mut FieldErrors) -> String {
    match form.text(field) {
        Some(value) => value.to_string(),
        None => {
            errors.add(field, REQUIRED);
            String::new()
        }
    }
}

fn coordinate(form: &FormValues, field: &str, bound: f64, errors: &mut FieldErrors) -> Option<f64> {
    let raw = form.text(field)?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() <= bound => Some(value),
        _ => {
            errors.add(field, "Invalid coordinate.");
            None
        }
    }
}

/// Picks the submitted values for a checkbox group, requiring at least one
/// and rejecting anything outside `allowed`. Duplicates collapse.
fn choices(
    form: &FormValues,
    field: &str,
    allowed: &[&str],
    errors: &mut FieldErrors,
) -> Vec<String> {
    let mut picked: Vec<String> = Vec::new();
    for value in form.all(field) {
        if !allowed.contains(&value) {
            errors.add(field, format!("Unknown option: {value}"));
        } else if !picked.iter().any(|p| p == value) {
            picked.push(value.to_string());
        }
    }
    if picked.is_empty() {
        errors.add(field, "Please select at least one option.");
    }
    picked
}

pub fn is_linked_in_profile(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    rest.strip_prefix("linkedin.com/in/")
        .map(|handle| handle.trim_end_matches('/'))
        .is_some_and(|handle| !handle.is_empty() && !handle.contains(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> FormValues {
        [
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("race", "BLACK"),
            ("race", "HISPANIC"),
            ("linkedInUrl", "https://www.linkedin.com/in/ada"),
            ("workAuthorizationStatus", "AUTHORIZED"),
            ("hometown", "Atlanta, GA"),
            ("hometownLatitude", "33.749"),
            ("hometownLongitude", "-84.388"),
            ("educationId", "edu_1"),
            ("codingLanguages", "Rust"),
            ("codingLanguages", "Python"),
            ("preferredRoles", "Software Engineering"),
            ("employmentSearchStatus", "I'm actively searching for a position."),
            ("preferredCompany1", "cmp_google"),
            ("preferredCompany2", "cmp_meta"),
            ("preferredCompany3", "cmp_apple"),
            ("memberId", "someone_else"),
        ]
        .into_iter()
        .collect()
    }

    fn with(form: &FormValues, field: &str, value: &str) -> FormValues {
        let mut copy = form.clone();
        copy.push(field, value);
        copy
    }

    fn without(field: &str) -> FormValues {
        let mut copy = FormValues::default();
        for (name, value) in [
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("race", "BLACK"),
            ("linkedInUrl", "https://www.linkedin.com/in/ada"),
            ("workAuthorizationStatus", "AUTHORIZED"),
            ("hometown", "Atlanta, GA"),
            ("educationId", "edu_1"),
            ("codingLanguages", "Rust"),
            ("preferredRoles", "Data Science"),
            ("employmentSearchStatus", "I'm actively searching for a position."),
            ("preferredCompany1", "cmp_google"),
            ("preferredCompany2", "cmp_meta"),
            ("preferredCompany3", "cmp_apple"),
        ] {
            if name != field {
                copy.push(name, value);
            }
        }
        copy
    }

    fn pdf() -> ResumeUpload {
        ResumeUpload {
            file_name: "resume.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF-1.7\n..."),
        }
    }

    #[test]
    fn test_valid_submission() {
        let input = validate_submission(&valid_form(), Some(pdf()), "mem_1", "rb_1").unwrap();
        assert_eq!(input.member_id, "mem_1");
        assert_eq!(input.resume_book_id, "rb_1");
        assert_eq!(input.race, vec![Race::Black, Race::Hispanic]);
        assert_eq!(input.coding_languages, vec!["Rust", "Python"]);
        assert_eq!(input.hometown.latitude, Some(33.749));
        assert_eq!(
            input.preferred_companies,
            ["cmp_google", "cmp_meta", "cmp_apple"].map(String::from)
        );
        assert!(input.resume.is_some());
    }

    #[test]
    fn test_resume_is_optional_here() {
        assert!(validate_submission(&valid_form(), None, "mem_1", "rb_1").is_ok());
    }

    #[test]
    fn test_each_required_field_reported() {
        for field in [
            "firstName",
            "lastName",
            "linkedInUrl",
            "workAuthorizationStatus",
            "hometown",
            "educationId",
            "employmentSearchStatus",
            "preferredCompany1",
            "preferredCompany2",
            "preferredCompany3",
        ] {
            let errors = validate_submission(&without(field), None, "m", "r").unwrap_err();
            assert_eq!(errors.get(field), Some(REQUIRED), "{field}");
            assert_eq!(errors.len(), 1, "{field}");
        }
    }

    #[test]
    fn test_checkbox_groups_need_one_option() {
        for field in ["race", "codingLanguages", "preferredRoles"] {
            let errors = validate_submission(&without(field), None, "m", "r").unwrap_err();
            assert_eq!(
                errors.get(field),
                Some("Please select at least one option."),
                "{field}"
            );
        }
    }

    #[test]
    fn test_unknown_options_rejected() {
        let errors = validate_submission(
            &with(&valid_form(), "codingLanguages", "COBOL"),
            None,
            "m",
            "r",
        )
        .unwrap_err();
        assert_eq!(errors.get("codingLanguages"), Some("Unknown option: COBOL"));
    }

    #[test]
    fn test_duplicate_company_reported_on_later_rank() {
        let mut form = without("preferredCompany3");
        form.push("preferredCompany3", "cmp_google");
        let errors = validate_submission(&form, None, "m", "r").unwrap_err();
        assert!(errors.get("preferredCompany1").is_none());
        assert_eq!(
            errors.get("preferredCompany3"),
            Some("Please choose a different company for each rank.")
        );
    }

    #[test]
    fn test_non_pdf_resume_rejected() {
        let upload = ResumeUpload {
            file_name: "resume.docx".to_string(),
            content_type: Some("application/msword".to_string()),
            bytes: Bytes::from_static(b"PK\x03\x04"),
        };
        let errors = validate_submission(&valid_form(), Some(upload), "m", "r").unwrap_err();
        assert_eq!(errors.get("resume"), Some("Resume must be a PDF."));
    }

    #[test]
    fn test_pdf_extension_alone_is_not_enough() {
        let upload = ResumeUpload {
            bytes: Bytes::from_static(b"not really a pdf"),
            ..pdf()
        };
        assert!(!upload.is_pdf());
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let mut form = without("hometown");
        form.push("hometown", "Nowhere");
        form.push("hometownLatitude", "91");
        let errors = validate_submission(&form, None, "m", "r").unwrap_err();
        assert_eq!(errors.get("hometownLatitude"), Some("Invalid coordinate."));
    }

    fn sponsors() -> Vec<SponsorRow> {
        [("cmp_google", "Google"), ("cmp_meta", "Meta"), ("cmp_apple", "Apple")]
            .into_iter()
            .map(|(id, name)| SponsorRow {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect()
    }

    fn prior_submission(resume: Option<&str>) -> SubmissionRow {
        SubmissionRow {
            coding_languages: vec!["Rust".to_string()],
            education_id: "edu_1".to_string(),
            employment_search_status: "I'm actively searching for a position.".to_string(),
            preferred_company_1: Some("cmp_google".to_string()),
            preferred_company_2: Some("cmp_meta".to_string()),
            preferred_company_3: Some("cmp_apple".to_string()),
            preferred_roles: vec!["Software Engineering".to_string()],
            resume: resume.map(String::from),
        }
    }

    fn form_errors(result: Result<(), AppError>) -> (Option<String>, FieldErrors) {
        match result {
            Err(AppError::Form { error, errors }) => (error, errors),
            other => panic!("expected a form error, got {other:?}"),
        }
    }

    #[test]
    fn test_closed_book_rejects_submission() {
        let input = validate_submission(&valid_form(), Some(pdf()), "m", "r").unwrap();
        for status in [WindowStatus::Upcoming, WindowStatus::Past] {
            let (error, errors) = form_errors(check_submission(&input, status, &sponsors(), None));
            assert_eq!(
                error.as_deref(),
                Some("This resume book is not accepting submissions.")
            );
            assert!(errors.is_empty());
        }
    }

    #[test]
    fn test_company_must_sponsor_the_book() {
        let mut form = without("preferredCompany2");
        form.push("preferredCompany2", "cmp_initech");
        let input = validate_submission(&form, Some(pdf()), "m", "r").unwrap();
        let (_, errors) =
            form_errors(check_submission(&input, WindowStatus::Active, &sponsors(), None));
        assert_eq!(
            errors.get("preferredCompany2"),
            Some("Please choose one of this resume book's sponsors.")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_first_submission_needs_resume() {
        let input = validate_submission(&valid_form(), None, "m", "r").unwrap();
        let (_, errors) =
            form_errors(check_submission(&input, WindowStatus::Active, &sponsors(), None));
        assert_eq!(errors.get("resume"), Some("Please upload your resume."));

        let without_file = prior_submission(None);
        let (_, errors) = form_errors(check_submission(
            &input,
            WindowStatus::Active,
            &sponsors(),
            Some(&without_file),
        ));
        assert_eq!(errors.get("resume"), Some("Please upload your resume."));
    }

    #[test]
    fn test_resubmission_keeps_existing_resume() {
        let input = validate_submission(&valid_form(), None, "m", "r").unwrap();
        let existing = prior_submission(Some("resume-books/r/m.pdf"));
        assert!(check_submission(&input, WindowStatus::Active, &sponsors(), Some(&existing)).is_ok());
    }

    #[test]
    fn test_linked_in_urls() {
        assert!(is_linked_in_profile("https://www.linkedin.com/in/ada"));
        assert!(is_linked_in_profile("linkedin.com/in/ada/"));
        assert!(!is_linked_in_profile("https://www.linkedin.com/company/acme"));
        assert!(!is_linked_in_profile("https://linkedin.com/in/"));
        assert!(!is_linked_in_profile("https://example.com/in/ada"));
    }
}
