//! View models for the resume book page.
//!
//! Everything here is pure: handlers fetch rows, then hand them over with the
//! current instant and the reader's timezone.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::member::{EducationRow, MemberProfileRow, Race, WorkAuthorizationStatus};
use crate::models::resume_book::{
    ResumeBookRow, SponsorRow, SubmissionRow, CODING_LANGUAGES, JOB_SEARCH_STATUSES, ROLES,
};
use crate::resume_books::format::{format_deadline, format_month_range};
use crate::resume_books::selection::RankedSelection;
use crate::resume_books::status::{resolve_status, WindowStatus};

pub const PROFILE_REMINDER: &str = "Before continuing, please ensure that your primary email \
and education history is up to date.";

#[derive(Debug, Serialize)]
pub struct ResumeBookView {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub status: WindowStatus,
}

#[derive(Debug, Serialize)]
pub struct EducationView {
    pub id: String,
    pub degree_type: String,
    pub school_name: Option<String>,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct FormOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// The fixed choice lists the form renders.
#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub race: Vec<FormOption>,
    pub work_authorization_status: Vec<FormOption>,
    pub coding_languages: &'static [&'static str],
    pub preferred_roles: &'static [&'static str],
    pub employment_search_status: &'static [&'static str],
}

impl Default for FormOptions {
    fn default() -> Self {
        FormOptions {
            race: Race::ALL
                .into_iter()
                .map(|race| FormOption {
                    value: race.as_str(),
                    label: race.label(),
                })
                .collect(),
            work_authorization_status: WorkAuthorizationStatus::ALL
                .into_iter()
                .map(|status| FormOption {
                    value: status.as_str(),
                    label: status.label(),
                })
                .collect(),
            coding_languages: CODING_LANGUAGES,
            preferred_roles: ROLES,
            employment_search_status: JOB_SEARCH_STATUSES,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResumeBookPage {
    pub resume_book: ResumeBookView,
    pub member: MemberProfileRow,
    pub submission: Option<SubmissionRow>,
    pub sponsors: Vec<SponsorRow>,
    pub educations: Vec<EducationView>,
    /// Initial state of the three company pickers.
    pub selection: RankedSelection,
    pub options: FormOptions,
    pub show_edit_button: bool,
    pub show_form: bool,
    /// Status line under the title; absent while the thank-you panel shows.
    pub message: Option<String>,
    pub confirmation: Option<String>,
}

/// Rows backing one render of the page.
pub struct PageRows {
    pub member: MemberProfileRow,
    pub resume_book: ResumeBookRow,
    pub submission: Option<SubmissionRow>,
    pub sponsors: Vec<SponsorRow>,
    pub educations: Vec<EducationRow>,
}

/// Derives the book's status at `now`. Inverted dates are a data error.
pub fn book_status(book: &ResumeBookRow, now: DateTime<Utc>) -> Result<WindowStatus, AppError> {
    let window = book.window().ok_or_else(|| {
        AppError::Internal(anyhow!(
            "Resume book {} ends before it starts",
            book.id
        ))
    })?;
    Ok(resolve_status(now, &window))
}

pub fn build_page(
    rows: PageRows,
    now: DateTime<Utc>,
    timezone: Tz,
    editing: bool,
) -> Result<ResumeBookPage, AppError> {
    let PageRows {
        member,
        resume_book,
        submission,
        sponsors,
        educations,
    } = rows;

    let status = book_status(&resume_book, now)?;
    let book = ResumeBookView {
        start_date: format_deadline(resume_book.start_date, timezone),
        end_date: format_deadline(resume_book.end_date, timezone),
        id: resume_book.id,
        name: resume_book.name,
        status,
    };

    let show_edit_button = submission.is_some() && !editing;
    let active = status == WindowStatus::Active;

    let message = match status {
        WindowStatus::Active if show_edit_button => None,
        WindowStatus::Active => Some(PROFILE_REMINDER.to_string()),
        WindowStatus::Past => Some(format!("This resume book closed on {}.", book.end_date)),
        WindowStatus::Upcoming => Some(format!("This resume book opens on {}.", book.start_date)),
    };

    let confirmation = (active && show_edit_button).then(|| {
        format!(
            "Thank you for submitting your resume to the {} resume book! \
             You can edit your submission until the deadline: {}.",
            book.name, book.end_date
        )
    });

    let selection = submission
        .as_ref()
        .map(|s| {
            RankedSelection::from_preferences(
                s.preferred_company_1.as_deref(),
                s.preferred_company_2.as_deref(),
                s.preferred_company_3.as_deref(),
            )
        })
        .unwrap_or_default();

    let educations = educations
        .into_iter()
        .map(|education| EducationView {
            date: format_month_range(education.start_date, education.end_date),
            id: education.id,
            degree_type: education.degree_type,
            school_name: education.school_name,
        })
        .collect();

    Ok(ResumeBookPage {
        resume_book: book,
        member,
        submission,
        sponsors,
        educations,
        selection,
        options: FormOptions::default(),
        show_edit_button,
        show_form: active && !show_edit_button,
        message,
        confirmation,
    })
}
