use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::resume_books::status::TimeWindow;

pub const CODING_LANGUAGES: &[&str] = &[
    "C",
    "C++",
    "C#",
    "Go",
    "Java",
    "JavaScript",
    "Kotlin",
    "Matlab",
    "Objective-C",
    "PHP",
    "Python",
    "Ruby",
    "Rust",
    "Scala",
    "Solidity",
    "SQL",
    "Swift",
    "TypeScript",
];

pub const ROLES: &[&str] = &[
    "Software Engineering",
    "Data Science",
    "Product Management",
    "Product Design",
    "Hardware Engineering",
    "IT",
    "Cybersecurity",
    "Quantitative",
    "Machine Learning",
];

pub const JOB_SEARCH_STATUSES: &[&str] = &[
    "I'm actively searching for a position.",
    "I'm not searching, but I'm open to new opportunities.",
    "I'm not searching and not open to new opportunities.",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeBookRow {
    pub id: String,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl ResumeBookRow {
    /// `None` when the stored dates are inverted.
    pub fn window(&self) -> Option<TimeWindow> {
        TimeWindow::new(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SponsorRow {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubmissionRow {
    pub coding_languages: Vec<String>,
    pub education_id: String,
    pub employment_search_status: String,
    pub preferred_company_1: Option<String>,
    pub preferred_company_2: Option<String>,
    pub preferred_company_3: Option<String>,
    pub preferred_roles: Vec<String>,
    pub resume: Option<String>,
}
