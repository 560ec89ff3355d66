use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Race {
    Black,
    Hispanic,
    NativeAmerican,
    MiddleEastern,
    White,
    Asian,
    Other,
}

impl Race {
    pub const ALL: [Race; 7] = [
        Race::Black,
        Race::Hispanic,
        Race::NativeAmerican,
        Race::MiddleEastern,
        Race::White,
        Race::Asian,
        Race::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Race::Black => "BLACK",
            Race::Hispanic => "HISPANIC",
            Race::NativeAmerican => "NATIVE_AMERICAN",
            Race::MiddleEastern => "MIDDLE_EASTERN",
            Race::White => "WHITE",
            Race::Asian => "ASIAN",
            Race::Other => "OTHER",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Race::Black => "Black or African American",
            Race::Hispanic => "Hispanic or Latinx",
            Race::NativeAmerican => "Native American or Alaska Native",
            Race::MiddleEastern => "Middle Eastern or North African",
            Race::White => "White",
            Race::Asian => "Asian",
            Race::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|race| race.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkAuthorizationStatus {
    Authorized,
    NeedsSponsorship,
    Unauthorized,
    Unsure,
}

impl WorkAuthorizationStatus {
    pub const ALL: [WorkAuthorizationStatus; 4] = [
        WorkAuthorizationStatus::Authorized,
        WorkAuthorizationStatus::NeedsSponsorship,
        WorkAuthorizationStatus::Unauthorized,
        WorkAuthorizationStatus::Unsure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkAuthorizationStatus::Authorized => "AUTHORIZED",
            WorkAuthorizationStatus::NeedsSponsorship => "NEEDS_SPONSORSHIP",
            WorkAuthorizationStatus::Unauthorized => "UNAUTHORIZED",
            WorkAuthorizationStatus::Unsure => "UNSURE",
        }
    }

    /// Answer text for "Are you authorized to work in the US or Canada?"
    pub fn label(self) -> &'static str {
        match self {
            WorkAuthorizationStatus::Authorized => "Yes",
            WorkAuthorizationStatus::NeedsSponsorship => "Yes, with visa sponsorship",
            WorkAuthorizationStatus::Unauthorized => "No",
            WorkAuthorizationStatus::Unsure => "I'm not sure",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

/// Profile fields prefilled into the resume book form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberProfileRow {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub hometown: Option<String>,
    pub hometown_latitude: Option<f64>,
    pub hometown_longitude: Option<f64>,
    pub linked_in_url: Option<String>,
    pub race: Vec<String>,
    pub work_authorization_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberNameRow {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EducationRow {
    pub id: String,
    pub degree_type: String,
    pub school_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
