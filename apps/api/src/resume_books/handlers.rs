//! Axum route handlers for the resume book page.

use anyhow::anyhow;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::Response,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::cookies::ClientTimezone;
use crate::errors::AppError;
use crate::resume_books::queries::{
    get_member_profile, get_resume_book, get_submission, list_educations, list_sponsors,
    submit_resume,
};
use crate::resume_books::selection::{choose, Rank, RankedSelection};
use crate::resume_books::upload::read_submission;
use crate::resume_books::validation::{check_submission, validate_submission};
use crate::resume_books::view::{book_status, build_page, PageRows, ResumeBookPage};
use crate::session::{Session, ToastKind};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChooseCompanyRequest {
    #[serde(default)]
    pub selection: RankedSelection,
    /// Wide enough that any JSON integer reaches the range check.
    pub rank: i64,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ChooseCompanyResponse {
    pub selection: RankedSelection,
}

pub fn resume_book_path(id: &str) -> String {
    format!("/resume-books/{id}")
}

/// GET /resume-books/:id
pub async fn handle_get_resume_book(
    State(state): State<AppState>,
    session: Session,
    timezone: ClientTimezone,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ResumeBookPage>, AppError> {
    let member_id = session.member_id();

    let (member, resume_book, submission, sponsors, educations) = tokio::try_join!(
        get_member_profile(&state.db, member_id),
        get_resume_book(&state.db, &id),
        get_submission(&state.db, member_id, &id),
        list_sponsors(&state.db, &id),
        list_educations(&state.db, member_id),
    )?;

    let member = member
        .ok_or_else(|| AppError::Internal(anyhow!("Member {member_id} has no profile row")))?;
    let resume_book =
        resume_book.ok_or_else(|| AppError::NotFound(format!("Resume book {id} not found")))?;

    let page = build_page(
        PageRows {
            member,
            resume_book,
            submission,
            sponsors,
            educations,
        },
        Utc::now(),
        timezone.0,
        query.state.as_deref() == Some("editing"),
    )?;

    Ok(Json(page))
}

/// POST /resume-books/:id/preferred-companies
///
/// Applies one picker change and returns the resulting selection.
pub async fn handle_choose_company(
    _session: Session,
    Json(request): Json<ChooseCompanyRequest>,
) -> Result<Json<ChooseCompanyResponse>, AppError> {
    let rank = u8::try_from(request.rank)
        .ok()
        .and_then(|rank| Rank::try_from(rank).ok())
        .ok_or_else(|| {
            AppError::Validation(format!("rank must be 1, 2 or 3 (got {})", request.rank))
        })?;

    Ok(Json(ChooseCompanyResponse {
        selection: choose(&request.selection, rank, &request.value),
    }))
}

/// POST /resume-books/:id
pub async fn handle_submit_resume(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (form, resume) = read_submission(multipart, state.config.max_resume_bytes).await?;

    let input = validate_submission(&form, resume, session.member_id(), &id)
        .map_err(AppError::form)?;

    let resume_book = get_resume_book(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume book {id} not found")))?;

    let status = book_status(&resume_book, Utc::now())?;
    let (sponsors, existing) = tokio::try_join!(
        list_sponsors(&state.db, &id),
        get_submission(&state.db, &input.member_id, &id),
    )?;
    check_submission(&input, status, &sponsors, existing.as_ref())?;

    submit_resume(&state.db, state.storage.as_ref(), &input).await?;

    session.toast("Resume submitted!", ToastKind::Success);
    Ok(session.commit_redirect(&resume_book_path(&id)))
}
