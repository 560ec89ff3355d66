use axum::{
    extract::{Path, State},
    response::Response,
    Form, Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::forms::{FieldErrors, FormValues};
use crate::models::member::MemberNameRow;
use crate::session::{Session, ToastKind};
use crate::state::AppState;
use crate::students::email::{update_member_email, validate_email_form, EmailUpdateError};

pub const STUDENTS_ROUTE: &str = "/students";

#[derive(Debug, Serialize)]
pub struct StudentEmailPage {
    pub student: MemberNameRow,
}

/// GET /students/:id/email
pub async fn handle_get_student_email(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<StudentEmailPage>, AppError> {
    session.require_admin()?;

    let student = sqlx::query_as::<_, MemberNameRow>(
        "SELECT first_name, last_name FROM students WHERE id = $1",
    )
    .bind(&id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Member {id} not found")))?;

    Ok(Json(StudentEmailPage { student }))
}

/// POST /students/:id/email
pub async fn handle_update_student_email(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    session.require_admin()?;

    let form: FormValues = fields.into_iter().collect();
    let email = validate_email_form(&form)
        .map_err(|errors| AppError::form_message("Please fix the errors above.", errors))?;

    match update_member_email(&state.db, &id, &email).await {
        Ok(()) => {}
        Err(EmailUpdateError::Database(e)) => return Err(AppError::Database(e)),
        Err(e) => return Err(AppError::form_message(e.to_string(), FieldErrors::new())),
    }

    session.toast("Updated member email.", ToastKind::Success);
    Ok(session.commit_redirect(STUDENTS_ROUTE))
}
