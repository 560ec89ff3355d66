use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::forms::{FieldErrors, FormValues};

#[derive(Debug, Error)]
pub enum EmailUpdateError {
    #[error("There is no member with this ID.")]
    MemberNotFound,

    #[error("This email already belongs to another member.")]
    EmailTaken,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Validates the admin "update email" form, returning the normalized email.
pub fn validate_email_form(form: &FormValues) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = match form.text("email") {
        None => {
            errors.add("email", "Required");
            String::new()
        }
        Some(raw) => {
            let email = raw.to_lowercase();
            if !is_valid_email(&email) {
                errors.add("email", "Invalid email");
            }
            email
        }
    };

    errors.finish(email)
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

/// Points member `id` at `email`.
///
/// The email is recorded in `student_emails` (the member's address book) and
/// becomes the primary `students.email`. Fails if the address already
/// belongs to a different member.
pub async fn update_member_email(
    pool: &PgPool,
    id: &str,
    email: &str,
) -> Result<(), EmailUpdateError> {
    let mut tx = pool.begin().await?;

    let member: Option<String> =
        sqlx::query_scalar("SELECT id FROM students WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    if member.is_none() {
        return Err(EmailUpdateError::MemberNotFound);
    }

    // Claims the address, or locks the existing row and reports its owner.
    let owner: String = sqlx::query_scalar(
        r#"
        INSERT INTO student_emails (email, student_id)
        VALUES ($1, $2)
        ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
        RETURNING student_id
        "#,
    )
    .bind(email)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;
    ensure_owner(&owner, id)?;

    sqlx::query("UPDATE students SET email = $1, updated_at = now() WHERE id = $2")
        .bind(email)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("Updated primary email for member {id}");
    Ok(())
}

/// Rejects an address recorded against a different member.
fn ensure_owner(owner: &str, id: &str) -> Result<(), EmailUpdateError> {
    if owner == id {
        Ok(())
    } else {
        Err(EmailUpdateError::EmailTaken)
    }
}
