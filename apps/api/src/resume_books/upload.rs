use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::BytesMut;
use tracing::debug;

use crate::errors::AppError;
use crate::forms::{FieldErrors, FormValues};
use crate::resume_books::validation::ResumeUpload;

pub const RESUME_FIELD: &str = "resume";
pub const RESUME_TOO_BIG: &str = "Attachment is too big. Must be less than 1 MB in size.";

fn too_big() -> AppError {
    AppError::form(FieldErrors::single(RESUME_FIELD, RESUME_TOO_BIG))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_big()
    } else {
        AppError::Validation(format!("Malformed form submission: {}", e.body_text()))
    }
}

/// Drains a multipart body into text fields plus the optional resume file.
///
/// The resume is streamed chunk by chunk and rejected as soon as it passes
/// `max_resume_bytes`. An empty file input counts as "no resume".
pub async fn read_submission(
    mut multipart: Multipart,
    max_resume_bytes: usize,
) -> Result<(FormValues, Option<ResumeUpload>), AppError> {
    let mut form = FormValues::default();
    let mut resume = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name != RESUME_FIELD {
            let value = field.text().await.map_err(multipart_error)?;
            form.push(name, value);
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let mut buffer = BytesMut::new();

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if buffer.len() + chunk.len() > max_resume_bytes {
                debug!("Rejected resume upload over {max_resume_bytes} bytes");
                return Err(too_big());
            }
            buffer.extend_from_slice(&chunk);
        }

        if !buffer.is_empty() {
            resume = Some(ResumeUpload {
                file_name,
                content_type,
                bytes: buffer.freeze(),
            });
        }
    }

    Ok((form, resume))
}
