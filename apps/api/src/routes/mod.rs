pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resume_books::handlers as resume_books;
use crate::state::AppState;
use crate::students::handlers as students;

/// Room for the text fields that ride along with the resume in one
/// multipart body.
const FORM_OVERHEAD_BYTES: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let submission_limit = state.config.max_resume_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Admin
        .route(
            "/students/:id/email",
            get(students::handle_get_student_email).post(students::handle_update_student_email),
        )
        // Member profile
        .route(
            "/resume-books/:id",
            get(resume_books::handle_get_resume_book)
                .post(resume_books::handle_submit_resume)
                .layer(DefaultBodyLimit::max(submission_limit)),
        )
        .route(
            "/resume-books/:id/preferred-companies",
            post(resume_books::handle_choose_company),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::session::{Role, SessionClaims, SessionSigner};
    use crate::config::Config;

    fn cookie(role: Role) -> String {
        let signer = SessionSigner::new(&Config::for_tests().session_secret);
        let token = signer.sign(&SessionClaims {
            member_id: "mem_1".to_string(),
            role,
        });
        format!("session={token}")
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let app = build_router(AppState::for_tests());
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    const BOUNDARY: &str = "X-PORTAL-BOUNDARY";

    fn multipart_body(fields: &[(&str, &str)], resume: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, bytes)) = resume {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn submit(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/resume-books/rb_1")
            .header(header::COOKIE, cookie(Role::Member))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "member-portal-api");
        assert!(matches!(body["database"].as_str(), Some("up" | "unreachable")));
    }

    #[tokio::test]
    async fn test_resume_book_requires_session() {
        let request = Request::builder()
            .uri("/resume-books/rb_1")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_forged_session_rejected() {
        let request = Request::builder()
            .uri("/resume-books/rb_1")
            .header(header::COOKIE, "session=eyJtZW1iZXJfaWQiOiJ4In0.AAAA")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_member_cannot_open_admin_email_page() {
        let request = Request::builder()
            .uri("/students/mem_2/email")
            .header(header::COOKIE, cookie(Role::Member))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected_before_update() {
        let request = Request::builder()
            .method("POST")
            .uri("/students/mem_2/email")
            .header(header::COOKIE, cookie(Role::Admin))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=not-an-email"))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please fix the errors above.");
        assert_eq!(body["errors"]["email"], "Invalid email");
    }

    #[tokio::test]
    async fn test_choose_company_evicts_duplicate() {
        let request = Request::builder()
            .method("POST")
            .uri("/resume-books/rb_1/preferred-companies")
            .header(header::COOKIE, cookie(Role::Member))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "selection": { "1": "Google", "2": "Meta", "3": "" },
                    "rank": 3,
                    "value": "Google"
                })
                .to_string(),
            ))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["selection"],
            json!({ "1": "", "2": "Meta", "3": "Google" })
        );
    }

    #[tokio::test]
    async fn test_choose_company_rejects_unknown_rank() {
        for rank in [json!(4), json!(0), json!(300), json!(-1)] {
            let request = Request::builder()
                .method("POST")
                .uri("/resume-books/rb_1/preferred-companies")
                .header(header::COOKIE, cookie(Role::Member))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "rank": rank, "value": "Google" }).to_string()))
                .unwrap();
            let (status, body) = send(request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "rank {rank}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "rank {rank}");
            assert_eq!(
                body["error"]["message"],
                format!("rank must be 1, 2 or 3 (got {rank})"),
            );
        }
    }

    #[tokio::test]
    async fn test_oversized_resume_rejected() {
        let mut pdf = b"%PDF-1.7\n".to_vec();
        pdf.resize(1_200_000, b' ');
        let (status, body) = send(submit(multipart_body(
            &[("firstName", "Ada")],
            Some(("resume.pdf", pdf.as_slice())),
        )))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"]["resume"],
            "Attachment is too big. Must be less than 1 MB in size."
        );
    }

    #[tokio::test]
    async fn test_incomplete_submission_lists_field_errors() {
        let (status, body) = send(submit(multipart_body(
            &[("firstName", "Ada"), ("preferredCompany1", "cmp_google")],
            None,
        )))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["lastName"], "Required");
        assert_eq!(body["errors"]["race"], "Please select at least one option.");
        assert!(body["errors"].get("firstName").is_none());
        assert!(body["errors"].get("preferredCompany1").is_none());
    }
}
