use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::member::{EducationRow, MemberProfileRow};
use crate::models::resume_book::{ResumeBookRow, SponsorRow, SubmissionRow};
use crate::resume_books::validation::SubmitResumeInput;
use crate::storage::{resume_key, ResumeStorage};

pub async fn get_member_profile(
    pool: &PgPool,
    member_id: &str,
) -> Result<Option<MemberProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, MemberProfileRow>(
        r#"
        SELECT email, first_name, last_name, hometown, hometown_latitude,
               hometown_longitude, linked_in_url, race, work_authorization_status
        FROM students
        WHERE id = $1
        "#,
    )
    .bind(member_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_resume_book(pool: &PgPool, id: &str) -> Result<Option<ResumeBookRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeBookRow>(
        "SELECT id, name, start_date, end_date FROM resume_books WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_submission(
    pool: &PgPool,
    member_id: &str,
    resume_book_id: &str,
) -> Result<Option<SubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionRow>(
        r#"
        SELECT coding_languages, education_id, employment_search_status,
               preferred_company_1, preferred_company_2, preferred_company_3,
               preferred_roles, resume
        FROM resume_book_submissions
        WHERE member_id = $1 AND resume_book_id = $2
        "#,
    )
    .bind(member_id)
    .bind(resume_book_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_sponsors(pool: &PgPool, resume_book_id: &str) -> Result<Vec<SponsorRow>, sqlx::Error> {
    sqlx::query_as::<_, SponsorRow>(
        r#"
        SELECT companies.id, companies.name
        FROM resume_book_sponsors
        JOIN companies ON companies.id = resume_book_sponsors.company_id
        WHERE resume_book_sponsors.resume_book_id = $1
        ORDER BY companies.name ASC
        "#,
    )
    .bind(resume_book_id)
    .fetch_all(pool)
    .await
}

/// Most recent education first.
pub async fn list_educations(pool: &PgPool, member_id: &str) -> Result<Vec<EducationRow>, sqlx::Error> {
    sqlx::query_as::<_, EducationRow>(
        r#"
        SELECT educations.id, educations.degree_type, schools.name AS school_name,
               educations.start_date, educations.end_date
        FROM educations
        LEFT JOIN schools ON schools.id = educations.school_id
        WHERE educations.student_id = $1
        ORDER BY educations.end_date DESC, educations.start_date DESC
        "#,
    )
    .bind(member_id)
    .fetch_all(pool)
    .await
}

/// Persists a validated submission.
///
/// The PDF (if any) is uploaded first; the submission upsert and the profile
/// update then commit together. A resubmission without a new file keeps the
/// resume already on file.
pub async fn submit_resume(
    pool: &PgPool,
    storage: &dyn ResumeStorage,
    input: &SubmitResumeInput,
) -> Result<(), AppError> {
    let resume = match &input.resume {
        Some(upload) => {
            let key = resume_key(&input.resume_book_id, &input.member_id);
            storage
                .put(&key, upload.bytes.clone(), "application/pdf")
                .await?;
            Some(key)
        }
        None => None,
    };

    let [company_1, company_2, company_3] = &input.preferred_companies;
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO resume_book_submissions
            (member_id, resume_book_id, coding_languages, education_id,
             employment_search_status, preferred_company_1, preferred_company_2,
             preferred_company_3, preferred_roles, resume, submitted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
        ON CONFLICT (member_id, resume_book_id) DO UPDATE SET
            coding_languages = EXCLUDED.coding_languages,
            education_id = EXCLUDED.education_id,
            employment_search_status = EXCLUDED.employment_search_status,
            preferred_company_1 = EXCLUDED.preferred_company_1,
            preferred_company_2 = EXCLUDED.preferred_company_2,
            preferred_company_3 = EXCLUDED.preferred_company_3,
            preferred_roles = EXCLUDED.preferred_roles,
            resume = COALESCE(EXCLUDED.resume, resume_book_submissions.resume),
            submitted_at = now()
        "#,
    )
    .bind(&input.member_id)
    .bind(&input.resume_book_id)
    .bind(&input.coding_languages)
    .bind(&input.education_id)
    .bind(&input.employment_search_status)
    .bind(company_1)
    .bind(company_2)
    .bind(company_3)
    .bind(&input.preferred_roles)
    .bind(&resume)
    .execute(&mut *tx)
    .await?;

    let race: Vec<String> = input
        .race
        .iter()
        .map(|race| race.as_str().to_string())
        .collect();

    sqlx::query(
        r#"
        UPDATE students SET
            first_name = $1,
            last_name = $2,
            race = $3,
            linked_in_url = $4,
            work_authorization_status = $5,
            hometown = $6,
            hometown_latitude = $7,
            hometown_longitude = $8,
            updated_at = now()
        WHERE id = $9
        "#,
    )
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&race)
    .bind(&input.linked_in_url)
    .bind(input.work_authorization_status.as_str())
    .bind(&input.hometown.name)
    .bind(input.hometown.latitude)
    .bind(input.hometown.longitude)
    .bind(&input.member_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Member {} submitted to resume book {} (new resume: {})",
        input.member_id,
        input.resume_book_id,
        resume.is_some()
    );
    Ok(())
}
