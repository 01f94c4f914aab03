use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::interview::InterviewRow;
use crate::session::collaborators::InterviewStore;
use crate::session::error::StoreError;

/// Borrowed insert payload, built after question generation.
pub struct NewInterview<'a> {
    pub user_id: &'a str,
    pub company: &'a str,
    pub role: &'a str,
    pub level: &'a str,
    pub techstack: &'a [String],
    pub interview_type: &'a str,
    pub questions: &'a [String],
}

pub async fn insert_interview(db: &PgPool, new: &NewInterview<'_>) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO interviews
            (id, user_id, company, role, level, techstack, interview_type, questions, finalized, taken)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, FALSE)
        "#,
    )
    .bind(id)
    .bind(new.user_id)
    .bind(new.company)
    .bind(new.role)
    .bind(new.level)
    .bind(new.techstack)
    .bind(new.interview_type)
    .bind(new.questions)
    .execute(db)
    .await?;
    Ok(id)
}

pub async fn find_interview(db: &PgPool, id: Uuid) -> Result<Option<InterviewRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Dashboard listing, newest first.
pub async fn list_interviews(db: &PgPool, user_id: &str) -> Result<Vec<InterviewRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewRow>(
        "SELECT * FROM interviews WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Sets `taken` and stamps `completed_at`. Repeating it is harmless.
pub async fn mark_interview_taken(db: &PgPool, id: Uuid) -> Result<(), StoreError> {
    let result = sqlx::query(
        "UPDATE interviews SET taken = TRUE, completed_at = COALESCE(completed_at, now()) WHERE id = $1",
    )
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(id));
    }
    info!("Interview {id} marked taken");
    Ok(())
}

/// Server-side [`InterviewStore`] over the `interviews` table.
#[derive(Clone)]
pub struct PgInterviewStore {
    db: PgPool,
}

impl PgInterviewStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    async fn mark_taken(&self, interview_id: Uuid) -> Result<(), StoreError> {
        mark_interview_taken(&self.db, interview_id).await
    }
}
