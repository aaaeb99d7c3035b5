use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::scheduling::SchedulingService;
use crate::db::DbPool;
use crate::domain::session::{NewSession, SessionFilter, SessionPatch, SessionStatus, SessionView};
use crate::errors::AppError;
use crate::infrastructure::session_repo::DieselSessionRepository;

use super::actor_from;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListSessionsParams {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub subject_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    /// One of SCHEDULED, COMPLETED, CANCELLED.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub teacher_id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub course_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSessionRequest {
    pub student_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    /// Absent = keep the stored course, explicit null = detach it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub course_id: Option<Option<Uuid>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub attended: Option<bool>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Wraps a present value (null included) in `Some`, so a missing field and an
/// explicit `null` deserialize to different `Option<Option<T>>` states.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelSessionRequest {
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub course_id: Option<Uuid>,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub attended: Option<bool>,
    pub location: String,
    pub notes: Option<String>,
    pub cancel_reason: Option<String>,
}

impl From<SessionView> for SessionResponse {
    fn from(s: SessionView) -> Self {
        SessionResponse {
            id: s.id,
            teacher_id: s.teacher_id,
            student_id: s.student_id,
            subject_id: s.subject_id,
            course_id: s.course_id,
            start_time: s.start_time.to_rfc3339(),
            end_time: s.end_time.to_rfc3339(),
            status: s.status.as_str().to_string(),
            attended: s.attended,
            location: s.location,
            notes: s.notes,
            cancel_reason: s.cancel_reason,
        }
    }
}

fn scheduling(pool: DbPool) -> SchedulingService<DieselSessionRepository> {
    SchedulingService::new(DieselSessionRepository::new(pool))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /teachers/{teacher_id}/sessions
///
/// Filtered read of a teacher's sessions, ordered by start time.
#[utoipa::path(
    get,
    path = "/teachers/{teacher_id}/sessions",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher UUID"),
    ),
    responses(
        (status = 200, description = "Sessions in the window", body = [SessionResponse]),
        (status = 422, description = "Malformed filter"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "sessions"
)]
pub async fn list_sessions(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<ListSessionsParams>,
) -> Result<HttpResponse, AppError> {
    let teacher_id = path.into_inner();
    let params = query.into_inner();
    let status = match params.status.as_deref() {
        Some(s) => Some(
            SessionStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("unknown status '{s}'")))?,
        ),
        None => None,
    };
    let filter = SessionFilter {
        from: params.from,
        to: params.to,
        subject_id: params.subject_id,
        course_id: params.course_id,
        student_id: params.student_id,
        status,
    };

    let pool = pool.get_ref().clone();
    let sessions = web::block(move || {
        scheduling(pool)
            .list_sessions(teacher_id, filter)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<SessionResponse> = sessions.into_iter().map(SessionResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /sessions
///
/// Book a learning session. Rejected with 409 when the slot overlaps one of
/// the teacher's non-cancelled sessions; touching endpoints do not conflict.
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session booked", body = SessionResponse),
        (status = 403, description = "Actor is not the session's teacher"),
        (status = 409, description = "Slot overlaps an existing session"),
        (status = 422, description = "Malformed interval or past start"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "sessions"
)]
pub async fn create_session(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    body: web::Json<CreateSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let actor = actor_from(&req)?;
    let body = body.into_inner();

    let pool = pool.get_ref().clone();
    let created = web::block(move || {
        let session = NewSession {
            teacher_id: body.teacher_id,
            student_id: body.student_id,
            subject_id: body.subject_id,
            course_id: body.course_id,
            start_time: body.start_time,
            end_time: body.end_time,
            location: body.location,
            notes: body.notes,
        };
        scheduling(pool)
            .create_session(&actor, session)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(SessionResponse::from(created)))
}

/// PATCH /sessions/{id}
///
/// Partial update; unspecified fields keep their stored values. Moving the
/// interval re-runs the conflict check against the teacher's other sessions.
#[utoipa::path(
    patch,
    path = "/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
    ),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Session updated", body = SessionResponse),
        (status = 403, description = "Actor is not the session's teacher"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "New interval overlaps an existing session"),
        (status = 422, description = "Malformed interval"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "sessions"
)]
pub async fn update_session(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let actor = actor_from(&req)?;
    let session_id = path.into_inner();
    let body = body.into_inner();

    let pool = pool.get_ref().clone();
    let updated = web::block(move || {
        let patch = SessionPatch {
            student_id: body.student_id,
            subject_id: body.subject_id,
            course_id: body.course_id,
            start_time: body.start_time,
            end_time: body.end_time,
            attended: body.attended,
            location: body.location,
            notes: body.notes,
        };
        scheduling(pool)
            .update_session(session_id, &actor, patch)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(SessionResponse::from(updated)))
}

/// POST /sessions/{id}/cancel
///
/// Cancel a future session, recording the reason. The row is kept for the
/// audit trail; past sessions cannot be cancelled.
#[utoipa::path(
    post,
    path = "/sessions/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
    ),
    request_body = CancelSessionRequest,
    responses(
        (status = 200, description = "Session cancelled"),
        (status = 403, description = "Actor is not the session's teacher"),
        (status = 404, description = "Session not found"),
        (status = 422, description = "Session already started or already cancelled"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "sessions"
)]
pub async fn cancel_session(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CancelSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let actor = actor_from(&req)?;
    let session_id = path.into_inner();
    let reason = body.into_inner().reason;

    let pool = pool.get_ref().clone();
    web::block(move || {
        scheduling(pool)
            .cancel_session(session_id, &actor, reason)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({ "status": "CANCELLED" })))
}
