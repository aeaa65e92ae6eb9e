//! Student CRUD handlers.
//!
//! Reads go through the read-through cache installed on the routes; every
//! successful write invalidates the affected cache entries before the
//! response is sent.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use roster_core::{NewStudent, Student, StudentFilter, StudentPatch};
use serde::Serialize;
use tracing::{info, instrument};

use crate::cache::Mutation;
use crate::error::AppError;
use crate::extractors::{ApiJson, ApiQuery};
use crate::state::AppState;

/// Body returned by a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: String,
}

/// Handler for GET /api/students.
#[instrument(skip_all)]
pub async fn list_students(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<StudentFilter>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = state.repository().find(&filter).await?;
    Ok(Json(students))
}

/// Handler for GET /api/students/{id}.
#[instrument(skip_all, fields(id = %id))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let student = state.repository().find_by_id(&id).await?;
    Ok(Json(student))
}

/// Handler for POST /api/students.
#[instrument(skip_all)]
pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewStudent>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = state.repository().create(payload).await?;
    info!(id = %student.id, "Student created");

    state.invalidator().invalidate(&Mutation::Created).await;

    Ok((StatusCode::CREATED, Json(student)))
}

/// Handler for PUT /api/students/{id}.
#[instrument(skip_all, fields(id = %id))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<StudentPatch>,
) -> Result<Json<Student>, AppError> {
    let student = state.repository().update(&id, patch).await?;
    info!("Student updated");

    state
        .invalidator()
        .invalidate(&Mutation::Updated { id })
        .await;

    Ok(Json(student))
}

/// Handler for DELETE /api/students/{id}.
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.repository().delete(&id).await?;
    info!("Student deleted");

    let mutation = Mutation::Deleted { id: id.clone() };
    state.invalidator().invalidate(&mutation).await;

    Ok(Json(DeleteResponse {
        message: "Student deleted successfully".to_string(),
        id,
    }))
}
