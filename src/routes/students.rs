use crate::{
    data::student::{CreateStudentForm, Student, UpdateStudentForm},
    error::{ApiResult, InvalidBodySnafu, Operation, StoreFaultSnafu, StudentNotFoundSnafu},
    state::StudentState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use snafu::{OptionExt, ResultExt};

#[derive(Debug, Serialize)]
pub struct StudentEnvelope {
    message: &'static str,
    student: Student,
}

impl StudentEnvelope {
    fn new(message: &'static str, student: Student) -> Json<Self> {
        Json(Self { message, student })
    }
}

pub async fn post_new_student(
    State(state): State<StudentState>,
    form: Result<Json<CreateStudentForm>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StudentEnvelope>)> {
    let Json(form) = form.context(InvalidBodySnafu)?;
    let new_student = form.validate()?;

    let student = state.insert(&new_student).await.context(StoreFaultSnafu {
        operation: Operation::Create,
    })?;

    info!(student_id = %student.student_id, "Created student");
    Ok((
        StatusCode::CREATED,
        StudentEnvelope::new("Student created successfully", student),
    ))
}

pub async fn get_students(State(state): State<StudentState>) -> ApiResult<Json<Vec<Student>>> {
    let students = state.get_all().await.context(StoreFaultSnafu {
        operation: Operation::List,
    })?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<StudentState>,
    Path(student_id): Path<String>,
) -> ApiResult<Json<Student>> {
    let student = state
        .get_by_id(&student_id)
        .await
        .context(StoreFaultSnafu {
            operation: Operation::Get,
        })?
        .context(StudentNotFoundSnafu { student_id })?;
    Ok(Json(student))
}

pub async fn put_student(
    State(state): State<StudentState>,
    Path(student_id): Path<String>,
    form: Result<Json<UpdateStudentForm>, JsonRejection>,
) -> ApiResult<Json<StudentEnvelope>> {
    let Json(form) = form.context(InvalidBodySnafu)?;
    let details = form.into_details()?;

    let student = state
        .update(&student_id, &details)
        .await
        .context(StoreFaultSnafu {
            operation: Operation::Update,
        })?
        .context(StudentNotFoundSnafu { student_id })?;

    info!(student_id = %student.student_id, "Updated student");
    Ok(StudentEnvelope::new("Student updated successfully", student))
}

pub async fn delete_student(
    State(state): State<StudentState>,
    Path(student_id): Path<String>,
) -> ApiResult<Json<StudentEnvelope>> {
    let student = state
        .remove(&student_id)
        .await
        .context(StoreFaultSnafu {
            operation: Operation::Delete,
        })?
        .context(StudentNotFoundSnafu { student_id })?;

    info!(student_id = %student.student_id, "Deleted student");
    Ok(StudentEnvelope::new("Student deleted successfully", student))
}
