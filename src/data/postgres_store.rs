use crate::{
    data::{
        StudentStore,
        student::{NewStudent, Student, StudentDetails, StudentRow},
    },
    error::{MakeQuerySnafu, StudentError, StudentResult},
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Pool, Postgres, types::Json};

#[derive(Debug, Clone)]
pub struct PostgresStudentStore {
    pool: Pool<Postgres>,
}

impl PostgresStudentStore {
    pub const fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn insert(&self, new_student: &NewStudent) -> StudentResult<Student> {
        let NewStudent {
            student_id,
            details,
        } = new_student;

        sqlx::query_as::<_, StudentRow>(
            "INSERT INTO public.students (student_id, first_name, last_name, date_of_birth, email, enrollment_date, courses) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(student_id)
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(details.date_of_birth)
        .bind(&details.email)
        .bind(details.enrollment_date)
        .bind(details.courses.as_ref().map(Json))
        .fetch_one(&self.pool)
        .await
        .map(Student::from)
        .map_err(|source| {
            let is_duplicate = source
                .as_database_error()
                .is_some_and(|db_error| db_error.is_unique_violation());

            if is_duplicate {
                StudentError::DuplicateStudent {
                    student_id: student_id.clone(),
                }
            } else {
                StudentError::MakeQuery { source }
            }
        })
    }

    async fn get_all(&self) -> StudentResult<Vec<Student>> {
        Ok(
            sqlx::query_as::<_, StudentRow>("SELECT * FROM public.students")
                .fetch_all(&self.pool)
                .await
                .context(MakeQuerySnafu)?
                .into_iter()
                .map(Student::from)
                .collect(),
        )
    }

    async fn get_by_id(&self, student_id: &str) -> StudentResult<Option<Student>> {
        Ok(
            sqlx::query_as::<_, StudentRow>("SELECT * FROM public.students WHERE student_id = $1")
                .bind(student_id)
                .fetch_optional(&self.pool)
                .await
                .context(MakeQuerySnafu)?
                .map(Student::from),
        )
    }

    async fn update(
        &self,
        student_id: &str,
        details: &StudentDetails,
    ) -> StudentResult<Option<Student>> {
        Ok(sqlx::query_as::<_, StudentRow>(
            "UPDATE public.students SET first_name = $1, last_name = $2, date_of_birth = $3, email = $4, enrollment_date = $5, courses = $6 WHERE student_id = $7 RETURNING *",
        )
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(details.date_of_birth)
        .bind(&details.email)
        .bind(details.enrollment_date)
        .bind(details.courses.as_ref().map(Json))
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu)?
        .map(Student::from))
    }

    async fn remove(&self, student_id: &str) -> StudentResult<Option<Student>> {
        Ok(sqlx::query_as::<_, StudentRow>(
            "DELETE FROM public.students WHERE student_id = $1 RETURNING *",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu)?
        .map(Student::from))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
