use crate::{
    data::student::{NewStudent, Student, StudentDetails},
    error::StudentResult,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod postgres_store;
pub mod student;

#[cfg(test)]
pub mod memory_store;

/// Where students live. Keyed operations return `None` when no row matched.
#[async_trait]
pub trait StudentStore: Debug + Send + Sync {
    async fn insert(&self, new_student: &NewStudent) -> StudentResult<Student>;
    async fn get_all(&self) -> StudentResult<Vec<Student>>;
    async fn get_by_id(&self, student_id: &str) -> StudentResult<Option<Student>>;
    async fn update(
        &self,
        student_id: &str,
        details: &StudentDetails,
    ) -> StudentResult<Option<Student>>;
    async fn remove(&self, student_id: &str) -> StudentResult<Option<Student>>;

    async fn close(&self) {}
}
