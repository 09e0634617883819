use crate::{
    data::{
        StudentStore,
        student::{NewStudent, Student, StudentDetails},
    },
    error::{StudentError, StudentResult},
};
use async_trait::async_trait;
use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

/// In-process stand-in for the students table. Keeps insertion order and the primary key.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    rows: Mutex<Vec<Student>>,
    closed: AtomicBool,
}

impl MemoryStudentStore {
    pub fn row_count(&self) -> usize {
        self.rows.lock().expect("students lock poisoned").len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn insert(&self, new_student: &NewStudent) -> StudentResult<Student> {
        let mut rows = self.rows.lock().expect("students lock poisoned");
        if rows
            .iter()
            .any(|row| row.student_id == new_student.student_id)
        {
            return Err(StudentError::DuplicateStudent {
                student_id: new_student.student_id.clone(),
            });
        }

        let student = new_student
            .details
            .clone()
            .into_student(new_student.student_id.clone());
        rows.push(student.clone());
        Ok(student)
    }

    async fn get_all(&self) -> StudentResult<Vec<Student>> {
        Ok(self.rows.lock().expect("students lock poisoned").clone())
    }

    async fn get_by_id(&self, student_id: &str) -> StudentResult<Option<Student>> {
        Ok(self
            .rows
            .lock()
            .expect("students lock poisoned")
            .iter()
            .find(|row| row.student_id == student_id)
            .cloned())
    }

    async fn update(
        &self,
        student_id: &str,
        details: &StudentDetails,
    ) -> StudentResult<Option<Student>> {
        let mut rows = self.rows.lock().expect("students lock poisoned");
        Ok(rows
            .iter_mut()
            .find(|row| row.student_id == student_id)
            .map(|row| {
                *row = details.clone().into_student(student_id.to_string());
                row.clone()
            }))
    }

    async fn remove(&self, student_id: &str) -> StudentResult<Option<Student>> {
        let mut rows = self.rows.lock().expect("students lock poisoned");
        Ok(rows
            .iter()
            .position(|row| row.student_id == student_id)
            .map(|index| rows.remove(index)))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Fails every call the way a dropped database connection would.
#[derive(Debug, Default)]
pub struct UnreachableStudentStore;

impl UnreachableStudentStore {
    fn fault<T>() -> StudentResult<T> {
        Err(StudentError::MakeQuery {
            source: sqlx::Error::PoolTimedOut,
        })
    }
}

#[async_trait]
impl StudentStore for UnreachableStudentStore {
    async fn insert(&self, _new_student: &NewStudent) -> StudentResult<Student> {
        Self::fault()
    }

    async fn get_all(&self) -> StudentResult<Vec<Student>> {
        Self::fault()
    }

    async fn get_by_id(&self, _student_id: &str) -> StudentResult<Option<Student>> {
        Self::fault()
    }

    async fn update(
        &self,
        _student_id: &str,
        _details: &StudentDetails,
    ) -> StudentResult<Option<Student>> {
        Self::fault()
    }

    async fn remove(&self, _student_id: &str) -> StudentResult<Option<Student>> {
        Self::fault()
    }
}
