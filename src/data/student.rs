use crate::error::{ApiResult, InvalidDateSnafu, MissingRequiredFieldsSnafu};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use sqlx::{FromRow, types::Json};
use time::{Date, macros::format_description};

/// A student as clients see it.
///
/// Everything but the id is optional because an update overwrites every mutable column,
/// including with `null` for fields the caller left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub student_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<Date>,
    pub email: Option<String>,
    pub enrollment_date: Option<Date>,
    pub courses: Option<Vec<String>>,
}

/// One row of `public.students`, as the database hands it back.
#[derive(Debug, FromRow)]
pub struct StudentRow {
    pub student_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<Date>,
    pub email: Option<String>,
    pub enrollment_date: Option<Date>,
    pub courses: Option<Json<Vec<String>>>,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        let StudentRow {
            student_id,
            first_name,
            last_name,
            date_of_birth,
            email,
            enrollment_date,
            courses,
        } = row;

        Self {
            student_id,
            first_name,
            last_name,
            date_of_birth,
            email,
            enrollment_date,
            courses: courses.map(|Json(courses)| courses),
        }
    }
}

/// The mutable columns, written together on both insert and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<Date>,
    pub email: Option<String>,
    pub enrollment_date: Option<Date>,
    pub courses: Option<Vec<String>>,
}

#[cfg(test)]
impl StudentDetails {
    pub fn into_student(self, student_id: String) -> Student {
        let Self {
            first_name,
            last_name,
            date_of_birth,
            email,
            enrollment_date,
            courses,
        } = self;

        Student {
            student_id,
            first_name,
            last_name,
            date_of_birth,
            email,
            enrollment_date,
            courses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub student_id: String,
    pub details: StudentDetails,
}

/// A scalar as it arrives in a create body. Ids may be numeric, and anything falsy counts as absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl FormValue {
    /// `None` for `""`, `0` and `false`, otherwise the value as text.
    pub fn into_present_text(self) -> Option<String> {
        match self {
            Self::Text(text) if text.is_empty() => None,
            Self::Text(text) => Some(text),
            Self::Number(number) if number.as_f64() == Some(0.0) => None,
            Self::Number(number) => Some(number.to_string()),
            Self::Flag(false) => None,
            Self::Flag(true) => Some(true.to_string()),
        }
    }
}

impl From<&str> for FormValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateStudentForm {
    pub student_id: Option<FormValue>,
    pub first_name: Option<FormValue>,
    pub last_name: Option<FormValue>,
    pub date_of_birth: Option<FormValue>,
    pub email: Option<FormValue>,
    pub enrollment_date: Option<FormValue>,
    pub courses: Option<Vec<String>>,
}

impl CreateStudentForm {
    /// All six scalar fields must be present and truthy. `courses` may be left out.
    pub fn validate(self) -> ApiResult<NewStudent> {
        let Self {
            student_id,
            first_name,
            last_name,
            date_of_birth,
            email,
            enrollment_date,
            courses,
        } = self;

        let (
            Some(student_id),
            Some(first_name),
            Some(last_name),
            Some(date_of_birth),
            Some(email),
            Some(enrollment_date),
        ) = (
            present(student_id),
            present(first_name),
            present(last_name),
            present(date_of_birth),
            present(email),
            present(enrollment_date),
        )
        else {
            return MissingRequiredFieldsSnafu.fail();
        };

        Ok(NewStudent {
            student_id,
            details: StudentDetails {
                first_name: Some(first_name),
                last_name: Some(last_name),
                date_of_birth: Some(parse_date("date_of_birth", &date_of_birth)?),
                email: Some(email),
                enrollment_date: Some(parse_date("enrollment_date", &enrollment_date)?),
                courses,
            },
        })
    }
}

/// Body of an update. Nothing is required: whatever is missing gets cleared.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStudentForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub enrollment_date: Option<String>,
    pub courses: Option<Vec<String>>,
}

impl UpdateStudentForm {
    pub fn into_details(self) -> ApiResult<StudentDetails> {
        let Self {
            first_name,
            last_name,
            date_of_birth,
            email,
            enrollment_date,
            courses,
        } = self;

        Ok(StudentDetails {
            first_name,
            last_name,
            date_of_birth: date_of_birth
                .map(|raw| parse_date("date_of_birth", &raw))
                .transpose()?,
            email,
            enrollment_date: enrollment_date
                .map(|raw| parse_date("enrollment_date", &raw))
                .transpose()?,
            courses,
        })
    }
}

fn present(field: Option<FormValue>) -> Option<String> {
    field.and_then(FormValue::into_present_text)
}

fn parse_date(field: &'static str, raw: &str) -> ApiResult<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .context(InvalidDateSnafu { field })
}
