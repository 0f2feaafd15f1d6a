use crate::{
    data::student::Student,
    directory::filter_and_sort,
    error::{CsvSnafu, FinishCsvSnafu, HubResult, StillLoadingSnafu},
    state::HubState,
};
use axum::{extract::State, http::header, response::IntoResponse};
use serde::Serialize;
use snafu::{ResultExt, ensure};

#[derive(Serialize)]
struct CsvStudent<'a> {
    student_id: String,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    phone: &'a str,
    age: u32,
    gender: &'a str,
    course: &'a str,
    university: &'a str,
    status: &'a str,
    role: &'a str,
    gpa: Option<f32>,
    enrollment_date: Option<String>,
    address: String,
    company: &'a str,
}

impl<'a> From<&'a Student> for CsvStudent<'a> {
    fn from(student: &'a Student) -> Self {
        Self {
            student_id: student.code.to_string(),
            first_name: &student.first_name,
            last_name: &student.last_name,
            email: student.email.as_str(),
            phone: &student.phone,
            age: student.age,
            gender: student.gender.as_str(),
            course: student.course.as_deref().unwrap_or_default(),
            university: student.university.as_deref().unwrap_or_default(),
            status: student.status.as_str(),
            role: student.role.as_str(),
            gpa: student.gpa,
            enrollment_date: student.enrollment_date.map(|date| date.to_string()),
            address: student
                .address
                .as_ref()
                .map(|address| address.one_line())
                .unwrap_or_default(),
            company: student.company_name().unwrap_or_default(),
        }
    }
}

///Every student matching the current directory query, in display order, ignoring pagination.
pub fn students_csv<'a>(students: impl IntoIterator<Item = &'a Student>) -> HubResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(vec![]);
    for student in students {
        writer
            .serialize(CsvStudent::from(student))
            .context(CsvSnafu)?;
    }

    writer
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)
        .context(FinishCsvSnafu)
}

pub async fn get_students_csv(State(state): State<HubState>) -> HubResult<impl IntoResponse> {
    let ui = state.read().await;
    ensure!(!ui.loading, StillLoadingSnafu);

    let matching = filter_and_sort(&ui.students, &ui.query);
    let count = matching.len();
    let csv = students_csv(matching)?;
    info!(count, "Exported students CSV");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"students.csv\"",
            ),
        ],
        csv,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::synthetic::synthesize;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_csv_has_header_and_one_row_per_student() {
        let students = synthesize(3, &mut StdRng::seed_from_u64(8));
        let csv = String::from_utf8(students_csv(&students).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("student_id,first_name,last_name,email"));
        assert!(lines[1].starts_with("STU000001,"));
        assert!(lines[3].starts_with("STU000003,"));
    }

    #[test]
    fn test_empty_csv() {
        let csv = students_csv(std::iter::empty()).unwrap();
        assert!(csv.is_empty());
    }
}
