use crate::data::student::{EnrollmentStatus, Role, Student};
use std::collections::HashSet;

pub const RECENT_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total: usize,
    pub by_status: Vec<(EnrollmentStatus, usize)>,
    pub by_role: Vec<(Role, usize)>,
    pub distinct_courses: usize,
    pub average_age: Option<f32>,
    pub average_gpa: Option<f32>,
}

impl DashboardStats {
    #[allow(clippy::cast_precision_loss)]
    pub fn from_students(students: &[Student]) -> Self {
        let by_status = EnrollmentStatus::ALL
            .into_iter()
            .map(|status| (status, students.iter().filter(|s| s.status == status).count()))
            .collect();
        let by_role = Role::ALL
            .into_iter()
            .map(|role| (role, students.iter().filter(|s| s.role == role).count()))
            .collect();

        let distinct_courses = students
            .iter()
            .filter_map(|s| s.course.as_deref())
            .collect::<HashSet<_>>()
            .len();

        let average_age = (!students.is_empty()).then(|| {
            students.iter().map(|s| s.age as f32).sum::<f32>() / students.len() as f32
        });

        let gpas: Vec<f32> = students.iter().filter_map(|s| s.gpa).collect();
        let average_gpa =
            (!gpas.is_empty()).then(|| gpas.iter().sum::<f32>() / gpas.len() as f32);

        Self {
            total: students.len(),
            by_status,
            by_role,
            distinct_courses,
            average_age,
            average_gpa,
        }
    }

    pub fn with_status(&self, status: EnrollmentStatus) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    }
}

///The newest records - additions are prepended, so these are the first few.
pub fn recent_students(students: &[Student]) -> &[Student] {
    &students[..students.len().min(RECENT_COUNT)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::synthetic::synthesize;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_counts_add_up() {
        let students = synthesize(40, &mut StdRng::seed_from_u64(7));
        let stats = DashboardStats::from_students(&students);

        assert_eq!(stats.total, 40);
        assert_eq!(stats.by_status.iter().map(|(_, n)| n).sum::<usize>(), 40);
        assert_eq!(stats.by_role.iter().map(|(_, n)| n).sum::<usize>(), 40);
        assert!(stats.distinct_courses >= 1);
        let age = stats.average_age.unwrap();
        assert!((18.0..=32.0).contains(&age));
        assert!(stats.average_gpa.is_some());
    }

    #[test]
    fn test_empty_dashboard() {
        let stats = DashboardStats::from_students(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.with_status(EnrollmentStatus::Active), 0);
        assert_eq!(stats.distinct_courses, 0);
        assert!(stats.average_age.is_none());
        assert!(stats.average_gpa.is_none());
        assert!(recent_students(&[]).is_empty());
    }

    #[test]
    fn test_recent_students_are_the_first_five() {
        let students = synthesize(8, &mut StdRng::seed_from_u64(1));
        let recent: Vec<u64> = recent_students(&students).iter().map(|s| s.id).collect();
        assert_eq!(recent, vec![1, 2, 3, 4, 5]);
    }
}
