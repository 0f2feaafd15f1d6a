use crate::data::student::{
    Address, Bank, Company, EnrollmentStatus, Gender, PhysicalTraits, Role, Student, StudentCode,
    StudentId,
};
use email_address::EmailAddress;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, str::FromStr};

pub const MIN_AGE: u32 = 16;
pub const MAX_AGE: u32 = 100;

///Raw registration form input, exactly as submitted - every field is a string and empty means absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StudentForm {
    pub first_name: String,
    pub last_name: String,
    pub maiden_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub gender: String,
    pub birth_date: String,
    pub course: String,
    pub university: String,
    pub status: String,
    pub role: String,
    pub gpa: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub company_name: String,
    pub company_department: String,
    pub company_title: String,
    pub card_number: String,
    pub card_type: String,
    pub card_expire: String,
    pub currency: String,
    pub height: String,
    pub weight: String,
    pub blood_group: String,
    pub eye_color: String,
    pub hair_color: String,
    pub hair_type: String,
}

impl StudentForm {
    ///Pre-fills the form for editing an existing record.
    pub fn from_student(student: &Student) -> Self {
        let address = student.address.clone().unwrap_or_default();
        let company = student.company.clone().unwrap_or_default();
        let bank = student.bank.clone().unwrap_or_default();
        let physical = student.physical.clone().unwrap_or_default();
        let number = |n: Option<f32>| n.map(|n| n.to_string()).unwrap_or_default();

        Self {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            maiden_name: student.maiden_name.clone().unwrap_or_default(),
            username: student.username.clone(),
            email: student.email.to_string(),
            phone: student.phone.clone(),
            age: student.age.to_string(),
            gender: student.gender.as_str().to_string(),
            birth_date: student
                .birth_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
            course: student.course.clone().unwrap_or_default(),
            university: student.university.clone().unwrap_or_default(),
            status: student.status.as_str().to_string(),
            role: student.role.as_str().to_string(),
            gpa: student.gpa.map(|gpa| format!("{gpa:.2}")).unwrap_or_default(),
            street: address.street,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
            company_name: company.name,
            company_department: company.department,
            company_title: company.title,
            card_number: bank.card_number,
            card_type: bank.card_type,
            card_expire: bank.expiry,
            currency: bank.currency,
            height: number(physical.height),
            weight: number(physical.weight),
            blood_group: physical.blood_group,
            eye_color: physical.eye_color,
            hair_color: physical.hair_color,
            hair_type: physical.hair_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Username,
    Email,
    Phone,
    Age,
    Gender,
    BirthDate,
    Course,
    University,
    Status,
    Role,
    Gpa,
    Street,
    Height,
    Weight,
}

impl FormField {
    ///The form input name this field is submitted under.
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Username => "username",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::BirthDate => "birth_date",
            Self::Course => "course",
            Self::University => "university",
            Self::Status => "status",
            Self::Role => "role",
            Self::Gpa => "gpa",
            Self::Street => "street",
            Self::Height => "height",
            Self::Weight => "weight",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    fn add(&mut self, field: FormField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[cfg(test)]
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(field, _)| field.name() == name)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

pub fn next_id(existing: &[Student]) -> StudentId {
    existing.iter().map(|s| s.id).max().map_or(1, |max| max + 1)
}

///Validates a brand new record against the current collection.
///
///On success the record gets the next free id and today's enrollment date.
pub fn validate_new(
    form: &StudentForm,
    existing: &[Student],
    today: Date,
) -> Result<Student, ValidationErrors> {
    let id = next_id(existing);
    let mut student = validate(form, existing, id, today)?;
    student.enrollment_date = Some(today);
    Ok(student)
}

///Validates a replacement for the record with `id`. Uniqueness checks skip that record.
pub fn validate_edit(
    form: &StudentForm,
    existing: &[Student],
    id: StudentId,
    today: Date,
) -> Result<Student, ValidationErrors> {
    validate(form, existing, id, today)
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn is_valid_phone(raw: &str) -> bool {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    compact.chars().count() >= 10
        && compact
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '(' | ')'))
}

fn parse_email(raw: &str) -> Option<EmailAddress> {
    let email = EmailAddress::from_str(raw.trim()).ok()?;
    let domain = email.domain();
    let dotted = domain
        .split_once('.')
        .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty());
    dotted.then_some(email)
}

fn parse_optional_number(
    raw: &str,
    field: FormField,
    errors: &mut ValidationErrors,
    valid: impl Fn(f32) -> bool,
    message: &str,
) -> Option<f32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match raw.parse::<f32>() {
        Ok(n) if n.is_finite() && valid(n) => Some(n),
        _ => {
            errors.add(field, message);
            None
        }
    }
}

#[allow(clippy::too_many_lines)]
fn validate(
    form: &StudentForm,
    existing: &[Student],
    id: StudentId,
    today: Date,
) -> Result<Student, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let others = || existing.iter().filter(move |s| s.id != id);

    let first_name = form.first_name.trim();
    if first_name.is_empty() {
        errors.add(FormField::FirstName, "First name is required");
    } else if first_name.chars().count() < 2 {
        errors.add(FormField::FirstName, "First name must be at least 2 characters");
    }

    let last_name = form.last_name.trim();
    if last_name.is_empty() {
        errors.add(FormField::LastName, "Last name is required");
    } else if last_name.chars().count() < 2 {
        errors.add(FormField::LastName, "Last name must be at least 2 characters");
    }

    let email = if form.email.trim().is_empty() {
        errors.add(FormField::Email, "Email is required");
        None
    } else if let Some(email) = parse_email(&form.email.to_lowercase()) {
        if others().any(|s| s.email.as_str().eq_ignore_ascii_case(email.as_str())) {
            errors.add(FormField::Email, "A student with this email already exists");
        }
        Some(email)
    } else {
        errors.add(FormField::Email, "Please enter a valid email address");
        None
    };

    let username = form.username.trim();
    if username.is_empty() {
        errors.add(FormField::Username, "Username is required");
    } else if others().any(|s| s.username == username) {
        errors.add(FormField::Username, "This username is already taken");
    }

    let phone = form.phone.trim();
    if phone.is_empty() {
        errors.add(FormField::Phone, "Phone number is required");
    } else if !is_valid_phone(phone) {
        errors.add(
            FormField::Phone,
            "Please enter a valid phone number (minimum 10 digits)",
        );
    }

    let age = match form.age.trim().parse::<u32>() {
        Ok(age) if (MIN_AGE..=MAX_AGE).contains(&age) => Some(age),
        _ => {
            errors.add(FormField::Age, "Age must be between 16 and 100");
            None
        }
    };

    let gender = if form.gender.trim().is_empty() {
        errors.add(FormField::Gender, "Gender selection is required");
        None
    } else if let Ok(gender) = form.gender.parse::<Gender>() {
        Some(gender)
    } else {
        errors.add(FormField::Gender, "Please select a valid gender");
        None
    };

    let birth_date = if form.birth_date.trim().is_empty() {
        errors.add(FormField::BirthDate, "Date of birth is required");
        None
    } else if let Ok(date) = form.birth_date.trim().parse::<Date>() {
        let years = i32::from(today.year()) - i32::from(date.year());
        if years < MIN_AGE as i32 || years > MAX_AGE as i32 {
            errors.add(
                FormField::BirthDate,
                "Date of birth must correspond to age between 16 and 100",
            );
        }
        Some(date)
    } else {
        errors.add(FormField::BirthDate, "Please enter a valid date (YYYY-MM-DD)");
        None
    };

    let course = non_empty(&form.course);
    if course.is_none() {
        errors.add(FormField::Course, "Course selection is required");
    }

    let university = non_empty(&form.university);
    if university.is_none() {
        errors.add(FormField::University, "University is required");
    }

    let street = non_empty(&form.street);
    if street.is_none() {
        errors.add(FormField::Street, "Address is required");
    }

    let status = if form.status.trim().is_empty() {
        EnrollmentStatus::default()
    } else if let Ok(status) = form.status.parse() {
        status
    } else {
        errors.add(FormField::Status, "Unknown enrollment status");
        EnrollmentStatus::default()
    };

    let role = if form.role.trim().is_empty() {
        Role::default()
    } else if let Ok(role) = form.role.parse() {
        role
    } else {
        errors.add(FormField::Role, "Unknown role");
        Role::default()
    };

    let gpa = parse_optional_number(
        &form.gpa,
        FormField::Gpa,
        &mut errors,
        |gpa| (0.0..=4.0).contains(&gpa),
        "GPA must be between 0.0 and 4.0",
    );
    let height = parse_optional_number(
        &form.height,
        FormField::Height,
        &mut errors,
        |h| h > 0.0,
        "Height must be a positive number",
    );
    let weight = parse_optional_number(
        &form.weight,
        FormField::Weight,
        &mut errors,
        |w| w > 0.0,
        "Weight must be a positive number",
    );

    if !errors.is_empty() {
        return Err(errors);
    }

    //every required field has been checked above, so these are all present
    let (Some(email), Some(age), Some(gender), Some(street)) = (email, age, gender, street) else {
        return Err(errors);
    };

    let company = non_empty(&form.company_name).map(|name| Company {
        name,
        department: form.company_department.trim().to_string(),
        title: form.company_title.trim().to_string(),
    });
    let bank = non_empty(&form.card_number).map(|card_number| Bank {
        card_number,
        card_type: form.card_type.trim().to_string(),
        expiry: form.card_expire.trim().to_string(),
        currency: form.currency.trim().to_string(),
    });
    let physical = PhysicalTraits {
        height,
        weight,
        blood_group: form.blood_group.trim().to_string(),
        eye_color: form.eye_color.trim().to_string(),
        hair_color: form.hair_color.trim().to_string(),
        hair_type: form.hair_type.trim().to_string(),
    };

    Ok(Student {
        id,
        code: StudentCode::from_id(id),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        maiden_name: non_empty(&form.maiden_name),
        username: username.to_string(),
        email,
        phone: phone.to_string(),
        age,
        gender,
        birth_date,
        image: None,
        course,
        university,
        status,
        role,
        gpa,
        enrollment_date: None,
        address: Some(Address {
            street,
            city: form.city.trim().to_string(),
            state: form.state.trim().to_string(),
            postal_code: form.postal_code.trim().to_string(),
            country: form.country.trim().to_string(),
        }),
        company,
        bank,
        physical: (physical != PhysicalTraits::default()).then_some(physical),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> Date {
        Date::new(2025, 6, 1).unwrap()
    }

    fn valid_form() -> StudentForm {
        StudentForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: "ada".into(),
            email: "Ada.Lovelace@Example.com".into(),
            phone: "+44 (020) 7946-0958".into(),
            age: "22".into(),
            gender: "female".into(),
            birth_date: "2003-01-15".into(),
            course: "Mathematics".into(),
            university: "University of London".into(),
            street: "12 St James's Square".into(),
            city: "London".into(),
            ..StudentForm::default()
        }
    }

    fn existing() -> Vec<Student> {
        let mut form = valid_form();
        form.username = "taken".into();
        form.email = "taken@example.com".into();
        vec![validate(&form, &[], 7, today()).unwrap()]
    }

    #[test]
    fn test_valid_form_builds_student() {
        let students = existing();
        let student = validate_new(&valid_form(), &students, today()).unwrap();

        assert_eq!(student.id, 8);
        assert_eq!(student.code.to_string(), "STU000008");
        assert_eq!(student.email.as_str(), "ada.lovelace@example.com");
        assert_eq!(student.status, EnrollmentStatus::Active);
        assert_eq!(student.role, Role::Student);
        assert_eq!(student.enrollment_date, Some(today()));
        assert_eq!(student.address.unwrap().city, "London");
        assert!(student.company.is_none());
        assert!(student.physical.is_none());
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = validate_new(&StudentForm::default(), &[], today()).unwrap_err();

        for field in [
            FormField::FirstName,
            FormField::LastName,
            FormField::Username,
            FormField::Email,
            FormField::Phone,
            FormField::Age,
            FormField::Gender,
            FormField::BirthDate,
            FormField::Course,
            FormField::University,
            FormField::Street,
        ] {
            assert!(errors.get(field).is_some(), "missing error for {field:?}");
        }
        assert!(errors.get(FormField::Gpa).is_none());
    }

    #[test]
    fn test_duplicate_email_is_rejected_case_insensitively() {
        let students = existing();
        let mut form = valid_form();
        form.email = "TAKEN@example.com".into();

        let errors = validate_new(&form, &students, today()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(FormField::Email),
            Some("A student with this email already exists")
        );
    }

    #[test]
    fn test_duplicate_username_is_rejected() {
        let students = existing();
        let mut form = valid_form();
        form.username = "taken".into();

        let errors = validate_new(&form, &students, today()).unwrap_err();
        assert_eq!(
            errors.get(FormField::Username),
            Some("This username is already taken")
        );
    }

    #[test]
    fn test_edit_ignores_own_email_and_username() {
        let students = existing();
        let mut form = valid_form();
        form.username = "taken".into();
        form.email = "taken@example.com".into();

        let edited = validate_edit(&form, &students, 7, today()).unwrap();
        assert_eq!(edited.id, 7);
        assert!(edited.enrollment_date.is_none());
    }

    #[test]
    fn test_format_and_range_rules() {
        let mut form = valid_form();
        form.first_name = "A".into();
        form.email = "nobody@localhost".into();
        form.phone = "12345".into();
        form.age = "15".into();
        form.birth_date = "2020-01-01".into();
        form.gpa = "4.5".into();
        form.height = "-3".into();
        form.role = "teacher".into();

        let errors = validate_new(&form, &[], today()).unwrap_err();
        assert_eq!(
            errors.get(FormField::FirstName),
            Some("First name must be at least 2 characters")
        );
        assert_eq!(
            errors.get(FormField::Email),
            Some("Please enter a valid email address")
        );
        assert!(errors.get(FormField::Phone).is_some());
        assert_eq!(errors.get(FormField::Age), Some("Age must be between 16 and 100"));
        assert!(errors.get(FormField::BirthDate).is_some());
        assert!(errors.get(FormField::Gpa).is_some());
        assert!(errors.get(FormField::Height).is_some());
        assert_eq!(errors.get_by_name("role"), Some("Unknown role"));
    }

    #[test]
    fn test_optional_groups_are_built_when_present() {
        let mut form = valid_form();
        form.company_name = "Analytical Engines Ltd".into();
        form.company_title = "Programmer".into();
        form.card_number = "4111111111111111".into();
        form.gpa = "3.9".into();
        form.height = "165.5".into();
        form.status = "graduated".into();

        let student = validate_new(&form, &[], today()).unwrap();
        assert_eq!(student.company_name(), Some("Analytical Engines Ltd"));
        assert_eq!(student.bank.unwrap().masked_card_number(), "**** **** **** 1111");
        assert_eq!(student.gpa, Some(3.9));
        assert_eq!(student.physical.unwrap().height, Some(165.5));
        assert_eq!(student.status, EnrollmentStatus::Graduated);
    }

    #[test]
    fn test_form_round_trips_through_existing_student() {
        let students = existing();
        let form = StudentForm::from_student(&students[0]);
        let again = validate_edit(&form, &students, 7, today()).unwrap();
        assert_eq!(again.email, students[0].email);
        assert_eq!(again.birth_date, students[0].birth_date);
    }
}
