use crate::{
    data::{
        COURSES,
        student::{EnrollmentStatus, Gender, Role, StudentId},
        validation::{FormField, StudentForm, ValidationErrors},
    },
    error::HubResult,
    maud_conveniences::{
        form_submit_button, select_form_element, simple_form_element, subtitle, title,
    },
    state::HubState,
};
use axum::{Form, extract::State};
use maud::{Markup, html};

///Where a submitted form goes - a brand new student, or a replacement for an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    New,
    Existing(StudentId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Basic,
    Address,
    Academic,
    Company,
    Bank,
    Physical,
}

impl Section {
    const ALL: [Self; 6] = [
        Self::Basic,
        Self::Address,
        Self::Academic,
        Self::Company,
        Self::Bank,
        Self::Physical,
    ];

    const fn key(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Address => "address",
            Self::Academic => "academic",
            Self::Company => "company",
            Self::Bank => "bank",
            Self::Physical => "physical",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic Info",
            Self::Address => "Address",
            Self::Academic => "Academic",
            Self::Company => "Company",
            Self::Bank => "Bank",
            Self::Physical => "Physical",
        }
    }

    const fn of(field: FormField) -> Self {
        match field {
            FormField::FirstName
            | FormField::LastName
            | FormField::Username
            | FormField::Email
            | FormField::Phone
            | FormField::Age
            | FormField::Gender
            | FormField::BirthDate => Self::Basic,
            FormField::Street => Self::Address,
            FormField::Course
            | FormField::University
            | FormField::Status
            | FormField::Role
            | FormField::Gpa => Self::Academic,
            FormField::Height | FormField::Weight => Self::Physical,
        }
    }
}

fn section_fields(section: Section, form: &StudentForm, errors: &ValidationErrors) -> Markup {
    let err = |field: FormField| errors.get(field);

    match section {
        Section::Basic => html! {
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (simple_form_element("first_name", "First Name", true, None, &form.first_name, err(FormField::FirstName)))
                (simple_form_element("last_name", "Last Name", true, None, &form.last_name, err(FormField::LastName)))
                (simple_form_element("maiden_name", "Maiden Name", false, None, &form.maiden_name, None))
                (simple_form_element("username", "Username", true, None, &form.username, err(FormField::Username)))
                (simple_form_element("email", "Email", true, Some("email"), &form.email, err(FormField::Email)))
                (simple_form_element("phone", "Phone", true, Some("tel"), &form.phone, err(FormField::Phone)))
                (simple_form_element("age", "Age", true, Some("number"), &form.age, err(FormField::Age)))
                (select_form_element(
                    "gender",
                    "Gender",
                    std::iter::once(("", "Select gender")).chain(Gender::ALL.map(|g| (g.as_str(), g.as_str()))),
                    &form.gender,
                    err(FormField::Gender),
                ))
                (simple_form_element("birth_date", "Date of Birth", true, Some("date"), &form.birth_date, err(FormField::BirthDate)))
            }
        },
        Section::Address => html! {
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (simple_form_element("street", "Street Address", true, None, &form.street, err(FormField::Street)))
                (simple_form_element("city", "City", false, None, &form.city, None))
                (simple_form_element("state", "State", false, None, &form.state, None))
                (simple_form_element("postal_code", "Postal Code", false, None, &form.postal_code, None))
                (simple_form_element("country", "Country", false, None, &form.country, None))
            }
        },
        Section::Academic => html! {
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (select_form_element(
                    "course",
                    "Course",
                    std::iter::once(("", "Select course")).chain(COURSES.map(|c| (c, c))),
                    &form.course,
                    err(FormField::Course),
                ))
                (simple_form_element("university", "University", true, None, &form.university, err(FormField::University)))
                (select_form_element(
                    "status",
                    "Enrollment Status",
                    EnrollmentStatus::ALL.map(|s| (s.as_str(), s.as_str())),
                    &form.status,
                    err(FormField::Status),
                ))
                (select_form_element(
                    "role",
                    "Role",
                    Role::ALL.map(|r| (r.as_str(), r.as_str())),
                    &form.role,
                    err(FormField::Role),
                ))
                (simple_form_element("gpa", "GPA", false, None, &form.gpa, err(FormField::Gpa)))
            }
        },
        Section::Company => html! {
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (simple_form_element("company_name", "Company", false, None, &form.company_name, None))
                (simple_form_element("company_department", "Department", false, None, &form.company_department, None))
                (simple_form_element("company_title", "Job Title", false, None, &form.company_title, None))
            }
        },
        Section::Bank => html! {
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (simple_form_element("card_number", "Card Number", false, None, &form.card_number, None))
                (simple_form_element("card_type", "Card Type", false, None, &form.card_type, None))
                (simple_form_element("card_expire", "Card Expiry", false, None, &form.card_expire, None))
                (simple_form_element("currency", "Currency", false, None, &form.currency, None))
            }
        },
        Section::Physical => html! {
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (simple_form_element("height", "Height (cm)", false, None, &form.height, err(FormField::Height)))
                (simple_form_element("weight", "Weight (kg)", false, None, &form.weight, err(FormField::Weight)))
                (simple_form_element("blood_group", "Blood Group", false, None, &form.blood_group, None))
                (simple_form_element("eye_color", "Eye Color", false, None, &form.eye_color, None))
                (simple_form_element("hair_color", "Hair Color", false, None, &form.hair_color, None))
                (simple_form_element("hair_type", "Hair Type", false, None, &form.hair_type, None))
            }
        },
    }
}

///The registration form, split into sections that are switched between without a round trip.
///
///The first section with an error is opened, and each section label shows how many errors it holds.
pub fn student_form(
    form: &StudentForm,
    errors: &ValidationErrors,
    target: FormTarget,
    message: Option<&str>,
) -> Markup {
    let (put_url, hx_target, button) = match target {
        FormTarget::New => (
            "/internal/add_student".to_string(),
            "#main",
            "Add Student",
        ),
        FormTarget::Existing(id) => (
            format!("/internal/students/{id}"),
            "#in_focus",
            "Save Changes",
        ),
    };

    let open_section = errors
        .iter()
        .next()
        .map_or(Section::Basic, |(field, _)| Section::of(field));
    let errors_in = |section: Section| {
        errors
            .iter()
            .filter(|(field, _)| Section::of(*field) == section)
            .count()
    };

    html! {
        @if let Some(message) = message {
            div class="bg-green-100 border border-green-400 text-green-700 px-4 py-3 rounded relative mb-4" role="status" {
                (message)
            }
        }
        @if !errors.is_empty() {
            div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
                strong class="font-bold" {"Please fix the following errors:"}
                ul class="list-disc ml-6" {
                    @for (field, error) in errors.iter() {
                        li { label for=(field.name()) class="cursor-pointer" {(error)} }
                    }
                }
            }
        }

        form hx-put=(put_url) hx-trigger="submit" hx-target=(hx_target) class="p-4 bg-gray-800 rounded shadow-md flex flex-col" {
            @for section in Section::ALL {
                input type="radio" name="form_section" value=(section.key()) id={"section_" (section.key())} class={"hidden peer/" (section.key())} checked[section == open_section];
            }
            div class="flex flex-row flex-wrap gap-2 mb-4" {
                @for section in Section::ALL {
                    label for={"section_" (section.key())} class="cursor-pointer bg-slate-600 hover:bg-slate-800 py-1 px-3 rounded text-sm" {
                        (section.label())
                        @let count = errors_in(section);
                        @if count > 0 {
                            span class="ml-2 bg-red-500 rounded-full px-2 text-xs" {(count)}
                        }
                    }
                }
            }
            @for section in Section::ALL {
                div class={"hidden peer-checked/" (section.key()) ":block"} {
                    (subtitle(section.label()))
                    (section_fields(section, form, errors))
                }
            }
            (form_submit_button(button))
        }
    }
}

pub fn add_student_page() -> Markup {
    html! {
        (title("Add New Student"))
        (student_form(&StudentForm::default(), &ValidationErrors::default(), FormTarget::New, None))
    }
}

pub async fn internal_get_add_student_form() -> Markup {
    add_student_page()
}

pub async fn internal_put_new_student(
    State(state): State<HubState>,
    Form(form): Form<StudentForm>,
) -> HubResult<Markup> {
    Ok(match state.submit_new_student(&form).await? {
        Ok(student) => html! {
            (title("Add New Student"))
            (student_form(
                &StudentForm::default(),
                &ValidationErrors::default(),
                FormTarget::New,
                Some(&format!("Added {} ({})", student.full_name(), student.code)),
            ))
        },
        Err(errors) => html! {
            (title("Add New Student"))
            (student_form(&form, &errors, FormTarget::New, None))
        },
    })
}
