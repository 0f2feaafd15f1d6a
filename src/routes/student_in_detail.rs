use crate::{
    data::{
        student::{Student, StudentId},
        validation::{StudentForm, ValidationErrors},
    },
    error::{HubResult, MissingStudentSnafu},
    maud_conveniences::{Email, subtitle, title},
    routes::add_student::{FormTarget, student_form},
    state::{HubState, ui::Confirmation},
};
use axum::{
    Form,
    extract::{Path, State},
};
use maud::{Markup, html};
use serde::Deserialize;
use snafu::OptionExt;

fn detail_row(label: &str, value: Markup) -> Markup {
    html! {
        div class="flex flex-row justify-between py-1 border-b border-gray-700" {
            span class="text-gray-400" {(label)}
            span class="text-gray-200 text-right" {(value)}
        }
    }
}

fn text_row(label: &str, value: Option<&str>) -> Markup {
    html! {
        @if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            (detail_row(label, html! {(value)}))
        }
    }
}

pub fn student_detail(student: &Student, message: Option<&str>) -> Markup {
    let id = student.id;

    html! {
        div class="bg-gray-800 rounded-md p-4 shadow-md flex flex-col space-y-2" {
            @if let Some(message) = message {
                div class="bg-green-100 border border-green-400 text-green-700 px-4 py-3 rounded relative mb-2" role="status" {(message)}
            }
            div class="flex flex-row items-center space-x-4" {
                img src=(student.avatar_url()) alt=(student.full_name()) class="w-20 h-20 rounded-full";
                div {
                    (title(student))
                    p class="text-gray-400" {(student.code.to_string())}
                }
            }

            (subtitle("Contact"))
            (detail_row("Email", html! {(Email(&student.email))}))
            (text_row("Phone", Some(&*student.phone)))
            (text_row("Username", Some(&*student.username)))
            @if let Some(address) = &student.address {
                (text_row("Address", Some(&*address.one_line())))
            }

            (subtitle("Academic"))
            (text_row("Course", student.course.as_deref()))
            (text_row("University", student.university.as_deref()))
            (text_row("Status", Some(student.status.as_str())))
            (text_row("Role", Some(student.role.as_str())))
            @if let Some(gpa) = student.gpa {
                (text_row("GPA", Some(&*format!("{gpa:.2}"))))
            }
            @if let Some(date) = student.enrollment_date {
                (text_row("Enrolled", Some(&*date.to_string())))
            }

            (subtitle("Personal"))
            (text_row("Age", Some(&*student.age.to_string())))
            (text_row("Gender", Some(student.gender.as_str())))
            @if let Some(date) = student.birth_date {
                (text_row("Date of Birth", Some(&*date.to_string())))
            }
            (text_row("Maiden Name", student.maiden_name.as_deref()))

            @if let Some(company) = &student.company {
                (subtitle("Company"))
                (text_row("Company", Some(&*company.name)))
                (text_row("Department", Some(&*company.department)))
                (text_row("Title", Some(&*company.title)))
            }
            @if let Some(bank) = &student.bank {
                (subtitle("Bank"))
                (text_row("Card", Some(&*bank.masked_card_number())))
                (text_row("Card Type", Some(&*bank.card_type)))
                (text_row("Expires", Some(&*bank.expiry)))
                (text_row("Currency", Some(&*bank.currency)))
            }
            @if let Some(physical) = &student.physical {
                (subtitle("Physical"))
                @if let Some(height) = physical.height {
                    (text_row("Height", Some(&*format!("{height:.1} cm"))))
                }
                @if let Some(weight) = physical.weight {
                    (text_row("Weight", Some(&*format!("{weight:.1} kg"))))
                }
                (text_row("Blood Group", Some(&*physical.blood_group)))
                (text_row("Eye Color", Some(&*physical.eye_color)))
                (text_row("Hair", Some(&*format!("{} {}", physical.hair_color, physical.hair_type))))
            }

            div class="flex flex-row space-x-4 pt-2" {
                button hx-get={"/internal/students/" (id) "/edit"} hx-target="#in_focus" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded" {"Edit"}
                button hx-post={"/internal/students/" (id) "/delete"} hx-target="#in_focus" class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" {"Delete"}
            }
        }
    }
}

fn delete_confirmation(student: &Student) -> Markup {
    let id = student.id;
    let vals = |confirmed: bool| format!(r#"{{"id": {id}, "confirmed": {confirmed}}}"#);

    html! {
        div class="bg-gray-800 rounded-md p-4 shadow-md flex flex-col space-y-4" role="alertdialog" {
            (subtitle("Delete student?"))
            p class="text-gray-300" {
                "Are you sure you want to delete " strong {(student)} " (" (student.code.to_string()) ")? This can't be undone."
            }
            div class="flex flex-row space-x-4" {
                button hx-post="/internal/pending_delete" hx-vals=(vals(true)) hx-target="#in_focus" class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" {"Delete"}
                button hx-post="/internal/pending_delete" hx-vals=(vals(false)) hx-target="#in_focus" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {"Cancel"}
            }
        }
    }
}

pub async fn internal_get_student(
    State(state): State<HubState>,
    Path(id): Path<StudentId>,
) -> HubResult<Markup> {
    let ui = state.read().await;
    let student = ui.student(id).context(MissingStudentSnafu { id })?;
    Ok(student_detail(student, None))
}

pub async fn internal_get_edit_form(
    State(state): State<HubState>,
    Path(id): Path<StudentId>,
) -> HubResult<Markup> {
    let ui = state.read().await;
    let student = ui.student(id).context(MissingStudentSnafu { id })?;

    Ok(html! {
        (subtitle(format!("Editing {}", student.full_name())))
        (student_form(&StudentForm::from_student(student), &ValidationErrors::default(), FormTarget::Existing(id), None))
    })
}

pub async fn internal_put_student(
    State(state): State<HubState>,
    Path(id): Path<StudentId>,
    Form(form): Form<StudentForm>,
) -> HubResult<Markup> {
    Ok(match state.submit_edit(id, &form).await? {
        Ok(student) => student_detail(&student, Some("Changes saved")),
        Err(errors) => html! {
            (subtitle("Editing student"))
            (student_form(&form, &errors, FormTarget::Existing(id), None))
        },
    })
}

pub async fn internal_post_request_delete(
    State(state): State<HubState>,
    Path(id): Path<StudentId>,
) -> HubResult<Markup> {
    let student = state.request_delete(id).await?;
    Ok(delete_confirmation(&student))
}

#[derive(Deserialize)]
pub struct ResolveDeleteForm {
    id: StudentId,
    confirmed: bool,
}

pub async fn internal_post_resolve_delete(
    State(state): State<HubState>,
    Form(ResolveDeleteForm { id, confirmed }): Form<ResolveDeleteForm>,
) -> HubResult<Markup> {
    let confirmation = if confirmed {
        Confirmation::Confirmed
    } else {
        Confirmation::Declined
    };

    Ok(match state.resolve_delete(id, confirmation).await? {
        Some(removed) => html! {
            div class="bg-gray-800 rounded-md p-4 shadow-md text-gray-300" role="status" {
                "Deleted " (removed) " (" (removed.code.to_string()) ")"
            }
        },
        None => {
            let ui = state.read().await;
            match ui.student(id) {
                Some(student) => student_detail(student, None),
                None => html! {},
            }
        }
    })
}
