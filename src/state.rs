use crate::{
    config::RuntimeConfiguration,
    data::{
        student::{Student, StudentId},
        validation::{StudentForm, ValidationErrors, validate_edit, validate_new},
    },
    error::{
        BuildClientSnafu, DeleteNotPendingSnafu, HubResult, MissingStudentSnafu,
        StillLoadingSnafu,
    },
    loader::{LoadOutcome, load, synthetic::synthesize},
    maud_conveniences::{render_nav, render_notice},
    routes::sse::SseEvent,
    state::ui::{Action, Confirmation, UiState, reduce},
};
use maud::{DOCTYPE, Markup, html};
use snafu::{OptionExt, ResultExt, ensure};
use std::sync::Arc;
use tokio::sync::{
    RwLock, RwLockReadGuard,
    broadcast::{Receiver, Sender, channel},
};

pub mod ui;

#[derive(Clone, Debug)]
pub struct HubState {
    config: RuntimeConfiguration,
    ui: Arc<RwLock<UiState>>,
    client: reqwest::Client,
    sse_events_sender: Sender<SseEvent>,
}

fn apply(ui: &mut UiState, action: Action) {
    let current = std::mem::take(ui);
    *ui = reduce(current, action);
}

fn fallback_students(count: usize) -> Vec<Student> {
    synthesize(count, &mut rand::rng())
}

impl HubState {
    pub fn new(config: RuntimeConfiguration) -> HubResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context(BuildClientSnafu)?;
        let (tx, _rx) = channel(16);

        Ok(Self {
            ui: Arc::new(RwLock::new(UiState::new(config.page_size()))),
            config,
            client,
            sse_events_sender: tx,
        })
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, UiState> {
        self.ui.read().await
    }

    pub async fn dispatch(&self, action: Action) {
        apply(&mut *self.ui.write().await, action);
    }

    ///Runs the one fetch. If it fails, sample data is put in place and the page shows a notice.
    pub async fn load_students(&self) {
        let source = self.config.source_config();

        let action = match load(&self.client, &source.url).await {
            LoadOutcome::Loaded(students) => Action::Loaded(students),
            LoadOutcome::Failed(e) => {
                let fallback = fallback_students(source.fallback_count);
                info!(count = fallback.len(), "Using sample students");
                Action::LoadFailed {
                    fallback,
                    reason: e.to_string(),
                }
            }
        };

        self.dispatch(action).await;
        self.send_sse_event(SseEvent::StudentsLoaded);
    }

    ///Validates and inserts under the same lock, so uniqueness is checked against what's actually there.
    pub async fn submit_new_student(
        &self,
        form: &StudentForm,
    ) -> HubResult<Result<Student, ValidationErrors>> {
        let today = jiff::Zoned::now().date();
        let mut ui = self.ui.write().await;
        ensure!(!ui.loading, StillLoadingSnafu);

        let student = match validate_new(form, &ui.students, today) {
            Ok(student) => student,
            Err(errors) => {
                info!(count = errors.len(), "Rejected new student");
                return Ok(Err(errors));
            }
        };

        apply(&mut ui, Action::Add(student.clone()));
        drop(ui);

        info!(id = student.id, "Added student");
        self.send_sse_event(SseEvent::CrudStudent);
        Ok(Ok(student))
    }

    pub async fn submit_edit(
        &self,
        id: StudentId,
        form: &StudentForm,
    ) -> HubResult<Result<Student, ValidationErrors>> {
        let today = jiff::Zoned::now().date();
        let mut ui = self.ui.write().await;
        ensure!(!ui.loading, StillLoadingSnafu);

        let existing = ui.student(id).context(MissingStudentSnafu { id })?;
        let (enrollment_date, image) = (existing.enrollment_date, existing.image.clone());

        let mut student = match validate_edit(form, &ui.students, id, today) {
            Ok(student) => student,
            Err(errors) => {
                info!(id, count = errors.len(), "Rejected student edit");
                return Ok(Err(errors));
            }
        };
        student.enrollment_date = enrollment_date;
        student.image = image;

        apply(&mut ui, Action::Edit(student.clone()));
        drop(ui);

        info!(id, "Edited student");
        self.send_sse_event(SseEvent::CrudStudent);
        Ok(Ok(student))
    }

    ///Marks a student as waiting for delete confirmation. Nothing is removed yet.
    pub async fn request_delete(&self, id: StudentId) -> HubResult<Student> {
        let mut ui = self.ui.write().await;
        let student = ui.student(id).context(MissingStudentSnafu { id })?.clone();
        apply(&mut ui, Action::RequestDelete(id));
        Ok(student)
    }

    ///Returns the removed student, or `None` if the delete was declined.
    ///
    ///Confirming fails unless `id` is the student currently waiting for confirmation.
    pub async fn resolve_delete(
        &self,
        id: StudentId,
        confirmation: Confirmation,
    ) -> HubResult<Option<Student>> {
        let mut ui = self.ui.write().await;
        let pending = ui
            .pending_delete_student()
            .filter(|student| student.id == id)
            .cloned();
        apply(&mut ui, Action::ResolveDelete { id, confirmation });
        drop(ui);

        match (confirmation, pending) {
            (Confirmation::Confirmed, Some(removed)) => {
                info!(id, "Deleted student");
                self.send_sse_event(SseEvent::CrudStudent);
                Ok(Some(removed))
            }
            (Confirmation::Confirmed, None) => {
                warn!(id, "Delete confirmed for a student that isn't pending");
                DeleteNotPendingSnafu { id }.fail()
            }
            (Confirmation::Declined, _) => Ok(None),
        }
    }

    pub async fn render(&self, markup: Markup) -> Markup {
        let (nav, notice) = {
            let ui = self.read().await;
            (
                render_nav(ui.active_tab, ui.students.len(), false),
                render_notice(ui.notice.as_ref(), false),
            )
        };

        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://unpkg.com/htmx-ext-sse@2.2.3" integrity="sha384-Y4gc0CK6Kg+hmulDc6rZPJu0tqvk7EWlih0Oh+2OkAi1ZDlCbBDCQEE2uVk472Ky" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "StudentHub" }
                }
                body hx-ext="sse" sse-connect="/sse_feed" class="bg-gray-900 min-h-screen flex flex-col items-center text-white" {
                    (nav)
                    (notice)
                    div id="main" class="w-full max-w-6xl p-4" hx-get="/internal/main" hx-trigger="sse:students_loaded" {
                        (markup)
                    }
                }
            }
        }
    }

    pub fn subscribe_to_sse_feed(&self) -> Receiver<SseEvent> {
        self.sse_events_sender.subscribe()
    }

    pub fn send_sse_event(&self, event: SseEvent) {
        let _ = self.sse_events_sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::student::Role;
    use rand::{SeedableRng, rngs::StdRng};

    fn test_state() -> HubState {
        let config = RuntimeConfiguration::from_vars(|_| Ok(None)).unwrap();
        HubState::new(config).unwrap()
    }

    async fn loaded_state(n: usize) -> HubState {
        let state = test_state();
        state
            .dispatch(Action::Loaded(synthesize(
                n,
                &mut StdRng::seed_from_u64(21),
            )))
            .await;
        state
    }

    fn form_for(first: &str, last: &str, email: &str, username: &str) -> StudentForm {
        StudentForm {
            first_name: first.into(),
            last_name: last.into(),
            username: username.into(),
            email: email.into(),
            phone: "(555) 123-4567".into(),
            age: "20".into(),
            gender: "female".into(),
            birth_date: format!("{}-03-14", jiff::Zoned::now().date().year() - 20),
            course: "Physics".into(),
            university: "State University".into(),
            street: "1 Main St".into(),
            ..StudentForm::default()
        }
    }

    #[tokio::test]
    async fn test_adds_are_rejected_while_loading() {
        let state = test_state();
        let form = form_for("Grace", "Hopper", "grace@navy.mil", "grace");
        assert!(matches!(
            state.submit_new_student(&form).await,
            Err(crate::error::HubError::StillLoading)
        ));
    }

    #[tokio::test]
    async fn test_add_then_duplicate_email() {
        let state = loaded_state(3).await;
        let mut rx = state.subscribe_to_sse_feed();

        let form = form_for("Grace", "Hopper", "Grace@Navy.mil", "grace");
        let added = state.submit_new_student(&form).await.unwrap().unwrap();
        assert_eq!(added.id, 4);
        assert_eq!(added.email.as_str(), "grace@navy.mil");
        assert_eq!(rx.recv().await.unwrap(), SseEvent::CrudStudent);

        let again = form_for("Grace", "Brewster", "grace@navy.mil", "gracie");
        let errors = state.submit_new_student(&again).await.unwrap().unwrap_err();
        assert!(errors.get_by_name("email").is_some());

        let ui = state.read().await;
        assert_eq!(ui.students.len(), 4);
        assert_eq!(ui.students[0].id, 4);
    }

    #[tokio::test]
    async fn test_edit_keeps_enrollment_date_and_image() {
        let state = loaded_state(3).await;
        let before = state.read().await.student(2).cloned().unwrap();

        let mut form = StudentForm::from_student(&before);
        form.first_name = "Edited".into();
        form.role = Role::Moderator.as_str().into();
        let edited = state.submit_edit(2, &form).await.unwrap().unwrap();

        assert_eq!(edited.first_name, "Edited");
        assert_eq!(edited.role, Role::Moderator);
        assert_eq!(edited.enrollment_date, before.enrollment_date);
        assert_eq!(edited.image, before.image);
        assert_eq!(state.read().await.student(2), Some(&edited));
    }

    #[tokio::test]
    async fn test_edit_missing_student() {
        let state = loaded_state(3).await;
        let form = form_for("Grace", "Hopper", "grace@navy.mil", "grace");
        assert!(matches!(
            state.submit_edit(40, &form).await,
            Err(crate::error::HubError::MissingStudent { id: 40 })
        ));
    }

    #[tokio::test]
    async fn test_delete_round_trip() {
        let state = loaded_state(3).await;

        assert!(matches!(
            state.resolve_delete(1, Confirmation::Confirmed).await,
            Err(crate::error::HubError::DeleteNotPending { id: 1 })
        ));

        state.request_delete(1).await.unwrap();
        assert_eq!(state.resolve_delete(1, Confirmation::Declined).await.unwrap(), None);
        assert_eq!(state.read().await.students.len(), 3);

        state.request_delete(1).await.unwrap();
        let removed = state
            .resolve_delete(1, Confirmation::Confirmed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(removed.id, 1);
        assert!(state.read().await.student(1).is_none());
    }

    #[tokio::test]
    async fn test_superseded_delete_confirmation_is_refused() {
        let state = loaded_state(3).await;

        state.request_delete(1).await.unwrap();
        state.request_delete(2).await.unwrap();

        assert!(matches!(
            state.resolve_delete(1, Confirmation::Confirmed).await,
            Err(crate::error::HubError::DeleteNotPending { id: 1 })
        ));
        {
            let ui = state.read().await;
            assert_eq!(ui.students.len(), 3);
            assert_eq!(ui.pending_delete, Some(2));
        }

        let removed = state
            .resolve_delete(2, Confirmation::Confirmed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(removed.id, 2);
        assert!(state.read().await.student(1).is_some());
    }
}
