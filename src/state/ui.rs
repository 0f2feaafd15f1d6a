use crate::{
    config::DEFAULT_PAGE_SIZE,
    data::student::{Student, StudentId},
    directory::{DirectoryQuery, filter_and_sort, total_pages},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Dashboard,
    Directory,
    AddStudent,
}

impl Tab {
    pub const ALL: [Self; 3] = [Self::Dashboard, Self::Directory, Self::AddStudent];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Directory => "directory",
            Self::AddStudent => "add_student",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Directory => "All Students",
            Self::AddStudent => "Add Student",
        }
    }
}

impl FromStr for Tab {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|tab| tab.as_str() == s).ok_or(())
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///Non-blocking messages shown above the main area until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ///The source couldn't be reached so the collection is synthetic.
    SampleData { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone)]
pub enum Action {
    Loaded(Vec<Student>),
    LoadFailed {
        fallback: Vec<Student>,
        reason: String,
    },
    SelectTab(Tab),
    UpdateQuery(DirectoryQuery),
    GoToPage(usize),
    Add(Student),
    Edit(Student),
    RequestDelete(StudentId),
    ///Only acts when `id` is the student waiting for confirmation.
    ResolveDelete {
        id: StudentId,
        confirmation: Confirmation,
    },
    DismissNotice,
}

///Everything the page shows. Only ever changed through [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    ///Newest additions first.
    pub students: Vec<Student>,
    pub active_tab: Tab,
    pub loading: bool,
    pub notice: Option<Notice>,
    pub query: DirectoryQuery,
    pub pending_delete: Option<StudentId>,
    pub page_size: usize,
}

impl UiState {
    pub fn new(page_size: usize) -> Self {
        Self {
            students: vec![],
            active_tab: Tab::default(),
            loading: true,
            notice: None,
            query: DirectoryQuery::default(),
            pending_delete: None,
            page_size: page_size.max(1),
        }
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn pending_delete_student(&self) -> Option<&Student> {
        self.pending_delete.and_then(|id| self.student(id))
    }

    fn total_pages(&self) -> usize {
        total_pages(
            filter_and_sort(&self.students, &self.query).len(),
            self.page_size,
        )
    }

    fn clamp_page(&mut self) {
        self.query.page = self.query.page.clamp(1, self.total_pages());
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

pub fn reduce(mut state: UiState, action: Action) -> UiState {
    match action {
        Action::Loaded(students) => {
            state.students = students;
            state.loading = false;
            state.notice = None;
            state.clamp_page();
        }
        Action::LoadFailed { fallback, reason } => {
            state.students = fallback;
            state.loading = false;
            state.notice = Some(Notice::SampleData { reason });
            state.clamp_page();
        }
        Action::SelectTab(tab) => {
            state.active_tab = tab;
            state.pending_delete = None;
        }
        Action::UpdateQuery(mut query) => {
            if query.search != state.query.search || query.role != state.query.role {
                query.page = 1;
            }
            state.query = query;
            state.clamp_page();
        }
        Action::GoToPage(page) => {
            state.query.page = page;
            state.clamp_page();
        }
        Action::Add(student) => {
            state.students.insert(0, student);
            state.notice = None;
        }
        Action::Edit(student) => {
            if let Some(slot) = state.students.iter_mut().find(|s| s.id == student.id) {
                *slot = student;
                state.clamp_page();
            }
        }
        Action::RequestDelete(id) => {
            if state.student(id).is_some() {
                state.pending_delete = Some(id);
            }
        }
        Action::ResolveDelete { id, confirmation } => {
            if state.pending_delete == Some(id) {
                state.pending_delete = None;
                if confirmation == Confirmation::Confirmed {
                    state.students.retain(|s| s.id != id);
                    state.clamp_page();
                }
            }
        }
        Action::DismissNotice => state.notice = None,
    }

    state
}
