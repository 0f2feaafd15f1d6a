use crate::{
    data::student::{Role, Student},
    directory::{
        DirectoryQuery, DirectoryView, RoleFilter, SortDirection, SortKey, compute_view,
        page_window,
    },
    maud_conveniences::{INPUT_CLASSES, title},
    state::{
        HubState,
        ui::{Action, UiState},
    },
};
use axum::{
    Form,
    extract::{Query, State},
};
use maud::{Markup, html};
use serde::Deserialize;

///Only the controls that were actually sent are changed; the rest of the query stays as it was.
#[derive(Deserialize, Debug, Default)]
pub struct DirectoryParams {
    search: Option<String>,
    role: Option<RoleFilter>,
    sort_key: Option<SortKey>,
    sort_direction: Option<SortDirection>,
}

impl DirectoryParams {
    fn apply_to(self, mut query: DirectoryQuery) -> DirectoryQuery {
        if let Some(search) = self.search {
            query.search = search;
        }
        if let Some(role) = self.role {
            query.role = role;
        }
        if let Some(sort_key) = self.sort_key {
            query.sort_key = sort_key;
        }
        if let Some(sort_direction) = self.sort_direction {
            query.sort_direction = sort_direction;
        }
        query
    }
}

#[derive(Deserialize)]
pub struct PageForm {
    page: usize,
}

fn student_card(student: &Student) -> Markup {
    html! {
        button hx-get={"/internal/students/" (student.id)} hx-target="#in_focus" class="text-left bg-gray-800 hover:bg-gray-700 rounded-md p-4 shadow-md flex flex-row items-center space-x-4" {
            img src=(student.avatar_url()) alt=(student.full_name()) class="w-12 h-12 rounded-full";
            div class="flex flex-col overflow-hidden" {
                span class="font-semibold truncate" {(student)}
                span class="text-xs text-gray-400" {(student.code.to_string())}
                span class="text-sm text-gray-300 truncate" {(student.email.as_str())}
                @if let Some(course) = &student.course {
                    span class="text-sm text-gray-400 truncate" {(course)}
                }
                span class="text-xs text-gray-500" {(student.role.as_str()) " · " (student.status.as_str())}
            }
        }
    }
}

fn page_button(page: usize, label: &str, enabled: bool, current: bool) -> Markup {
    let classes = if current {
        "bg-blue-600 font-bold py-1 px-3 rounded"
    } else if enabled {
        "bg-slate-600 hover:bg-slate-800 py-1 px-3 rounded"
    } else {
        "bg-slate-700 text-gray-500 py-1 px-3 rounded cursor-not-allowed"
    };

    html! {
        button disabled[!enabled] hx-post="/internal/directory/page" hx-vals={"{\"page\": " (page) "}"} hx-target="#directory_results" class=(classes) {
            (label)
        }
    }
}

fn pager(view: &DirectoryView<'_>) -> Markup {
    let (page, total) = (view.page, view.total_pages);

    html! {
        @if total > 1 {
            div class="flex flex-row flex-wrap items-center justify-center gap-2 mt-4" {
                (page_button(1, "First", page > 1, false))
                (page_button(page.saturating_sub(1).max(1), "Prev", page > 1, false))
                @for entry in page_window(page, total) {
                    @match entry {
                        Some(n) => {
                            (page_button(n, &n.to_string(), n != page, n == page))
                        }
                        None => {
                            span class="px-2 text-gray-500" {"…"}
                        }
                    }
                }
                (page_button((page + 1).min(total), "Next", page < total, false))
                (page_button(total, "Last", page < total, false))
            }
        }
    }
}

fn matching_description(query: &DirectoryQuery) -> String {
    let mut parts = vec![];
    if !query.search.is_empty() {
        parts.push(format!("\"{}\"", query.search));
    }
    if let RoleFilter::Only(role) = query.role {
        parts.push(format!("role {role}"));
    }
    parts.join(" and ")
}

///The result grid for the current query: summary line, cards and pager.
pub fn directory_results(ui: &UiState) -> Markup {
    let view = compute_view(&ui.students, &ui.query, ui.page_size);
    let matching = matching_description(&ui.query);

    html! {
        p class="text-gray-400 mb-2" {
            "Found " (view.total_matches) " students"
            @if !matching.is_empty() {
                " matching " (matching)
            }
            @if view.total_matches > 0 {
                " - showing " (view.first_index()) "-" (view.last_index())
            }
        }

        @if view.page_items.is_empty() {
            div class="bg-gray-800 rounded-md p-8 text-center text-gray-400" {
                @if ui.students.is_empty() {
                    "There are no students yet."
                } @else {
                    "No students match your search. Try a different name or clear the filters."
                }
            }
        } @else {
            div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4" {
                @for student in &view.page_items {
                    (student_card(student))
                }
            }
        }

        (pager(&view))
    }
}

///The whole directory tab - controls, results and the focus panel.
pub fn directory_page(ui: &UiState) -> Markup {
    let query = &ui.query;

    html! {
        (title("All Students"))
        div class="flex flex-col lg:flex-row gap-4" {
            div class="flex-1" {
                form hx-get="/internal/directory/results" hx-trigger="input changed delay:300ms from:input[name=search], change, submit" hx-target="#directory_results" class="grid grid-cols-1 md:grid-cols-4 gap-2 mb-4" {
                    input type="search" name="search" value=(query.search) placeholder="Search by name, email, course, university, company or ID..." class={(INPUT_CLASSES) " md:col-span-4"};
                    select name="role" class=(INPUT_CLASSES) {
                        option value="all" selected[query.role == RoleFilter::All] {"All Roles"}
                        @for role in Role::ALL {
                            option value=(role.as_str()) selected[query.role == RoleFilter::Only(role)] {(role.as_str())}
                        }
                    }
                    select name="sort_key" class=(INPUT_CLASSES) {
                        @for key in SortKey::ALL {
                            option value=(key.as_str()) selected[query.sort_key == key] {"Sort by " (key.label())}
                        }
                    }
                    select name="sort_direction" class=(INPUT_CLASSES) {
                        @for (direction, label) in [(SortDirection::Asc, "Ascending"), (SortDirection::Desc, "Descending")] {
                            option value=(direction.as_str()) selected[query.sort_direction == direction] {(label)}
                        }
                    }
                    a href="/students/export.csv" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded text-center" {"Export CSV"}
                }
                div id="directory_results" hx-get="/internal/directory/results" hx-trigger="sse:crud_student" {
                    (directory_results(ui))
                }
            }
            div id="in_focus" class="lg:w-96" {}
        }
    }
}

pub async fn internal_get_directory_results(
    State(state): State<HubState>,
    Query(params): Query<DirectoryParams>,
) -> Markup {
    let query = params.apply_to(state.read().await.query.clone());
    state.dispatch(Action::UpdateQuery(query)).await;

    directory_results(&*state.read().await)
}

pub async fn internal_post_directory_page(
    State(state): State<HubState>,
    Form(PageForm { page }): Form<PageForm>,
) -> Markup {
    state.dispatch(Action::GoToPage(page)).await;

    directory_results(&*state.read().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_only_touch_what_was_sent() {
        let query = DirectoryQuery {
            search: "doe".into(),
            sort_key: SortKey::Age,
            page: 3,
            ..DirectoryQuery::default()
        };
        let params = DirectoryParams {
            sort_direction: Some(SortDirection::Desc),
            ..DirectoryParams::default()
        };

        let updated = params.apply_to(query.clone());
        assert_eq!(updated.search, "doe");
        assert_eq!(updated.sort_key, SortKey::Age);
        assert_eq!(updated.sort_direction, SortDirection::Desc);
        assert_eq!(updated.page, 3);
    }

    #[test]
    fn test_matching_description() {
        assert_eq!(matching_description(&DirectoryQuery::default()), "");
        let query = DirectoryQuery {
            search: "ann".into(),
            role: RoleFilter::Only(Role::Admin),
            ..DirectoryQuery::default()
        };
        assert_eq!(matching_description(&query), "\"ann\" and role admin");
    }
}
