use crate::{
    maud_conveniences::{render_nav, render_notice, spinner},
    routes::{
        add_student::add_student_page, all_students::directory_page,
        dashboard::dashboard_page,
    },
    state::{
        HubState,
        ui::{Action, Tab, UiState},
    },
};
use axum::{Form, extract::State};
use maud::{Markup, html};
use serde::Deserialize;

///What goes in `#main` for the current tab, or a spinner while the first load is still running.
fn main_fragment(ui: &UiState) -> Markup {
    if ui.loading {
        //polls as well, the sse event is missed if the feed connects after loading finishes
        return html! {
            div hx-get="/internal/main" hx-trigger="load delay:1s" hx-target="#main" {
                (spinner("Loading students..."))
            }
        };
    }

    match ui.active_tab {
        Tab::Dashboard => dashboard_page(ui),
        Tab::Directory => directory_page(ui),
        Tab::AddStudent => add_student_page(),
    }
}

pub async fn get_index_route(State(state): State<HubState>) -> Markup {
    let main = main_fragment(&*state.read().await);
    state.render(main).await
}

///Re-rendered when loading finishes, along with the nav and notice.
pub async fn internal_get_main(State(state): State<HubState>) -> Markup {
    let ui = state.read().await;

    html! {
        (main_fragment(&ui))
        (render_nav(ui.active_tab, ui.students.len(), true))
        (render_notice(ui.notice.as_ref(), true))
    }
}

pub async fn internal_get_nav(State(state): State<HubState>) -> Markup {
    let ui = state.read().await;
    render_nav(ui.active_tab, ui.students.len(), false)
}

#[derive(Deserialize)]
pub struct TabForm {
    tab: Tab,
}

pub async fn internal_post_tab(
    State(state): State<HubState>,
    Form(TabForm { tab }): Form<TabForm>,
) -> Markup {
    state.dispatch(Action::SelectTab(tab)).await;
    let ui = state.read().await;

    html! {
        (main_fragment(&ui))
        (render_nav(ui.active_tab, ui.students.len(), true))
    }
}

pub async fn internal_post_dismiss_notice(State(state): State<HubState>) -> Markup {
    state.dispatch(Action::DismissNotice).await;
    render_notice(None, false)
}
