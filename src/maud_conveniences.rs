use crate::state::ui::{Notice, Tab};
use email_address::EmailAddress;
use maud::{Markup, Render, html};

pub const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        h2 class="text-xl font-semibold mb-2 text-gray-200" {(s)}
    }
}

pub fn field_error(error: Option<&str>) -> Markup {
    html! {
        @if let Some(error) = error {
            p class="text-red-400 text-xs italic mt-1" {(error)}
        }
    }
}

pub fn form_element(id: &str, label: &str, element: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (element)
        }
    }
}

pub fn simple_form_element(
    id: &str,
    label: &str,
    required: bool,
    input_type: Option<&str>,
    value: &str,
    error: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input required[required] type=(input_type.unwrap_or("text")) id=(id) name=(id) value=(value) class=(INPUT_CLASSES);
            (field_error(error))
        },
    )
}

///`options` are `(value, label)` pairs.
pub fn select_form_element<'a>(
    id: &str,
    label: &str,
    options: impl IntoIterator<Item = (&'a str, &'a str)>,
    selected: &str,
    error: Option<&str>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            select id=(id) name=(id) class=(INPUT_CLASSES) {
                @for (value, option_label) in options {
                    option value=(value) selected[value.eq_ignore_ascii_case(selected)] {(option_label)}
                }
            }
            (field_error(error))
        },
    )
}

pub fn form_submit_button(label: &str) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (label)
            }
        }
    }
}

pub fn spinner(message: &str) -> Markup {
    html! {
        div class="flex flex-col items-center justify-center py-16 space-y-4" {
            div class="animate-spin rounded-full h-12 w-12 border-b-2 border-blue-400" {}
            p class="text-gray-400" {(message)}
        }
    }
}

pub fn stat_card(label: &str, value: impl Render) -> Markup {
    html! {
        div class="bg-gray-800 rounded-md p-4 shadow-md" {
            p class="text-sm text-gray-400" {(label)}
            p class="text-2xl font-bold text-gray-100" {(value)}
        }
    }
}

///With `oob` set, htmx swaps this in place of the existing nav whatever the request's target was.
pub fn render_nav(active_tab: Tab, student_count: usize, oob: bool) -> Markup {
    html! {
        nav id="nav" hx-swap-oob=[oob.then_some("true")] hx-get="/internal/nav" hx-trigger="sse:crud_student" hx-swap="outerHTML" class="w-full bg-gray-800 p-4 mb-4 flex flex-row items-center justify-between" {
            span class="text-xl font-bold" {"StudentHub"}
            div class="flex flex-row space-x-4" {
                @for tab in Tab::ALL {
                    @let classes = if tab == active_tab {
                        "bg-blue-600 font-bold py-2 px-4 rounded"
                    } else {
                        "bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded"
                    };
                    button hx-post="/internal/tab" hx-vals={"{\"tab\": \"" (tab.as_str()) "\"}"} hx-target="#main" class=(classes) {
                        (tab.label())
                    }
                }
            }
            span class="text-gray-400" {(student_count) " students"}
        }
    }
}

pub fn render_notice(notice: Option<&Notice>, oob: bool) -> Markup {
    html! {
        div id="notice" hx-swap-oob=[oob.then_some("true")] class="w-full max-w-6xl px-4" {
            @if let Some(Notice::SampleData { reason }) = notice {
                div class="bg-yellow-100 border border-yellow-400 text-yellow-800 px-4 py-3 rounded relative mb-4 flex flex-row justify-between" role="status" title=(reason) {
                    span {
                        strong class="font-bold" {"Demo Mode - using sample data"}
                        " (the student source couldn't be reached)"
                    }
                    button hx-post="/internal/notice/dismiss" hx-target="#notice" hx-swap="outerHTML" class="font-bold px-2" {"×"}
                }
            }
        }
    }
}

pub struct Email<'a>(pub &'a EmailAddress);

impl Render for Email<'_> {
    fn render_to(&self, buffer: &mut String) {
        html! {
            a href=(self.0.to_uri()) class="text-blue-400 hover:underline" {(self.0.as_str())}
        }
        .render_to(buffer);
    }
}
