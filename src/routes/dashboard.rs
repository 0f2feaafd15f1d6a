use crate::{
    dashboard::{DashboardStats, recent_students},
    data::student::EnrollmentStatus,
    maud_conveniences::{stat_card, subtitle, title},
    state::ui::UiState,
};
use maud::{Markup, html};

pub fn dashboard_page(ui: &UiState) -> Markup {
    let stats = DashboardStats::from_students(&ui.students);
    let recent = recent_students(&ui.students);

    html! {
        (title("Dashboard"))
        div class="grid grid-cols-2 md:grid-cols-4 gap-4 mb-6" {
            (stat_card("Total Students", stats.total))
            @for status in EnrollmentStatus::ALL {
                (stat_card(status.as_str(), stats.with_status(status)))
            }
            (stat_card("Courses", stats.distinct_courses))
            (stat_card(
                "Average Age",
                stats.average_age.map_or_else(|| "-".to_string(), |age| format!("{age:.1}")),
            ))
            @if let Some(gpa) = stats.average_gpa {
                (stat_card("Average GPA", format!("{gpa:.2}")))
            }
        }

        div class="grid grid-cols-1 md:grid-cols-2 gap-4" {
            div class="bg-gray-800 rounded-md p-4 shadow-md" {
                (subtitle("By Role"))
                ul {
                    @for (role, count) in &stats.by_role {
                        li class="flex flex-row justify-between py-1 border-b border-gray-700" {
                            span class="text-gray-300 capitalize" {(role.as_str())}
                            span class="text-gray-100 font-semibold" {(count)}
                        }
                    }
                }
            }
            div class="bg-gray-800 rounded-md p-4 shadow-md" {
                (subtitle("Recently Added"))
                @if recent.is_empty() {
                    p class="text-gray-400" {"No students yet."}
                } @else {
                    ul {
                        @for student in recent {
                            li class="flex flex-row items-center space-x-3 py-1 border-b border-gray-700" {
                                img src=(student.avatar_url()) alt=(student.full_name()) class="w-8 h-8 rounded-full";
                                span class="text-gray-200" {(student)}
                                span class="text-xs text-gray-400" {(student.code.to_string())}
                            }
                        }
                    }
                }
            }
        }
    }
}
