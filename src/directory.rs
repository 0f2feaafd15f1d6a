//! Filtering, sorting and pagination for the student directory.
//!
//! Everything here is pure - [`compute_view`] only looks at its arguments, so the same
//! collection and query always give the same page.

use crate::data::student::{Role, Student};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Name,
    StudentId,
    Email,
    Course,
    University,
    Age,
}

impl SortKey {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::StudentId,
        Self::Email,
        Self::Course,
        Self::University,
        Self::Age,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::StudentId => "studentId",
            Self::Email => "email",
            Self::Course => "course",
            Self::University => "university",
            Self::Age => "age",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::StudentId => "Student ID",
            Self::Email => "Email",
            Self::Course => "Course",
            Self::University => "University",
            Self::Age => "Age",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    pub fn allows(self, role: Role) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == role,
        }
    }
}

impl FromStr for RoleFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") || s.trim().is_empty() {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(role) => role.fmt(f),
        }
    }
}

impl Serialize for RoleFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RoleFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|()| serde::de::Error::custom(format!("unknown role filter {raw:?}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryQuery {
    pub search: String,
    pub role: RoleFilter,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    ///1-based, anything below 1 is read as 1
    pub page: usize,
}

impl Default for DirectoryQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            role: RoleFilter::All,
            sort_key: SortKey::Name,
            sort_direction: SortDirection::Asc,
            page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryView<'a> {
    pub page_items: Vec<&'a Student>,
    pub total_matches: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

impl DirectoryView<'_> {
    ///1-based index of the first item on this page, 0 when the page is empty.
    pub fn first_index(&self) -> usize {
        if self.page_items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    pub fn last_index(&self) -> usize {
        if self.page_items.is_empty() {
            0
        } else {
            self.first_index() + self.page_items.len() - 1
        }
    }
}

pub fn matches(student: &Student, query: &DirectoryQuery) -> bool {
    query.role.allows(student.role) && matches_search(student, &query.search)
}

fn matches_search(student: &Student, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }

    let needle = search.to_lowercase();
    let folded_contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    folded_contains(&student.first_name)
        || folded_contains(&student.last_name)
        || folded_contains(student.email.as_str())
        || student.course.as_deref().is_some_and(folded_contains)
        || student.university.as_deref().is_some_and(folded_contains)
        || student.company_name().is_some_and(folded_contains)
        || student.code.to_string().contains(search)
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Text(String),
    Number(u64),
}

fn sort_value(student: &Student, key: SortKey) -> SortValue {
    match key {
        SortKey::Name => {
            SortValue::Text(format!("{} {}", student.first_name, student.last_name).to_lowercase())
        }
        SortKey::StudentId => SortValue::Number(student.code.number()),
        SortKey::Email => SortValue::Text(student.email.as_str().to_lowercase()),
        SortKey::Course => {
            SortValue::Text(student.course.as_deref().unwrap_or_default().to_lowercase())
        }
        SortKey::University => {
            SortValue::Text(student.university.as_deref().unwrap_or_default().to_lowercase())
        }
        SortKey::Age => SortValue::Number(u64::from(student.age)),
    }
}

///Every matching student in display order, without pagination.
///
///The sort is stable, so students with equal keys keep their collection order in both directions.
pub fn filter_and_sort<'a>(students: &'a [Student], query: &DirectoryQuery) -> Vec<&'a Student> {
    let mut keyed: Vec<(SortValue, &Student)> = students
        .iter()
        .filter(|student| matches(student, query))
        .map(|student| (sort_value(student, query.sort_key), student))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.cmp(b);
        match query.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, student)| student).collect()
}

///Number of pages needed for `total_matches` items - never less than 1, so an empty directory
///still has a (blank) first page.
pub fn total_pages(total_matches: usize, page_size: usize) -> usize {
    total_matches.div_ceil(page_size.max(1)).max(1)
}

pub fn compute_view<'a>(
    students: &'a [Student],
    query: &DirectoryQuery,
    page_size: usize,
) -> DirectoryView<'a> {
    let page_size = page_size.max(1);
    let page = query.page.max(1);
    let filtered = filter_and_sort(students, query);
    let total_matches = filtered.len();

    let page_items = filtered
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();

    DirectoryView {
        page_items,
        total_matches,
        total_pages: total_pages(total_matches, page_size),
        page,
        page_size,
    }
}

///Page numbers to show in the pager: the first, the last and a window of one around the
///current page, with `None` marking a gap.
pub fn page_window(current: usize, total_pages: usize) -> Vec<Option<usize>> {
    let mut out = Vec::new();
    for page in 1..=total_pages {
        let shown = page == 1 || page == total_pages || current.abs_diff(page) <= 1;
        if shown {
            out.push(Some(page));
        } else if out.last().is_some_and(Option::is_some) {
            out.push(None);
        }
    }
    out
}
