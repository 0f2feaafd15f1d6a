use crate::error::{HubError, InvalidStudentCodeSnafu};
use email_address::EmailAddress;
use jiff::civil::Date;
use maud::Render;
use serde::{Deserialize, Serialize};
use snafu::OptionExt;
use std::{fmt, str::FromStr};

pub type StudentId = u64;

///The display code shown for each student, `STU` followed by the id padded to 6 digits.
///
///It is always derived from the id, so [`StudentCode::number`] gives the id back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentCode(StudentId);

impl StudentCode {
    pub const PREFIX: &'static str = "STU";

    pub const fn from_id(id: StudentId) -> Self {
        Self(id)
    }

    pub const fn number(self) -> StudentId {
        self.0
    }
}

impl fmt::Display for StudentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:06}", Self::PREFIX, self.0)
    }
}

impl FromStr for StudentCode {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(Self::PREFIX)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(Self)
            .context(InvalidStudentCodeSnafu { original: s })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[serde(alias = "user")]
    Student,
    Admin,
    Moderator,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Student, Self::Admin, Self::Moderator];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
            Self::Moderator => "moderator",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" | "user" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
    Suspended,
    #[serde(rename = "On Leave")]
    OnLeave,
}

impl EnrollmentStatus {
    pub const ALL: [Self; 5] = [
        Self::Active,
        Self::Inactive,
        Self::Graduated,
        Self::Suspended,
        Self::OnLeave,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Graduated => "Graduated",
            Self::Suspended => "Suspended",
            Self::OnLeave => "On Leave",
        }
    }
}

impl FromStr for EnrollmentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    ///Comma-separated non-empty parts, street first.
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Company {
    pub name: String,
    pub department: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bank {
    pub card_number: String,
    pub card_type: String,
    pub expiry: String,
    pub currency: String,
}

impl Bank {
    pub fn masked_card_number(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if digits.len() <= 4 {
            return digits.into_iter().collect();
        }

        let last_four: String = digits[digits.len() - 4..].iter().collect();
        format!("**** **** **** {last_four}")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhysicalTraits {
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub blood_group: String,
    pub eye_color: String,
    pub hair_color: String,
    pub hair_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: StudentId,
    pub code: StudentCode,
    pub first_name: String,
    pub last_name: String,
    pub maiden_name: Option<String>,
    pub username: String,
    pub email: EmailAddress,
    pub phone: String,
    pub age: u32,
    pub gender: Gender,
    pub birth_date: Option<Date>,
    pub image: Option<String>,
    pub course: Option<String>,
    pub university: Option<String>,
    pub status: EnrollmentStatus,
    pub role: Role,
    pub gpa: Option<f32>,
    pub enrollment_date: Option<Date>,
    pub address: Option<Address>,
    pub company: Option<Company>,
    pub bank: Option<Bank>,
    pub physical: Option<PhysicalTraits>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company.as_ref().map(|company| company.name.as_str())
    }

    pub fn avatar_url(&self) -> String {
        self.image
            .clone()
            .unwrap_or_else(|| generated_avatar_url(&self.full_name()))
    }
}

const GENERATED_AVATAR_BASE: &str = "https://ui-avatars.com/api/";

fn generated_avatar_url(name: &str) -> String {
    reqwest::Url::parse_with_params(
        GENERATED_AVATAR_BASE,
        [("name", name), ("background", "random"), ("size", "200")],
    )
    .map(String::from)
    .unwrap_or_default()
}

impl Render for Student {
    fn render_to(&self, buffer: &mut String) {
        self.full_name().render_to(buffer);
    }
}

///Parses `YYYY-M-D` dates, which is what the upstream source sends (no zero padding).
pub fn parse_loose_date(raw: &str) -> Option<Date> {
    let mut parts = raw.trim().splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    Date::new(year, month, day).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_code_display_and_round_trip() {
        let code = StudentCode::from_id(42);
        assert_eq!(code.to_string(), "STU000042");

        let parsed: StudentCode = "STU000042".parse().unwrap();
        assert_eq!(parsed.number(), 42);

        for id in [1, 30, 999_999, 1_234_567] {
            let code = StudentCode::from_id(id);
            assert_eq!(code.to_string().parse::<StudentCode>().unwrap().number(), id);
        }
    }

    #[test]
    fn test_student_code_rejects_garbage() {
        assert!("000042".parse::<StudentCode>().is_err());
        assert!("STU".parse::<StudentCode>().is_err());
        assert!("STU12a".parse::<StudentCode>().is_err());
        assert!("stu000001".parse::<StudentCode>().is_err());
    }

    #[test]
    fn test_role_parsing_maps_user_to_student() {
        assert_eq!("user".parse::<Role>(), Ok(Role::Student));
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert!("teacher".parse::<Role>().is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "on leave".parse::<EnrollmentStatus>(),
            Ok(EnrollmentStatus::OnLeave)
        );
        assert_eq!(EnrollmentStatus::OnLeave.to_string(), "On Leave");
        assert!("expelled".parse::<EnrollmentStatus>().is_err());
    }

    #[test]
    fn test_loose_dates() {
        assert_eq!(
            parse_loose_date("1996-5-30"),
            Some(Date::new(1996, 5, 30).unwrap())
        );
        assert_eq!(
            parse_loose_date("2001-12-03"),
            Some(Date::new(2001, 12, 3).unwrap())
        );
        assert_eq!(parse_loose_date("2001-2-30"), None);
        assert_eq!(parse_loose_date("yesterday"), None);
    }

    #[test]
    fn test_generated_avatar_url_encodes_names() {
        assert_eq!(
            generated_avatar_url("Ada Lovelace"),
            "https://ui-avatars.com/api/?name=Ada+Lovelace&background=random&size=200"
        );
        assert_eq!(
            generated_avatar_url("Mary Ann O'Neil & Co"),
            "https://ui-avatars.com/api/?name=Mary+Ann+O%27Neil+%26+Co&background=random&size=200"
        );
    }

    #[test]
    fn test_address_and_card_formatting() {
        let address = Address {
            street: "1 Main St".into(),
            city: "Springfield".into(),
            state: String::new(),
            postal_code: "12345".into(),
            country: " ".into(),
        };
        assert_eq!(address.one_line(), "1 Main St, Springfield, 12345");

        let bank = Bank {
            card_number: "1234 5678 9012 3456".into(),
            ..Bank::default()
        };
        assert_eq!(bank.masked_card_number(), "**** **** **** 3456");
    }
}
