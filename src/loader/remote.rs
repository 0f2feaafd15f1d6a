use crate::data::{
    COURSES,
    student::{
        Address, Bank, Company, EnrollmentStatus, Gender, PhysicalTraits, Role, Student,
        StudentCode, StudentId, parse_loose_date,
    },
};
use email_address::EmailAddress;
use serde::Deserialize;
use std::str::FromStr;

///The body the upstream source returns - a list of users under `users`.
#[derive(Deserialize, Debug)]
pub struct RemoteUserList {
    pub users: Vec<RemoteUser>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteUser {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub maiden_name: Option<String>,
    pub age: u32,
    pub gender: Option<String>,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub birth_date: Option<String>,
    pub image: Option<String>,
    pub blood_group: Option<String>,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub eye_color: Option<String>,
    pub hair: Option<RemoteHair>,
    pub address: Option<RemoteAddress>,
    pub university: Option<String>,
    pub bank: Option<RemoteBank>,
    pub company: Option<RemoteCompany>,
    pub role: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RemoteHair {
    pub color: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteAddress {
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteBank {
    pub card_number: String,
    pub card_type: String,
    pub card_expire: String,
    pub currency: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RemoteCompany {
    pub name: String,
    pub department: String,
    pub title: String,
}

///The source has no course, so one is picked from the course list by id. The same id always gets
///the same course.
#[allow(clippy::cast_possible_truncation)]
pub fn course_for(id: StudentId) -> &'static str {
    COURSES[(id % COURSES.len() as u64) as usize]
}

impl RemoteUser {
    ///`None` when the email doesn't parse - a record we can't address isn't shown.
    pub fn into_student(self) -> Option<Student> {
        let Ok(email) = EmailAddress::from_str(self.email.trim()) else {
            warn!(id = self.id, email = ?self.email, "Skipping remote user with invalid email");
            return None;
        };

        let gender = self
            .gender
            .as_deref()
            .and_then(|g| Gender::from_str(g).ok())
            .unwrap_or(Gender::Other);
        let role = self
            .role
            .as_deref()
            .and_then(|r| Role::from_str(r).ok())
            .unwrap_or_default();

        let hair = self.hair.unwrap_or_default();
        let physical = PhysicalTraits {
            height: self.height,
            weight: self.weight,
            blood_group: self.blood_group.unwrap_or_default(),
            eye_color: self.eye_color.unwrap_or_default(),
            hair_color: hair.color,
            hair_type: hair.kind,
        };

        Some(Student {
            id: self.id,
            code: StudentCode::from_id(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            maiden_name: self.maiden_name.filter(|m| !m.trim().is_empty()),
            username: self.username,
            email,
            phone: self.phone,
            age: self.age,
            gender,
            birth_date: self.birth_date.as_deref().and_then(parse_loose_date),
            image: self.image.filter(|i| !i.trim().is_empty()),
            course: Some(course_for(self.id).to_string()),
            university: self.university.filter(|u| !u.trim().is_empty()),
            status: EnrollmentStatus::Active,
            role,
            gpa: None,
            enrollment_date: None,
            address: self.address.map(|a| Address {
                street: a.address,
                city: a.city,
                state: a.state,
                postal_code: a.postal_code,
                country: a.country,
            }),
            company: self.company.map(|c| Company {
                name: c.name,
                department: c.department,
                title: c.title,
            }),
            bank: self.bank.map(|b| Bank {
                card_number: b.card_number,
                card_type: b.card_type,
                expiry: b.card_expire,
                currency: b.currency,
            }),
            physical: (physical != PhysicalTraits::default()).then_some(physical),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::Date;

    const SAMPLE: &str = r#"{
        "users": [
            {
                "id": 1,
                "firstName": "Emily",
                "lastName": "Johnson",
                "maidenName": "Smith",
                "age": 28,
                "gender": "female",
                "email": "emily.johnson@x.dummyjson.com",
                "phone": "+81 965-431-3024",
                "username": "emilys",
                "password": "emilyspass",
                "birthDate": "1996-5-30",
                "image": "https://dummyjson.com/icon/emilys/128",
                "bloodGroup": "O-",
                "height": 193.24,
                "weight": 63.16,
                "eyeColor": "Green",
                "hair": { "color": "Brown", "type": "Curly" },
                "ip": "42.48.100.32",
                "address": {
                    "address": "626 Main Street",
                    "city": "Phoenix",
                    "state": "Mississippi",
                    "stateCode": "MS",
                    "postalCode": "29112",
                    "coordinates": { "lat": -77.16213, "lng": -92.084824 },
                    "country": "United States"
                },
                "university": "University of Wisconsin--Madison",
                "bank": {
                    "cardExpire": "03/26",
                    "cardNumber": "9289760655481815",
                    "cardType": "Elo",
                    "currency": "CNY",
                    "iban": "YPUXISOBI7TTHPK2BR3HAIXL"
                },
                "company": {
                    "department": "Engineering",
                    "name": "Dooley, Kozey and Cronin",
                    "title": "Sales Manager"
                },
                "role": "admin"
            },
            {
                "id": 2,
                "firstName": "Michael",
                "lastName": "Williams",
                "age": 35,
                "email": "michael.williams@x.dummyjson.com",
                "phone": "+49 258-627-6644",
                "username": "michaelw",
                "role": "user"
            }
        ],
        "total": 208,
        "skip": 0,
        "limit": 30
    }"#;

    #[test]
    fn test_maps_full_record() {
        let list: RemoteUserList = serde_json::from_str(SAMPLE).unwrap();
        let mut students = list.users.into_iter().filter_map(RemoteUser::into_student);

        let emily = students.next().unwrap();
        assert_eq!(emily.code.to_string(), "STU000001");
        assert_eq!(emily.full_name(), "Emily Johnson");
        assert_eq!(emily.maiden_name.as_deref(), Some("Smith"));
        assert_eq!(emily.gender, Gender::Female);
        assert_eq!(emily.role, Role::Admin);
        assert_eq!(emily.birth_date, Some(Date::new(1996, 5, 30).unwrap()));
        assert_eq!(emily.course.as_deref(), Some(course_for(1)));
        assert_eq!(emily.address.as_ref().unwrap().street, "626 Main Street");
        assert_eq!(emily.company_name(), Some("Dooley, Kozey and Cronin"));
        assert_eq!(emily.bank.as_ref().unwrap().expiry, "03/26");
        let physical = emily.physical.unwrap();
        assert_eq!(physical.hair_type, "Curly");
        assert_eq!(physical.blood_group, "O-");

        let michael = students.next().unwrap();
        assert_eq!(michael.role, Role::Student);
        assert_eq!(michael.gender, Gender::Other);
        assert!(michael.address.is_none());
        assert!(michael.physical.is_none());
        assert!(students.next().is_none());
    }

    #[test]
    fn test_invalid_email_is_skipped() {
        let user = RemoteUser {
            id: 3,
            email: "not-an-email".into(),
            ..RemoteUser::default()
        };
        assert!(user.into_student().is_none());
    }

    #[test]
    fn test_course_is_stable_per_id() {
        assert_eq!(course_for(5), course_for(5));
        assert_eq!(course_for(0), COURSES[0]);
        assert_eq!(course_for(COURSES.len() as u64 + 1), COURSES[1]);
    }
}
