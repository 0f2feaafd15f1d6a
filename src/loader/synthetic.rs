use crate::data::{
    COURSES,
    student::{Address, EnrollmentStatus, Gender, Role, Student, StudentCode, StudentId},
};
use email_address::EmailAddress;
use jiff::civil::Date;
use rand::{Rng, seq::IndexedRandom};
use std::str::FromStr;

const FIRST_NAMES: [&str; 20] = [
    "Alex", "Sam", "Jordan", "Taylor", "Casey", "Morgan", "Riley", "Avery", "Blake", "Cameron",
    "Jamie", "Quinn", "Drew", "Harper", "Rowan", "Skyler", "Emerson", "Reese", "Parker", "Sage",
];
const LAST_NAMES: [&str; 15] = [
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
    "Wilson",
    "Anderson",
    "Thomas",
    "Moore",
    "Clark",
];
const UNIVERSITIES: [&str; 6] = [
    "State University",
    "Riverside College",
    "Northbridge Institute of Technology",
    "Lakeshore University",
    "Central Polytechnic",
    "Westfield College",
];
const CITIES: [&str; 6] = [
    "Anytown",
    "Springfield",
    "Fairview",
    "Greenville",
    "Madison",
    "Georgetown",
];

pub const MIN_SYNTHETIC_AGE: u32 = 18;
pub const MAX_SYNTHETIC_AGE: u32 = 32;

///`(AAA) EEE-NNNN`
pub fn phone_number(rng: &mut impl Rng) -> String {
    format!(
        "({}) {}-{}",
        rng.random_range(100..=999),
        rng.random_range(100..=999),
        rng.random_range(1000..=9999)
    )
}

fn pick<'a>(options: &[&'a str], rng: &mut impl Rng) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

///A birth date `age` years before `today`, with a random month and a day that exists in every month.
fn birth_date_for(age: u32, today: Date, rng: &mut impl Rng) -> Option<Date> {
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    let year = today.year() - age as i16;
    Date::new(year, rng.random_range(1..=12), rng.random_range(1..=28)).ok()
}

fn synthetic_student(id: StudentId, today: Date, rng: &mut impl Rng) -> Option<Student> {
    let first_name = pick(&FIRST_NAMES, rng);
    let last_name = pick(&LAST_NAMES, rng);
    let age = rng.random_range(MIN_SYNTHETIC_AGE..=MAX_SYNTHETIC_AGE);

    //id in the local part keeps emails and usernames unique
    let email = EmailAddress::from_str(&format!(
        "{}.{}{id}@email.com",
        first_name.to_lowercase(),
        last_name.to_lowercase()
    ))
    .ok()?;
    let gpa = f32::from(rng.random_range(200..=400_u16)) / 100.0;

    Some(Student {
        id,
        code: StudentCode::from_id(id),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        maiden_name: None,
        username: format!("{}{id}", first_name.to_lowercase()),
        email,
        phone: phone_number(rng),
        age,
        gender: *Gender::ALL.choose(rng).unwrap_or(&Gender::Other),
        birth_date: birth_date_for(age, today, rng),
        image: None,
        course: Some(pick(&COURSES, rng).to_string()),
        university: Some(pick(&UNIVERSITIES, rng).to_string()),
        status: *EnrollmentStatus::ALL.choose(rng).unwrap_or(&EnrollmentStatus::Active),
        role: *Role::ALL.choose(rng).unwrap_or(&Role::Student),
        gpa: Some(gpa),
        enrollment_date: Some(today),
        address: Some(Address {
            street: format!("{} Main St", rng.random_range(1..=9999)),
            city: pick(&CITIES, rng).to_string(),
            state: "State".to_string(),
            postal_code: rng.random_range(10000..=99999).to_string(),
            country: "United States".to_string(),
        }),
        company: None,
        bank: None,
        physical: None,
    })
}

///Placeholder records for when the real source can't be reached. Ids run `1..=count` in order.
pub fn synthesize(count: usize, rng: &mut impl Rng) -> Vec<Student> {
    let today = jiff::Zoned::now().date();
    (1..=count as StudentId)
        .filter_map(|id| synthetic_student(id, today, rng))
        .collect()
}
