pub mod student;
pub mod validation;

pub const COURSES: [&str; 38] = [
    "Computer Science",
    "Software Engineering",
    "Data Science",
    "Artificial Intelligence",
    "Cybersecurity",
    "Web Development",
    "Mobile Development",
    "Business Administration",
    "Digital Marketing",
    "Finance",
    "Accounting",
    "Management",
    "Engineering - Civil",
    "Engineering - Mechanical",
    "Engineering - Electrical",
    "Engineering - Chemical",
    "Medicine",
    "Nursing",
    "Pharmacy",
    "Dentistry",
    "Mathematics",
    "Statistics",
    "Physics",
    "Chemistry",
    "Biology",
    "Environmental Science",
    "Psychology",
    "Sociology",
    "Political Science",
    "Economics",
    "Literature",
    "Linguistics",
    "History",
    "Philosophy",
    "Art & Design",
    "Music",
    "Theater Arts",
    "Communications",
];
