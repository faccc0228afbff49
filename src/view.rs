use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::model::Student;

/// Courses offered in the add form even before any student takes them.
pub const PREDEFINED_COURSES: [&str; 20] = [
    "Computer Science",
    "Mathematics",
    "Physics",
    "Biology",
    "Chemistry",
    "Literature",
    "History",
    "Psychology",
    "Art History",
    "Engineering",
    "Economics",
    "Business Administration",
    "Political Science",
    "Sociology",
    "Philosophy",
    "Foreign Languages",
    "Music",
    "Fine Arts",
    "Medicine",
    "Law",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Name,
    Email,
    Course,
    Grade,
    EnrollmentDate,
    Performance,
    Attendance,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub course_filter: String,
    pub search_term: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl ListQuery {
    /// Header click: flips direction when `key` is already the ascending sort
    /// key, otherwise sorts ascending by `key`.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort_direction = if self.sort_key == key && self.sort_direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.sort_key = key;
    }

    fn matches(&self, student: &Student) -> bool {
        let course_ok = self.course_filter.is_empty()
            || student.course.to_lowercase() == self.course_filter.to_lowercase();
        if !course_ok {
            return false;
        }
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        student.name.to_lowercase().contains(&needle)
            || student.email.to_lowercase().contains(&needle)
    }
}

fn compare_by(key: SortKey, a: &Student, b: &Student) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Email => a.email.cmp(&b.email),
        SortKey::Course => a.course.cmp(&b.course),
        SortKey::Grade => a.grade.map(|g| g.label()).cmp(&b.grade.map(|g| g.label())),
        SortKey::EnrollmentDate => a.enrollment_date.cmp(&b.enrollment_date),
        SortKey::Performance => a.performance.cmp(&b.performance),
        SortKey::Attendance => a.attendance.cmp(&b.attendance),
        SortKey::Id => a.id.cmp(&b.id),
    }
}

/// Sorted, course-filtered, searched projection of a roster snapshot. Ties on
/// the sort key fall back to ascending id in both directions.
pub fn project(students: &[Student], query: &ListQuery) -> Vec<Student> {
    let mut out: Vec<Student> = students
        .iter()
        .filter(|s| query.matches(s))
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        let primary = compare_by(query.sort_key, a, b);
        let primary = match query.sort_direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    });
    out
}

/// Distinct courses in first-seen order, for the list's course filter.
pub fn distinct_courses(students: &[Student]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for s in students {
        if !out.iter().any(|c| c == &s.course) {
            out.push(s.course.clone());
        }
    }
    out
}

/// Roster courses plus the predefined ones, deduplicated and sorted.
pub fn course_options(students: &[Student]) -> Vec<String> {
    students
        .iter()
        .map(|s| s.course.clone())
        .chain(PREDEFINED_COURSES.iter().map(|c| c.to_string()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_students;

    fn names(v: &[Student]) -> Vec<&str> {
        v.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn default_query_sorts_by_name_ascending() {
        let out = project(&default_students(), &ListQuery::default());
        assert_eq!(out.len(), 15);
        assert_eq!(out[0].name, "Alex Brown");
        assert_eq!(out[14].name, "Sophia Rodriguez");
    }

    #[test]
    fn course_filter_is_case_insensitive() {
        let q = ListQuery {
            course_filter: "computer science".into(),
            ..ListQuery::default()
        };
        let out = project(&default_students(), &q);
        assert_eq!(names(&out), vec!["Alex Brown", "John Doe", "Sophia Rodriguez"]);
    }

    #[test]
    fn search_matches_name_or_email() {
        let q = ListQuery {
            search_term: "JOHN".into(),
            ..ListQuery::default()
        };
        let out = project(&default_students(), &q);
        assert_eq!(names(&out), vec!["John Doe", "Mike Johnson"]);

        let q = ListQuery {
            search_term: "olivia@".into(),
            ..ListQuery::default()
        };
        assert_eq!(names(&project(&default_students(), &q)), vec!["Olivia Martin"]);
    }

    #[test]
    fn equal_keys_break_ties_by_id_in_both_directions() {
        let mut q = ListQuery {
            sort_key: SortKey::Performance,
            ..ListQuery::default()
        };
        let asc = project(&default_students(), &q);
        // Daniel Lee (7) and Mason Turner (15) both have 85.
        let pos = |v: &[Student], id: i64| v.iter().position(|s| s.id == id).unwrap();
        assert!(pos(&asc, 7) < pos(&asc, 15));

        q.sort_direction = SortDirection::Descending;
        let desc = project(&default_students(), &q);
        assert_eq!(desc[0].name, "Olivia Martin");
        assert!(pos(&desc, 7) < pos(&desc, 15));
    }

    #[test]
    fn grade_sorts_by_label_text() {
        let q = ListQuery {
            sort_key: SortKey::Grade,
            ..ListQuery::default()
        };
        let out = project(&default_students(), &q);
        // "A" < "A+" < "A-" as text.
        assert_eq!(out[0].grade.map(|g| g.label()), Some("A"));
        assert_eq!(out[3].grade.map(|g| g.label()), Some("A+"));
        assert_eq!(out[5].grade.map(|g| g.label()), Some("A-"));
    }

    #[test]
    fn toggle_sort_flips_then_resets() {
        let mut q = ListQuery::default();
        q.toggle_sort(SortKey::Name);
        assert_eq!(q.sort_direction, SortDirection::Descending);
        q.toggle_sort(SortKey::Name);
        assert_eq!(q.sort_direction, SortDirection::Ascending);
        q.toggle_sort(SortKey::Name);
        q.toggle_sort(SortKey::Course);
        assert_eq!((q.sort_key, q.sort_direction), (SortKey::Course, SortDirection::Ascending));
    }

    #[test]
    fn query_uses_camel_case_sort_fields() {
        let v = serde_json::to_value(ListQuery::default()).unwrap();
        assert_eq!(v["sortKey"], "name");
        assert_eq!(v["sortDirection"], "ascending");

        let q: ListQuery = serde_json::from_value(serde_json::json!({
            "sortKey": "grade",
            "sortDirection": "descending"
        }))
        .unwrap();
        assert_eq!((q.sort_key, q.sort_direction), (SortKey::Grade, SortDirection::Descending));
    }

    #[test]
    fn course_lists() {
        let students = default_students();
        let distinct = distinct_courses(&students);
        assert_eq!(distinct.len(), 10);
        assert_eq!(distinct[0], "Computer Science");
        assert_eq!(distinct[1], "Mathematics");

        let options = course_options(&students);
        assert_eq!(options.len(), 20);
        assert_eq!(options.first().map(String::as_str), Some("Art History"));
        assert!(options.windows(2).all(|w| w[0] < w[1]));
    }
}
