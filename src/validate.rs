use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Activity, StudentDraft, StudentPatch};

/// Course placeholder selected when the user types a course name instead.
pub const CUSTOM_COURSE: &str = "custom";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("{}", join_field_errors(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Loose address shape check: `local@domain.tld`, no whitespace, alphabetic
/// TLD of at least two characters.
pub fn is_email_shape(s: &str) -> bool {
    let s = s.trim();
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|l| {
        !l.is_empty()
            && !l.starts_with('-')
            && !l.ends_with('-')
            && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld = labels.last().copied().unwrap_or_default();
    labels_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Day-granularity check; a date equal to `today` is allowed.
pub fn is_not_future(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today
}

fn check_score(errors: &mut ValidationErrors, field: &str, label: &str, value: Option<u8>) {
    if let Some(v) = value {
        if v > 100 {
            errors.push(field, &format!("{label} must be between 0 and 100"));
        }
    }
}

fn check_activities(errors: &mut ValidationErrors, activities: Option<&[Activity]>, today: NaiveDate) {
    let Some(activities) = activities else {
        return;
    };
    if activities.iter().any(|a| !is_not_future(a.date, today)) {
        errors.push("activities", "Activity date cannot be in the future");
    }
}

/// Checks a create payload and returns it normalized: text fields trimmed and
/// the `custom` course placeholder replaced by the typed course name.
pub fn validate_draft(draft: &StudentDraft, today: NaiveDate) -> Result<StudentDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut out = draft.clone();
    out.name = draft.name.trim().to_string();
    out.email = draft.email.trim().to_string();
    out.course = draft.course.trim().to_string();

    if out.name.is_empty() {
        errors.push("name", "Name is required");
    }
    if !is_email_shape(&out.email) {
        errors.push("email", "Invalid email address");
    }
    if out.course.is_empty() {
        errors.push("course", "Course is required");
    } else if out.course == CUSTOM_COURSE {
        let custom = draft
            .custom_course
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if custom.is_empty() {
            errors.push("customCourse", "Custom course name is required");
        } else {
            out.course = custom.to_string();
        }
    }
    out.custom_course = None;

    if let Some(d) = draft.enrollment_date {
        if !is_not_future(d, today) {
            errors.push("enrollmentDate", "Enrollment date cannot be in the future");
        }
    }
    check_score(&mut errors, "performance", "Performance", draft.performance);
    check_score(&mut errors, "attendance", "Attendance", draft.attendance);
    check_activities(&mut errors, draft.activities.as_deref(), today);

    errors.into_result().map(|_| out)
}

/// Checks only the fields present in an update payload.
pub fn validate_patch(patch: &StudentPatch, today: NaiveDate) -> Result<StudentPatch, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut out = patch.clone();

    if let Some(name) = &patch.name {
        let name = name.trim();
        if name.is_empty() {
            errors.push("name", "Name is required");
        }
        out.name = Some(name.to_string());
    }
    if let Some(email) = &patch.email {
        if !is_email_shape(email) {
            errors.push("email", "Invalid email address");
        }
        out.email = Some(email.trim().to_string());
    }
    if let Some(course) = &patch.course {
        let course = course.trim();
        if course.is_empty() {
            errors.push("course", "Course is required");
        }
        out.course = Some(course.to_string());
    }
    if let Some(d) = patch.enrollment_date {
        if !is_not_future(d, today) {
            errors.push("enrollmentDate", "Enrollment date cannot be in the future");
        }
    }
    check_score(&mut errors, "performance", "Performance", patch.performance);
    check_score(&mut errors, "attendance", "Attendance", patch.attendance);
    check_activities(&mut errors, patch.activities.as_deref(), today);

    errors.into_result().map(|_| out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn email_shapes() {
        assert!(is_email_shape("john@example.com"));
        assert!(is_email_shape("a.b+c@mail.school.edu"));
        assert!(!is_email_shape("john@"));
        assert!(!is_email_shape("@example.com"));
        assert!(!is_email_shape("john example@x.com"));
        assert!(!is_email_shape("john@localhost"));
        assert!(!is_email_shape("john@x.c0m"));
        assert!(!is_email_shape("a@b@c.com"));
    }

    #[test]
    fn today_is_not_in_the_future() {
        assert!(is_not_future(today(), today()));
        assert!(!is_not_future(today().succ_opt().unwrap(), today()));
    }

    #[test]
    fn draft_requires_name_email_course() {
        let errs = validate_draft(&StudentDraft::default(), today()).unwrap_err();
        assert_eq!(errs.field("name"), Some("Name is required"));
        assert_eq!(errs.field("email"), Some("Invalid email address"));
        assert_eq!(errs.field("course"), Some("Course is required"));
    }

    #[test]
    fn errors_render_as_field_message_pairs() {
        let errs = validate_draft(&StudentDraft::new("", "zoe@x.com", "Art"), today()).unwrap_err();
        let as_error: &dyn std::error::Error = &errs;
        assert_eq!(as_error.to_string(), "name: Name is required");
    }

    #[test]
    fn custom_course_is_resolved() {
        let mut draft = StudentDraft::new("Zoe", "zoe@x.com", CUSTOM_COURSE);
        let errs = validate_draft(&draft, today()).unwrap_err();
        assert!(errs.field("customCourse").is_some());

        draft.custom_course = Some("  Astronomy ".into());
        let ok = validate_draft(&draft, today()).unwrap();
        assert_eq!(ok.course, "Astronomy");
        assert_eq!(ok.custom_course, None);
    }

    #[test]
    fn future_dates_and_out_of_range_scores_rejected() {
        let mut draft = StudentDraft::new("Zoe", "zoe@x.com", "Art");
        draft.enrollment_date = today().succ_opt();
        draft.performance = Some(101);
        draft.activities = Some(vec![Activity::new("x", today().succ_opt().unwrap())]);
        let errs = validate_draft(&draft, today()).unwrap_err();
        assert!(errs.field("enrollmentDate").is_some());
        assert!(errs.field("performance").is_some());
        assert!(errs.field("activities").is_some());
        assert!(errs.field("name").is_none());
    }

    #[test]
    fn patch_checks_only_present_fields() {
        assert!(validate_patch(&StudentPatch::default(), today()).is_ok());
        let patch = StudentPatch {
            name: Some("   ".into()),
            ..StudentPatch::default()
        };
        let errs = validate_patch(&patch, today()).unwrap_err();
        assert_eq!(errs.0.len(), 1);
        assert_eq!(errs.field("name"), Some("Name is required"));
    }
}
