use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::grades::Grade;

pub type StudentId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub date: NaiveDate,
}

impl Activity {
    pub fn new(description: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            description: description.into(),
            date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub course: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    pub enrollment_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<u8>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Fields submitted by the add-student form. The store assigns `id` and fills
/// whatever defaults are missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub course: String,
    /// Only read when `course` is the `custom` placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<Activity>>,
}

impl StudentDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            course: course.into(),
            ..Self::default()
        }
    }
}

/// Partial update; absent fields leave the stored value untouched. Any `id`
/// in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<Activity>>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow merge over `student`. Grade/performance reconciliation is the
    /// store's job and happens before this is called.
    pub fn apply_to(&self, student: &mut Student) {
        if let Some(v) = &self.name {
            student.name = v.clone();
        }
        if let Some(v) = &self.email {
            student.email = v.clone();
        }
        if let Some(v) = &self.course {
            student.course = v.clone();
        }
        if let Some(v) = self.grade {
            student.grade = Some(v);
        }
        if let Some(v) = self.enrollment_date {
            student.enrollment_date = v;
        }
        if let Some(v) = self.performance {
            student.performance = Some(v);
        }
        if let Some(v) = self.attendance {
            student.attendance = Some(v);
        }
        if let Some(v) = &self.activities {
            student.activities = v.clone();
        }
    }
}

/// The edit form only exposes the first activity: replace it, or append when
/// the list is empty.
pub fn with_primary_activity(activities: &[Activity], activity: Activity) -> Vec<Activity> {
    let mut out = activities.to_vec();
    match out.first_mut() {
        Some(first) => *first = activity,
        None => out.push(activity),
    }
    out
}
