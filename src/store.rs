use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

use crate::grades::{
    grade_to_performance, performance_to_grade, DEFAULT_GRADE, DEFAULT_PERFORMANCE,
};
use crate::model::{Student, StudentDraft, StudentId, StudentPatch};
use crate::seed::{default_students, new_student_activities};
use crate::storage::{SharedStorage, STUDENTS_KEY};
use crate::validate::{validate_draft, validate_patch, ValidationErrors};

pub type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// The single store instance of a session, shared by handle.
pub type SharedStore = Arc<Mutex<StudentStore>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Student not found")]
    NotFound(StudentId),
    #[error("invalid student: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("No student ids left")]
    IdsExhausted,
}

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Canonical in-memory roster mirrored to key-value storage after every
/// mutation. Writes that fail are logged and the in-memory state stays
/// authoritative for the rest of the session.
pub struct StudentStore {
    students: Vec<Student>,
    storage: SharedStorage,
    rng: Box<dyn RngCore + Send>,
    today: Clock,
}

impl StudentStore {
    /// Rehydrates from `storage`; installs and persists the defaults when
    /// nothing is stored, and falls back to them when the stored roster can't
    /// be read.
    pub fn open(storage: SharedStorage) -> Self {
        let students = load_students(&storage);
        Self {
            students,
            storage,
            rng: Box::new(StdRng::from_entropy()),
            today: Box::new(local_today),
        }
    }

    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Box::new(today);
        self
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    pub fn list(&self) -> &[Student] {
        &self.students
    }

    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    fn next_id(&self) -> Result<StudentId, StoreError> {
        self.students
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted)
    }

    fn position(&self, id: StudentId) -> Result<usize, StoreError> {
        self.students
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn create(&mut self, draft: StudentDraft) -> Result<Student, StoreError> {
        let today = self.today();
        let draft = validate_draft(&draft, today)?;
        let id = self.next_id()?;

        let (grade, performance) = match (draft.grade, draft.performance) {
            (_, Some(p)) => (performance_to_grade(p), p),
            (Some(g), None) => (g, grade_to_performance(g)),
            (None, None) => (DEFAULT_GRADE, DEFAULT_PERFORMANCE),
        };
        let attendance = match draft.attendance {
            Some(a) => a,
            None => self.rng.gen_range(80..=99),
        };
        let activities = draft
            .activities
            .unwrap_or_else(|| new_student_activities(today));

        let student = Student {
            id,
            name: draft.name,
            email: draft.email,
            course: draft.course,
            grade: Some(grade),
            enrollment_date: draft.enrollment_date.unwrap_or(today),
            performance: Some(performance),
            attendance: Some(attendance),
            activities,
        };
        self.students.push(student.clone());
        self.persist();
        debug!(id = student.id, course = %student.course, "student created");
        Ok(student)
    }

    /// Shallow merge; performance wins over grade when both are supplied.
    pub fn update(&mut self, id: StudentId, patch: StudentPatch) -> Result<Student, StoreError> {
        let idx = self.position(id)?;
        let mut patch = validate_patch(&patch, self.today())?;

        if let Some(p) = patch.performance {
            patch.grade = Some(performance_to_grade(p));
        } else if let Some(g) = patch.grade {
            patch.performance = Some(grade_to_performance(g));
        }

        let student = &mut self.students[idx];
        patch.apply_to(student);
        student.id = id;
        let updated = student.clone();
        self.persist();
        debug!(id, "student updated");
        Ok(updated)
    }

    pub fn delete(&mut self, id: StudentId) -> Result<Student, StoreError> {
        let idx = self.position(id)?;
        let removed = self.students.remove(idx);
        self.persist();
        debug!(id, remaining = self.students.len(), "student deleted");
        Ok(removed)
    }

    pub fn reset(&mut self) -> Vec<Student> {
        self.students = default_students();
        self.persist();
        debug!("roster reset to defaults");
        self.students.clone()
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.students) {
            Ok(v) => v,
            Err(e) => {
                error!(error = %e, "failed to serialize roster");
                return;
            }
        };
        if let Err(e) = self.storage.set(STUDENTS_KEY, &raw) {
            warn!(error = %e, "failed to persist roster; continuing in memory");
        }
    }
}

fn load_students(storage: &SharedStorage) -> Vec<Student> {
    match storage.get(STUDENTS_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<Vec<Student>>(&raw) {
            Ok(students) => {
                debug!(count = students.len(), "roster loaded from storage");
                students
            }
            Err(e) => {
                warn!(error = %e, "stored roster is unreadable; using defaults");
                default_students()
            }
        },
        Ok(None) => {
            let students = default_students();
            match serde_json::to_string(&students) {
                Ok(raw) => {
                    if let Err(e) = storage.set(STUDENTS_KEY, &raw) {
                        warn!(error = %e, "failed to persist default roster");
                    }
                }
                Err(e) => error!(error = %e, "failed to serialize default roster"),
            }
            students
        }
        Err(e) => {
            error!(error = %e, "failed to read roster from storage; using defaults");
            default_students()
        }
    }
}
