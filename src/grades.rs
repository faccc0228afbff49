use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letter grades in rank order, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

pub const ALL_GRADES: [Grade; 11] = [
    Grade::APlus,
    Grade::A,
    Grade::AMinus,
    Grade::BPlus,
    Grade::B,
    Grade::BMinus,
    Grade::CPlus,
    Grade::C,
    Grade::CMinus,
    Grade::D,
    Grade::F,
];

/// Performance assigned when a student is created with neither grade nor performance.
pub const DEFAULT_PERFORMANCE: u8 = 75;
pub const DEFAULT_GRADE: Grade = Grade::CPlus;

// (lowest performance in band, grade, representative performance)
const BANDS: [(u8, Grade, u8); 11] = [
    (93, Grade::APlus, 95),
    (90, Grade::A, 91),
    (87, Grade::AMinus, 88),
    (83, Grade::BPlus, 85),
    (80, Grade::B, 81),
    (77, Grade::BMinus, 78),
    (73, Grade::CPlus, 75),
    (70, Grade::C, 71),
    (67, Grade::CMinus, 68),
    (60, Grade::D, 65),
    (0, Grade::F, 50),
];

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn band(self) -> GradeBand {
        match self {
            Grade::APlus | Grade::A | Grade::AMinus => GradeBand::A,
            Grade::BPlus | Grade::B | Grade::BMinus => GradeBand::B,
            Grade::CPlus | Grade::C | Grade::CMinus => GradeBand::C,
            Grade::D => GradeBand::D,
            Grade::F => GradeBand::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grade: {0}")]
pub struct UnknownGrade(pub String);

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_GRADES
            .iter()
            .copied()
            .find(|g| g.label() == s.trim())
            .ok_or_else(|| UnknownGrade(s.to_string()))
    }
}

/// Grade family used to colour-code a grade badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeBand {
    A,
    B,
    C,
    D,
    F,
    Unknown,
}

pub fn band_of(grade: Option<Grade>) -> GradeBand {
    grade.map(Grade::band).unwrap_or(GradeBand::Unknown)
}

/// Maps a 0..=100 score to its letter grade. Scores above 100 land in A+.
pub fn performance_to_grade(performance: u8) -> Grade {
    BANDS
        .iter()
        .find(|(floor, _, _)| performance >= *floor)
        .map(|(_, g, _)| *g)
        .unwrap_or(Grade::F)
}

/// Representative score for a grade. Not an inverse of `performance_to_grade`:
/// a whole band collapses to one point.
pub fn grade_to_performance(grade: Grade) -> u8 {
    BANDS
        .iter()
        .find(|(_, g, _)| *g == grade)
        .map(|(_, _, rep)| *rep)
        .unwrap_or(DEFAULT_PERFORMANCE)
}

/// Like `grade_to_performance` for free text; unrecognized labels give 75.
pub fn grade_label_to_performance(label: &str) -> u8 {
    label
        .parse::<Grade>()
        .map(grade_to_performance)
        .unwrap_or(DEFAULT_PERFORMANCE)
}
