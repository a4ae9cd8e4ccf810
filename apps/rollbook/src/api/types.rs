//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Numeric request fields arrive either as JSON integers or as digit
//! strings (HTML forms post strings). Both are accepted; anything else is
//! rejected as `InvalidInput`. An empty string counts as an absent field.

use rollbook_core::{RecordError, Roll, SeedReport, StudentDraft, StudentPatch, StudentRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STUDENT RECORD
// =============================================================================

/// Wire shape of a stored student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentJson {
    pub roll: u64,
    pub name: String,
    pub age: u32,
    pub branch: String,
    pub mark1: u8,
    pub mark2: u8,
    pub mark3: u8,
    pub mark4: u8,
    pub mark5: u8,
    pub percentage: f64,
    pub grade: String,
}

impl From<&StudentRecord> for StudentJson {
    fn from(record: &StudentRecord) -> Self {
        let [mark1, mark2, mark3, mark4, mark5] = record.marks().values();
        Self {
            roll: record.roll().value(),
            name: record.name().to_string(),
            age: record.age(),
            branch: record.branch().to_string(),
            mark1,
            mark2,
            mark3,
            mark4,
            mark5,
            percentage: record.percentage().as_f64(),
            grade: record.grade().to_string(),
        }
    }
}

impl StudentJson {
    /// Convert a batch of records.
    #[must_use]
    pub fn from_records(records: &[StudentRecord]) -> Vec<Self> {
        records.iter().map(Self::from).collect()
    }
}

// =============================================================================
// CREATE / UPDATE REQUESTS
// =============================================================================

/// Student create request. `percentage` and `grade` are ignored if present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    #[serde(default)]
    pub roll: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub mark1: Option<Value>,
    #[serde(default)]
    pub mark2: Option<Value>,
    #[serde(default)]
    pub mark3: Option<Value>,
    #[serde(default)]
    pub mark4: Option<Value>,
    #[serde(default)]
    pub mark5: Option<Value>,
}

impl CreateStudentRequest {
    /// Convert to a draft, validating every supplied field.
    ///
    /// `roll` is required and must be a non-negative integer. Missing
    /// optional fields take their defaults.
    pub fn to_draft(&self) -> Result<StudentDraft, RecordError> {
        let roll = parse_roll(self.roll.as_ref())?;

        let mut draft = StudentDraft::new(roll)
            .with_name(self.name.clone().unwrap_or_default())
            .with_branch(self.branch.clone().unwrap_or_default());
        if let Some(age) = optional_age(self.age.as_ref())? {
            draft = draft.with_age(age);
        }
        let marks = parse_marks(self.marks())?;
        Ok(draft.with_marks(marks.map(|m| m.unwrap_or(0))))
    }

    fn marks(&self) -> [Option<&Value>; 5] {
        [
            self.mark1.as_ref(),
            self.mark2.as_ref(),
            self.mark3.as_ref(),
            self.mark4.as_ref(),
            self.mark5.as_ref(),
        ]
    }
}

/// Student update request. Every field is optional; `roll` is accepted
/// and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub mark1: Option<Value>,
    #[serde(default)]
    pub mark2: Option<Value>,
    #[serde(default)]
    pub mark3: Option<Value>,
    #[serde(default)]
    pub mark4: Option<Value>,
    #[serde(default)]
    pub mark5: Option<Value>,
}

impl UpdateStudentRequest {
    /// Convert to a patch. Absent fields stay `None` so the stored value wins.
    pub fn to_patch(&self) -> Result<StudentPatch, RecordError> {
        Ok(StudentPatch {
            name: self.name.clone(),
            age: optional_age(self.age.as_ref())?,
            branch: self.branch.clone(),
            marks: parse_marks([
                self.mark1.as_ref(),
                self.mark2.as_ref(),
                self.mark3.as_ref(),
                self.mark4.as_ref(),
                self.mark5.as_ref(),
            ])?,
        })
    }
}

// =============================================================================
// FIELD PARSING
// =============================================================================

fn invalid(field: &str) -> RecordError {
    RecordError::InvalidInput(format!("{field} must be an integer"))
}

/// Read an integer that may be sent as a number or a digit string.
fn optional_int(field: &str, value: Option<&Value>) -> Result<Option<i64>, RecordError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| invalid(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid(field)),
        Some(_) => Err(invalid(field)),
    }
}

/// Rolls use the full `u64` range, so they skip the signed path that
/// marks and age go through.
fn parse_roll(value: Option<&Value>) -> Result<Roll, RecordError> {
    let negative = || RecordError::InvalidInput("roll must be a non-negative integer".to_string());
    match value {
        None | Some(Value::Null) => Err(RecordError::InvalidInput("roll is required".to_string())),
        Some(Value::Number(n)) => match (n.as_u64(), n.as_i64()) {
            (Some(roll), _) => Ok(Roll(roll)),
            (None, Some(_)) => Err(negative()),
            (None, None) => Err(invalid("roll")),
        },
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(RecordError::InvalidInput("roll is required".to_string()));
            }
            match s.parse::<u64>() {
                Ok(roll) => Ok(Roll(roll)),
                Err(_) if s.parse::<i64>().is_ok() => Err(negative()),
                Err(_) => Err(invalid("roll")),
            }
        }
        Some(_) => Err(invalid("roll")),
    }
}

fn optional_age(value: Option<&Value>) -> Result<Option<u32>, RecordError> {
    optional_int("age", value)?
        .map(|raw| {
            u32::try_from(raw).map_err(|_| {
                RecordError::InvalidInput("age must be a non-negative integer".to_string())
            })
        })
        .transpose()
}

const MARK_FIELDS: [&str; 5] = ["mark1", "mark2", "mark3", "mark4", "mark5"];

fn parse_marks(values: [Option<&Value>; 5]) -> Result<[Option<i64>; 5], RecordError> {
    let mut marks = [None; 5];
    for ((slot, field), value) in marks.iter_mut().zip(MARK_FIELDS).zip(values) {
        *slot = optional_int(field, value)?;
    }
    Ok(marks)
}

// =============================================================================
// SMALL RESPONSES
// =============================================================================

/// Record count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Seed outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    pub message: String,
    pub added: usize,
    pub skipped: Vec<u64>,
}

impl From<&SeedReport> for SeedResponse {
    fn from(report: &SeedReport) -> Self {
        Self {
            message: report.message(),
            added: report.added,
            skipped: report.skipped.iter().map(|r| r.value()).collect(),
        }
    }
}

/// Error body used by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
