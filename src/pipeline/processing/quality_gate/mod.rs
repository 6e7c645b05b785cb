use tracing::warn;

use crate::pipeline::processing::mapper::RecordField;
use crate::pipeline::processing::record::CodeSystemRecord;

/// Quality gate decision for a record. The gate is advisory: neither
/// outcome stops the artifact from being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityDecision {
    /// Every required field is present
    Accept,
    /// One or more required fields are missing
    AcceptWithWarnings,
}

/// Individual quality issue found during assessment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityIssue {
    /// Field that triggered this issue
    pub field: RecordField,
    /// Human-readable description of the issue
    pub description: String,
}

/// Quality assessment result from the Quality Gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityAssessment {
    pub decision: QualityDecision,
    pub issues: Vec<QualityIssue>,
}

impl QualityAssessment {
    /// Number of required fields that are missing or empty
    pub fn missing_count(&self) -> usize {
        self.issues.len()
    }

    pub fn missing_fields(&self) -> Vec<RecordField> {
        self.issues.iter().map(|issue| issue.field).collect()
    }
}

/// Trait for implementing Quality Gate assessment logic
pub trait QualityGate {
    /// Assess the quality of a finished record
    fn assess(&self, record: &CodeSystemRecord) -> QualityAssessment;
}

/// Flags required fields that are absent or empty
#[derive(Debug, Clone)]
pub struct RequiredFieldsGate {
    pub required: Vec<RecordField>,
}

impl Default for RequiredFieldsGate {
    fn default() -> Self {
        Self {
            required: RecordField::REQUIRED.to_vec(),
        }
    }
}

impl RequiredFieldsGate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QualityGate for RequiredFieldsGate {
    fn assess(&self, record: &CodeSystemRecord) -> QualityAssessment {
        let issues: Vec<QualityIssue> = self
            .required
            .iter()
            .filter(|field| record.data.get(**field).map_or(true, str::is_empty))
            .map(|field| {
                let description = format!(
                    "The required field '{}' is missing or empty.",
                    field.as_str()
                );
                warn!(field = field.as_str(), "{}", description);
                QualityIssue {
                    field: *field,
                    description,
                }
            })
            .collect();

        let decision = if issues.is_empty() {
            QualityDecision::Accept
        } else {
            QualityDecision::AcceptWithWarnings
        };

        QualityAssessment { decision, issues }
    }
}
