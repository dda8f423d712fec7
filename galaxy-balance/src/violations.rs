//! Validation result shape (§4.F: `{valid, violations[severity], warnings,
//! adjusted_costs}`).

use galaxy_common::Resources;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub severity: Severity,
    pub message: String,
}

impl Violation {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<Violation>,
    pub warnings: Vec<String>,
    pub adjusted_costs: Resources,
}

impl ValidationResult {
    pub fn ok(adjusted_costs: Resources) -> Self {
        Self {
            valid: true,
            violations: Vec::new(),
            warnings: Vec::new(),
            adjusted_costs,
        }
    }
}
