//! Constraint violations.

use std::fmt;

use serde::Serialize;

/// Whether a violated rule blocks the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Blocks the action outright.
    Hard,
    /// Lowers the action's desirability without blocking it.
    Soft,
}

impl ConstraintKind {
    /// Upper-case label used in feedback text.
    pub fn label(&self) -> &'static str {
        match self {
            ConstraintKind::Hard => "HARD",
            ConstraintKind::Soft => "SOFT",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One rule failure for one candidate action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintViolation {
    /// Hard or soft.
    pub kind: ConstraintKind,
    /// Name of the rule that fired.
    pub rule: &'static str,
    /// Explanation suitable for feeding back to the generator.
    pub message: String,
    /// Weight in `[0, 1]`; hard violations are always 1.0.
    pub severity: f64,
}

impl ConstraintViolation {
    /// A blocking violation.
    pub fn hard(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: ConstraintKind::Hard,
            rule,
            message: message.into(),
            severity: 1.0,
        }
    }

    /// An advisory violation. Severity is clamped to `[0, 1]`.
    pub fn soft(rule: &'static str, message: impl Into<String>, severity: f64) -> Self {
        Self {
            kind: ConstraintKind::Soft,
            rule,
            message: message.into(),
            severity: severity.clamp(0.0, 1.0),
        }
    }

    /// Whether this violation blocks the action.
    pub fn is_hard(&self) -> bool {
        self.kind == ConstraintKind::Hard
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_kind() {
        let v = ConstraintViolation::hard("dark", "Need light");
        assert_eq!(v.to_string(), "[HARD] Need light");
        assert!(v.is_hard());
    }

    #[test]
    fn soft_severity_is_clamped() {
        let v = ConstraintViolation::soft("x", "y", 3.0);
        assert_eq!(v.severity, 1.0);
        assert_eq!(v.to_string(), "[SOFT] y");
    }
}
