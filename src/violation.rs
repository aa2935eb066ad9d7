//! Constraint violations raised by entity validation.
use std::fmt;

/// Outcome of a field check. `Ok` is the "no violation" case and carries the
/// normalized value.
pub type Check<T> = Result<T, ConstraintViolation>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintViolation {
    #[error("{0}")]
    MandatoryValue(String),

    #[error("{0}")]
    Range(String),

    #[error("{0}")]
    Pattern(String),

    #[error("{0}")]
    Interval(String),

    #[error("{0}")]
    StringLength(String),

    #[error("{0}")]
    Uniqueness(String),

    #[error("{0}")]
    ReferentialIntegrity(String),

    #[error("{0}")]
    Constraint(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    MandatoryValue,
    Range,
    Pattern,
    Interval,
    StringLength,
    Uniqueness,
    ReferentialIntegrity,
    Constraint,
}

impl ConstraintViolation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::MandatoryValue(_) => ViolationKind::MandatoryValue,
            Self::Range(_) => ViolationKind::Range,
            Self::Pattern(_) => ViolationKind::Pattern,
            Self::Interval(_) => ViolationKind::Interval,
            Self::StringLength(_) => ViolationKind::StringLength,
            Self::Uniqueness(_) => ViolationKind::Uniqueness,
            Self::ReferentialIntegrity(_) => ViolationKind::ReferentialIntegrity,
            Self::Constraint(_) => ViolationKind::Constraint,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::MandatoryValue(m)
            | Self::Range(m)
            | Self::Pattern(m)
            | Self::Interval(m)
            | Self::StringLength(m)
            | Self::Uniqueness(m)
            | Self::ReferentialIntegrity(m)
            | Self::Constraint(m) => m,
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MandatoryValue => "MandatoryValueConstraintViolation",
            Self::Range => "RangeConstraintViolation",
            Self::Pattern => "PatternConstraintViolation",
            Self::Interval => "IntervalConstraintViolation",
            Self::StringLength => "StringLengthConstraintViolation",
            Self::Uniqueness => "UniquenessConstraintViolation",
            Self::ReferentialIntegrity => "ReferentialIntegrityConstraintViolation",
            Self::Constraint => "ConstraintViolation",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_message_follow_variant() {
        let v = ConstraintViolation::Uniqueness("duplicate movie id 7".to_string());
        assert_eq!(v.kind(), ViolationKind::Uniqueness);
        assert_eq!(v.message(), "duplicate movie id 7");
        assert_eq!(v.to_string(), "duplicate movie id 7");
    }

    #[test]
    fn kind_display_uses_taxonomy_names() {
        assert_eq!(
            ViolationKind::ReferentialIntegrity.to_string(),
            "ReferentialIntegrityConstraintViolation"
        );
        assert_eq!(ViolationKind::Constraint.to_string(), "ConstraintViolation");
    }
}
