//! Sort keys accepted by salary queries
//!
//! The set of keys is closed. Tokens are matched case-insensitively and
//! normalized to a `SortSpec`; anything else is rejected at the boundary.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::QueryError;
use crate::storage::Record;

/// Ordering rule for query results.
///
/// Every rule is ascending on its field with ties broken by record id, so
/// consecutive pages never overlap or skip records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortSpec {
    Name,
    Salary,
}

impl SortSpec {
    /// All supported keys
    pub const ALL: [SortSpec; 2] = [SortSpec::Name, SortSpec::Salary];

    /// Canonical external token
    pub fn token(&self) -> &'static str {
        match self {
            SortSpec::Name => "NAME",
            SortSpec::Salary => "SALARY",
        }
    }

    /// Compares two records under this rule.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let primary = match self {
            SortSpec::Name => a.name.cmp(&b.name),
            SortSpec::Salary => compare_salary(a.salary, b.salary),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Numeric order where -0.0 equals 0.0; NaN falls back to total order.
pub(crate) fn compare_salary(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

impl FromStr for SortSpec {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        SortSpec::ALL
            .into_iter()
            .find(|spec| spec.token().eq_ignore_ascii_case(token))
            .ok_or_else(|| QueryError::UnknownSortToken(s.to_string()))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecordId;

    fn rec(id: u64, name: &str, salary: f64) -> Record {
        Record::new(RecordId::new(id), name, salary)
    }

    #[test]
    fn test_tokens_are_case_insensitive() {
        assert_eq!("name".parse::<SortSpec>().unwrap(), SortSpec::Name);
        assert_eq!("Salary".parse::<SortSpec>().unwrap(), SortSpec::Salary);
        assert_eq!(" SALARY ".parse::<SortSpec>().unwrap(), SortSpec::Salary);
    }

    #[test]
    fn test_unknown_token_rejected() {
        let err = "AGE".parse::<SortSpec>().unwrap_err();
        assert!(matches!(err, QueryError::UnknownSortToken(ref t) if t == "AGE"));
        assert!("".parse::<SortSpec>().is_err());
    }

    #[test]
    fn test_ties_break_on_id() {
        let a = rec(2, "Alice", 100.0);
        let b = rec(1, "Alice", 100.0);
        assert_eq!(SortSpec::Name.compare(&a, &b), Ordering::Greater);
        assert_eq!(SortSpec::Salary.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let a = rec(1, "A", -0.0);
        let b = rec(2, "B", 0.0);
        assert_eq!(SortSpec::Salary.compare(&a, &b), Ordering::Less);
        assert_eq!(SortSpec::Salary.compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_display_is_token() {
        assert_eq!(SortSpec::Salary.to_string(), "SALARY");
        assert_eq!(
            serde_json::to_string(&SortSpec::Name).unwrap(),
            "\"NAME\""
        );
    }
}
