//! Query parameters
//!
//! `QueryParams` is validated on construction and immutable afterwards.
//! `RawQueryParams` is the caller-facing form: signed integers and a free
//! text sort token, converted with `QueryParams::try_from`.

use serde::{Deserialize, Serialize};

use super::errors::{QueryError, QueryResult};
use super::sort::SortSpec;

/// A validated salary range query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    min_salary: f64,
    max_salary: f64,
    offset: usize,
    limit: Option<usize>,
    sort_type: Option<SortSpec>,
}

impl QueryParams {
    /// Creates a query over `[min_salary, max_salary]` with no window and no sort.
    pub fn new(min_salary: f64, max_salary: f64) -> QueryResult<Self> {
        if !min_salary.is_finite() {
            return Err(QueryError::NonFiniteBound("minSalary"));
        }
        if !max_salary.is_finite() {
            return Err(QueryError::NonFiniteBound("maxSalary"));
        }
        if min_salary > max_salary {
            return Err(QueryError::InvalidRange {
                min: min_salary,
                max: max_salary,
            });
        }

        Ok(Self {
            min_salary,
            max_salary,
            offset: 0,
            limit: None,
            sort_type: None,
        })
    }

    /// Skips the first `offset` matches.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Caps the result at `limit` records. Zero is rejected.
    pub fn with_limit(mut self, limit: usize) -> QueryResult<Self> {
        if limit == 0 {
            return Err(QueryError::InvalidLimit(0));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    pub fn with_sort(mut self, sort_type: SortSpec) -> Self {
        self.sort_type = Some(sort_type);
        self
    }

    pub fn min_salary(&self) -> f64 {
        self.min_salary
    }

    pub fn max_salary(&self) -> f64 {
        self.max_salary
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn sort_type(&self) -> Option<SortSpec> {
        self.sort_type
    }

    /// Inclusive range membership
    pub fn contains(&self, salary: f64) -> bool {
        salary >= self.min_salary && salary <= self.max_salary
    }
}

/// Unvalidated query parameters as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQueryParams {
    pub min_salary: f64,
    pub max_salary: f64,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub sort_type: Option<String>,
}

impl TryFrom<RawQueryParams> for QueryParams {
    type Error = QueryError;

    fn try_from(raw: RawQueryParams) -> QueryResult<Self> {
        let mut params = QueryParams::new(raw.min_salary, raw.max_salary)?;

        if let Some(offset) = raw.offset {
            let offset = usize::try_from(offset).map_err(|_| QueryError::NegativeOffset(offset))?;
            params = params.with_offset(offset);
        }

        if let Some(limit) = raw.limit {
            let limit = usize::try_from(limit)
                .ok()
                .filter(|l| *l > 0)
                .ok_or(QueryError::InvalidLimit(limit))?;
            params = params.with_limit(limit)?;
        }

        if let Some(token) = raw.sort_type.as_deref() {
            params = params.with_sort(token.parse()?);
        }

        Ok(params)
    }
}
