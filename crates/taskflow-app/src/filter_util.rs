use taskflow_core::query::ParseQueryTokenError;
use taskflow_core::timestamp::parse_timestamp;
use taskflow_core::{Priority, SortKey, SortOrder, StatusFilter, TaskQuery};
use thiserror::Error;
use time::OffsetDateTime;

/// Error type returned while constructing queries from user-facing inputs.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    #[error("invalid {}: {}", .0.kind, .0.token)]
    InvalidToken(#[from] ParseQueryTokenError),
    #[error("invalid priority: {token}")]
    InvalidPriority { token: String },
    #[error("invalid {field} timestamp: {source}")]
    InvalidTimestamp {
        field: &'static str,
        #[source]
        source: time::error::Parse,
    },
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Builder that accepts user-facing strings and normalizes them into a [`TaskQuery`].
///
/// Starts from a base query (usually the configured defaults); each `with_*`
/// call overrides one clause when a non-blank value is given.
#[derive(Debug, Clone, Default)]
pub struct TaskQueryBuilder {
    query: TaskQuery,
}

impl TaskQueryBuilder {
    /// Start from the unfiltered, due-date ascending query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing query.
    #[must_use]
    pub const fn from_query(query: TaskQuery) -> Self {
        Self { query }
    }

    /// Set the status filter.
    ///
    /// # Errors
    /// Returns an error if the token does not name a status.
    pub fn with_status(mut self, status: Option<&str>) -> FilterBuildResult<Self> {
        if let Some(token) = non_blank(status) {
            self.query.status = token.parse::<StatusFilter>()?;
        }
        Ok(self)
    }

    /// Set the priority filter. `"any"` or `"all"` clears it.
    ///
    /// # Errors
    /// Returns an error if the token does not name a priority.
    pub fn with_priority(mut self, priority: Option<&str>) -> FilterBuildResult<Self> {
        if let Some(token) = non_blank(priority) {
            self.query.priority = parse_priority_filter(token)?;
        }
        Ok(self)
    }

    /// Set the sort key.
    ///
    /// # Errors
    /// Returns an error if the token does not name a sort key.
    pub fn with_sort_by(mut self, sort_by: Option<&str>) -> FilterBuildResult<Self> {
        if let Some(token) = non_blank(sort_by) {
            self.query.sort_by = token.parse::<SortKey>()?;
        }
        Ok(self)
    }

    /// Set the sort direction.
    ///
    /// # Errors
    /// Returns an error if the token does not name a sort order.
    pub fn with_sort_order(mut self, order: Option<&str>) -> FilterBuildResult<Self> {
        if let Some(token) = non_blank(order) {
            self.query.sort_order = token.parse::<SortOrder>()?;
        }
        Ok(self)
    }

    /// Build the final [`TaskQuery`].
    #[must_use]
    pub const fn build(self) -> TaskQuery {
        self.query
    }
}

/// Parse a priority token, mapping `"any"`/`"all"` to no filter.
///
/// # Errors
/// Returns an error if the token does not name a priority.
pub fn parse_priority_filter(token: &str) -> FilterBuildResult<Option<Priority>> {
    match token.trim().to_ascii_lowercase().as_str() {
        "any" | "all" => Ok(None),
        _ => parse_priority(token).map(Some),
    }
}

/// Parse a priority token.
///
/// # Errors
/// Returns an error if the token does not name a priority.
pub fn parse_priority(token: &str) -> FilterBuildResult<Priority> {
    token
        .parse::<Priority>()
        .map_err(|_| FilterBuildError::InvalidPriority {
            token: token.to_owned(),
        })
}

/// Parse a user-supplied deadline (RFC 3339 or `YYYY-MM-DD`).
///
/// # Errors
/// Returns an error if the value is in neither form.
pub fn parse_due_date(value: &str) -> FilterBuildResult<OffsetDateTime> {
    parse_timestamp(value).map_err(|source| FilterBuildError::InvalidTimestamp {
        field: "due",
        source,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|token| !token.is_empty())
}
