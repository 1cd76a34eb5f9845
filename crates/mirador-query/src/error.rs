use mirador_model::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueryErrorCode {
    InvalidFilter,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub code: QueryErrorCode,
    pub message: String,
}

impl QueryError {
    #[must_use]
    pub fn new(code: QueryErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for QueryError {}

impl From<ValidationError> for QueryError {
    fn from(value: ValidationError) -> Self {
        Self::new(QueryErrorCode::InvalidFilter, value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_invalid_filter() {
        let err: QueryError = ValidationError("province not present".to_string()).into();
        assert_eq!(err.code, QueryErrorCode::InvalidFilter);
        assert!(err.to_string().contains("province not present"));
    }
}
