use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a movie titled \"{0}\" is already in the list")]
    DuplicateTitle(String),
    #[error("movie {0} not found")]
    NotFound(i32),
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl StoreError {
    /// Maps a unique-constraint violation on insert to `DuplicateTitle`.
    pub fn from_insert(err: DbErr, title: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::DuplicateTitle(title.to_string()),
            _ => Self::Db(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("movie catalog request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("movie catalog returned unusable data: {0}")]
    Malformed(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("bad request: {0}")]
    BadQuery(#[from] QueryRejection),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::DuplicateTitle(_)) => StatusCode::CONFLICT,
            AppError::Store(StoreError::Db(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Catalog(_) => StatusCode::BAD_GATEWAY,
            AppError::BadQuery(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let message = match &self {
            AppError::Store(StoreError::Db(_)) => {
                "Something went wrong. Please try again.".to_string()
            },
            AppError::BadQuery(rejection) => rejection.body_text(),
            _ => self.to_string(),
        };

        let body = crate::templates::error_page(status, &message);
        (status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(AppError::from(StoreError::NotFound(3)).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(StoreError::DuplicateTitle("Heat".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(CatalogError::Malformed("no title".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(StoreError::Db(DbErr::Custom("locked".into()))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn non_unique_db_errors_stay_db_errors() {
        let err = StoreError::from_insert(DbErr::Custom("disk full".into()), "Heat");
        assert!(matches!(err, StoreError::Db(_)));
    }
}
