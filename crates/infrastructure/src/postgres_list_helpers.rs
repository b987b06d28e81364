use pharmadex_core::AppError;

pub(crate) fn sort_direction(descending: bool) -> &'static str {
    if descending { "DESC" } else { "ASC" }
}

/// Maps a unique-constraint violation to a conflict; everything else stays
/// an internal error with its context.
pub(crate) fn conflict_on_unique(
    error: sqlx::Error,
    conflict_message: String,
    context: &str,
) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(conflict_message);
    }

    AppError::Internal(format!("{context}: {error}"))
}

pub(crate) fn internal(context: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |error| AppError::Internal(format!("{context}: {error}"))
}
