use crate::error::AppError;

/// Resolves the database URL.
///
/// `DATABASE_URL` wins when set. Otherwise a Postgres URL is assembled from
/// `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_DB`, `POSTGRES_USER` and
/// `POSTGRES_PASSWORD`; host and port default to `localhost:5432`.
pub fn db_url<F>(lookup: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
        return Ok(url);
    }

    let host = lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string());
    let port = lookup("POSTGRES_PORT").unwrap_or_else(|| "5432".to_string());
    let db_name = must_var(&lookup, "POSTGRES_DB")?;
    let username = must_var(&lookup, "POSTGRES_USER")?;
    let password = must_var(&lookup, "POSTGRES_PASSWORD")?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

fn must_var<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).ok_or_else(|| {
        AppError::config(format!(
            "Required environment variable '{name}' is not set (or set DATABASE_URL)"
        ))
    })
}
