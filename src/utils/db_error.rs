//! Classification of database errors the services react to.

/// Name of the unique constraint guarding press release identifiers.
pub const PR_ID_UNIQUE_CONSTRAINT: &str = "press_releases_pr_id_key";

/// Returns true when `e` is a unique violation on `press_releases.pr_id`,
/// i.e. a concurrent creation already claimed the identifier.
pub fn is_unique_violation_on_pr_id(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(PR_ID_UNIQUE_CONSTRAINT))
}
