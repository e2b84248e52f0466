pub mod comment;
pub mod favorite;
pub mod listing;
pub mod user;

use sea_orm::{DbErr, SqlErr};

/// True when a write was rejected by a unique index. Used to turn storage
/// constraint errors into domain-level "already exists" outcomes.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
