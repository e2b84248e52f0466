//! Domain service for listings: browse/search reads plus ownership-gated
//! mutations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{ListingFilter, ListingWithSeller};

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Listing not found")]
    NotFound,

    /// Caller is authenticated but does not own the listing.
    #[error("Not the owner of this listing")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ListingError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ListingError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Closed category set. Serialized in kebab-case on the wire and stored as
/// the same string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Textbooks,
    Electronics,
    Stationery,
    Household,
    Sports,
    Other,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Textbooks => "textbooks",
            Self::Electronics => "electronics",
            Self::Stationery => "stationery",
            Self::Household => "household",
            Self::Sports => "sports",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "textbooks" => Ok(Self::Textbooks),
            "electronics" => Ok(Self::Electronics),
            "stationery" => Ok(Self::Stationery),
            "household" => Ok(Self::Household),
            "sports" => Ok(Self::Sports),
            "other" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

/// Closed condition set, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
}

impl Condition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::LikeNew => "like-new",
            Self::Good => "good",
            Self::Fair => "fair",
        }
    }
}

impl std::str::FromStr for Condition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "like-new" => Ok(Self::LikeNew),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            _ => Err(()),
        }
    }
}

/// Fields a caller supplies when creating or overwriting a listing. The
/// owner is never part of the payload; it is bound from the authenticated
/// caller on create and immutable afterwards.
///
/// Category and condition arrive as raw strings so an unknown value surfaces
/// as a validation error rather than a body-decoding rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingInput {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub condition: String,
    pub image: Option<String>,
}

/// Domain service trait for the listing store.
#[async_trait::async_trait]
pub trait ListingService: Send + Sync {
    /// Browse, newest first, with an optional conjunctive filter.
    async fn list(&self, filter: &ListingFilter) -> Result<Vec<ListingWithSeller>, ListingError>;

    /// Case-insensitive substring search over title and description.
    async fn search(&self, term: &str) -> Result<Vec<ListingWithSeller>, ListingError>;

    async fn get(&self, id: i32) -> Result<ListingWithSeller, ListingError>;

    async fn list_by_owner(&self, seller_id: i32) -> Result<Vec<ListingWithSeller>, ListingError>;

    /// Creates a listing owned by `caller_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Validation`] for a non-positive price or
    /// empty title.
    async fn create(
        &self,
        caller_id: i32,
        input: ListingInput,
    ) -> Result<ListingWithSeller, ListingError>;

    /// Overwrites all mutable fields of a listing the caller owns.
    ///
    /// # Errors
    ///
    /// [`ListingError::NotFound`] when absent, [`ListingError::Forbidden`]
    /// when the caller is not the owner.
    async fn update(
        &self,
        id: i32,
        caller_id: i32,
        input: ListingInput,
    ) -> Result<ListingWithSeller, ListingError>;

    /// Deletes a listing the caller owns, cascading to its comments and
    /// favorites.
    async fn delete(&self, id: i32, caller_id: i32) -> Result<(), ListingError>;
}
