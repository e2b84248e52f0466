use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use crate::entities::{favorites, prelude::*};

use super::is_unique_violation;
use super::listing::{ListingRepository, ListingWithSeller};

/// Outcome of a favorite insert. `Duplicate` is surfaced by the unique
/// index on (user_id, listing_id), not by a pre-check, so concurrent adds
/// cannot both succeed.
#[derive(Debug, PartialEq, Eq)]
pub enum FavoriteAdd {
    Added,
    Duplicate,
}

pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

impl FavoriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Favorited listings for a user, newest-favorited first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<ListingWithSeller>> {
        let rows = Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_desc(favorites::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list favorites")?;

        let ids: Vec<i32> = rows.into_iter().map(|f| f.listing_id).collect();

        ListingRepository::new(self.conn.clone())
            .get_many_ordered(&ids)
            .await
    }

    pub async fn add(&self, user_id: i32, listing_id: i32) -> Result<FavoriteAdd> {
        let active = favorites::ActiveModel {
            user_id: Set(user_id),
            listing_id: Set(listing_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match Favorites::insert(active).exec(&self.conn).await {
            Ok(_) => {
                info!("User {} favorited listing {}", user_id, listing_id);
                Ok(FavoriteAdd::Added)
            }
            Err(e) if is_unique_violation(&e) => Ok(FavoriteAdd::Duplicate),
            Err(e) => Err(e).context("Failed to insert favorite"),
        }
    }

    /// Remove the (user, listing) pair. Returns false when no such pair
    /// existed.
    pub async fn remove(&self, user_id: i32, listing_id: i32) -> Result<bool> {
        let res = Favorites::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::ListingId.eq(listing_id))
            .exec(&self.conn)
            .await
            .context("Failed to remove favorite")?;

        Ok(res.rows_affected > 0)
    }
}
