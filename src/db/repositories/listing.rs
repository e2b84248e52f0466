use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{listings, prelude::*, users};

/// Listing row joined with the seller's public display fields.
#[derive(Debug, Clone)]
pub struct ListingWithSeller {
    pub id: i32,
    pub seller_id: i32,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub condition: String,
    pub image: Option<String>,
    pub created_at: String,
    pub seller_name: String,
    pub seller_school: Option<String>,
    pub seller_phone: Option<String>,
}

/// Conjunctive browse filter; `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub condition: Option<String>,
}

/// Fields accepted on create and full-overwrite update. The seller is
/// never part of this: on create it comes from the authenticated caller,
/// afterwards it is immutable.
#[derive(Debug, Clone)]
pub struct ListingFields {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub condition: String,
    pub image: Option<String>,
}

/// Outcome of a mutation gated on ownership. The owner check happens inside
/// the same transaction as the write, so it reflects the row at write time.
#[derive(Debug)]
pub enum OwnedWrite<T> {
    Done(T),
    NotFound,
    Forbidden,
}

pub struct ListingRepository {
    conn: DatabaseConnection,
}

impl ListingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_row((listing, seller): (listings::Model, users::Model)) -> ListingWithSeller {
        ListingWithSeller {
            id: listing.id,
            seller_id: listing.seller_id,
            title: listing.title,
            description: listing.description,
            price: listing.price,
            category: listing.category,
            condition: listing.condition,
            image: listing.image,
            created_at: listing.created_at,
            seller_name: seller.username,
            seller_school: seller.school,
            seller_phone: seller.phone,
        }
    }

    fn map_rows(rows: Vec<(listings::Model, Option<users::Model>)>) -> Vec<ListingWithSeller> {
        rows.into_iter()
            .filter_map(|(listing, seller)| seller.map(|s| Self::map_row((listing, s))))
            .collect()
    }

    /// Browse listings, newest first. Category and condition filters are
    /// conjunctive when both are present.
    pub async fn list(&self, filter: &ListingFilter) -> Result<Vec<ListingWithSeller>> {
        let mut query = Listings::find().find_also_related(Users);

        if let Some(category) = &filter.category {
            query = query.filter(listings::Column::Category.eq(category));
        }
        if let Some(condition) = &filter.condition {
            query = query.filter(listings::Column::Condition.eq(condition));
        }

        let rows = query
            .order_by_desc(listings::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list listings")?;

        Ok(Self::map_rows(rows))
    }

    /// Case-insensitive substring search against title or description.
    pub async fn search(&self, term: &str) -> Result<Vec<ListingWithSeller>> {
        let rows = Listings::find()
            .find_also_related(Users)
            .filter(
                Condition::any()
                    .add(listings::Column::Title.contains(term))
                    .add(listings::Column::Description.contains(term)),
            )
            .order_by_desc(listings::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to search listings")?;

        Ok(Self::map_rows(rows))
    }

    pub async fn get(&self, id: i32) -> Result<Option<ListingWithSeller>> {
        let row = Listings::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query listing")?;

        Ok(row.and_then(|(listing, seller)| seller.map(|s| Self::map_row((listing, s)))))
    }

    pub async fn list_by_owner(&self, seller_id: i32) -> Result<Vec<ListingWithSeller>> {
        let rows = Listings::find()
            .find_also_related(Users)
            .filter(listings::Column::SellerId.eq(seller_id))
            .order_by_desc(listings::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list listings by owner")?;

        Ok(Self::map_rows(rows))
    }

    /// Fetch several listings with sellers, preserving the order of `ids`.
    pub async fn get_many_ordered(&self, ids: &[i32]) -> Result<Vec<ListingWithSeller>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Listings::find()
            .find_also_related(Users)
            .filter(listings::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query listings by ids")?;

        let mut by_id: std::collections::HashMap<i32, ListingWithSeller> = Self::map_rows(rows)
            .into_iter()
            .map(|l| (l.id, l))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let count = Listings::find_by_id(id)
            .count(&self.conn)
            .await
            .context("Failed to check listing existence")?;

        Ok(count > 0)
    }

    pub async fn insert(&self, seller_id: i32, fields: ListingFields) -> Result<ListingWithSeller> {
        let active = listings::ActiveModel {
            seller_id: Set(seller_id),
            title: Set(fields.title),
            description: Set(fields.description),
            price: Set(fields.price),
            category: Set(fields.category),
            condition: Set(fields.condition),
            image: Set(fields.image),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let res = Listings::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert listing")?;

        info!("Created listing {} for user {}", res.last_insert_id, seller_id);

        self.get(res.last_insert_id)
            .await?
            .context("Inserted listing missing on re-read")
    }

    /// Overwrite all mutable fields. The ownership check and the write share
    /// a transaction so a concurrent owner change cannot slip between them.
    pub async fn update(
        &self,
        id: i32,
        caller_id: i32,
        fields: ListingFields,
    ) -> Result<OwnedWrite<ListingWithSeller>> {
        let txn = self.conn.begin().await?;

        let Some(listing) = Listings::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(OwnedWrite::NotFound);
        };

        if listing.seller_id != caller_id {
            txn.rollback().await?;
            return Ok(OwnedWrite::Forbidden);
        }

        let mut active: listings::ActiveModel = listing.into();
        active.title = Set(fields.title);
        active.description = Set(fields.description);
        active.price = Set(fields.price);
        active.category = Set(fields.category);
        active.condition = Set(fields.condition);
        active.image = Set(fields.image);
        active.update(&txn).await?;

        txn.commit().await?;

        let updated = self
            .get(id)
            .await?
            .context("Updated listing missing on re-read")?;

        Ok(OwnedWrite::Done(updated))
    }

    /// Delete a listing and its dependent comments and favorites.
    ///
    /// The child deletes are explicit rather than left to the FK cascade so
    /// the whole removal commits or rolls back as one unit.
    pub async fn delete(&self, id: i32, caller_id: i32) -> Result<OwnedWrite<()>> {
        use crate::entities::{comments, favorites};

        let txn = self.conn.begin().await?;

        let Some(listing) = Listings::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(OwnedWrite::NotFound);
        };

        if listing.seller_id != caller_id {
            txn.rollback().await?;
            return Ok(OwnedWrite::Forbidden);
        }

        Comments::delete_many()
            .filter(comments::Column::ListingId.eq(id))
            .exec(&txn)
            .await?;

        Favorites::delete_many()
            .filter(favorites::Column::ListingId.eq(id))
            .exec(&txn)
            .await?;

        Listings::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!("Deleted listing {} (owner {})", id, caller_id);

        Ok(OwnedWrite::Done(()))
    }
}
