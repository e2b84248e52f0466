use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::{comments, prelude::*, users};

/// Comment row joined with the author's username.
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub id: i32,
    pub listing_id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: String,
    pub username: String,
}

fn map_row((comment, author): (comments::Model, users::Model)) -> CommentWithAuthor {
    CommentWithAuthor {
        id: comment.id,
        listing_id: comment.listing_id,
        user_id: comment.user_id,
        content: comment.content,
        created_at: comment.created_at,
        username: author.username,
    }
}

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Thread for a listing, newest first.
    pub async fn list_for_listing(&self, listing_id: i32) -> Result<Vec<CommentWithAuthor>> {
        let rows = Comments::find()
            .find_also_related(Users)
            .filter(comments::Column::ListingId.eq(listing_id))
            .order_by_desc(comments::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list comments")?;

        Ok(rows
            .into_iter()
            .filter_map(|(comment, author)| author.map(|a| map_row((comment, a))))
            .collect())
    }

    /// Append a comment. Content is stored verbatim; comments are never
    /// edited, only removed by the listing's cascade.
    pub async fn add(
        &self,
        listing_id: i32,
        user_id: i32,
        content: String,
    ) -> Result<CommentWithAuthor> {
        let active = comments::ActiveModel {
            listing_id: Set(listing_id),
            user_id: Set(user_id),
            content: Set(content),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let res = Comments::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert comment")?;

        let row = Comments::find_by_id(res.last_insert_id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to re-read inserted comment")?;

        row.and_then(|(comment, author)| author.map(|a| map_row((comment, a))))
            .context("Inserted comment missing on re-read")
    }
}
