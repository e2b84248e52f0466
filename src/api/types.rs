use serde::Serialize;

use crate::db::{CommentWithAuthor, ListingWithSeller, User};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Public view of an account. The password hash has no path into this type.
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub school: Option<String>,
    pub phone: Option<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            school: user.school,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingDto {
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

impl From<ListingWithSeller> for ListingDto {
    fn from(l: ListingWithSeller) -> Self {
        Self {
            id: l.id,
            seller_id: l.seller_id,
            title: l.title,
            description: l.description,
            price: l.price,
            category: l.category,
            condition: l.condition,
            image: l.image,
            created_at: l.created_at,
            seller_name: l.seller_name,
            seller_school: l.seller_school,
            seller_phone: l.seller_phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentDto {
    pub id: i32,
    pub listing_id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: String,
    pub username: String,
}

impl From<CommentWithAuthor> for CommentDto {
    fn from(c: CommentWithAuthor) -> Self {
        Self {
            id: c.id,
            listing_id: c.listing_id,
            user_id: c.user_id,
            content: c.content,
            created_at: c.created_at,
            username: c.username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
