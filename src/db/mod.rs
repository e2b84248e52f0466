use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::comment::CommentWithAuthor;
pub use repositories::favorite::FavoriteAdd;
pub use repositories::listing::{ListingFields, ListingFilter, ListingWithSeller, OwnedWrite};
pub use repositories::user::{IdentityWrite, NewUser, User};

/// Shared handle to the relational store. Opened once at startup, cloned
/// into every consumer; the underlying pool serializes concurrent writers.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn listing_repo(&self) -> repositories::listing::ListingRepository {
        repositories::listing::ListingRepository::new(self.conn.clone())
    }

    fn favorite_repo(&self) -> repositories::favorite::FavoriteRepository {
        repositories::favorite::FavoriteRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(&self, new_user: NewUser) -> Result<IdentityWrite> {
        self.user_repo().create(new_user).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>> {
        self.user_repo().get_by_email_with_password(email).await
    }

    pub async fn user_password_hash(&self, id: i32) -> Result<Option<String>> {
        self.user_repo().password_hash_by_id(id).await
    }

    pub async fn identity_taken(
        &self,
        username: &str,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        self.user_repo()
            .identity_taken(username, email, exclude_id)
            .await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        username: &str,
        email: &str,
        school: Option<String>,
        phone: Option<String>,
    ) -> Result<IdentityWrite> {
        self.user_repo()
            .update_profile(id, username, email, school, phone)
            .await
    }

    pub async fn update_user_password(&self, id: i32, new_hash: String) -> Result<()> {
        self.user_repo().update_password(id, new_hash).await
    }

    pub async fn user_count(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ========== Listings ==========

    pub async fn list_listings(&self, filter: &ListingFilter) -> Result<Vec<ListingWithSeller>> {
        self.listing_repo().list(filter).await
    }

    pub async fn search_listings(&self, term: &str) -> Result<Vec<ListingWithSeller>> {
        self.listing_repo().search(term).await
    }

    pub async fn get_listing(&self, id: i32) -> Result<Option<ListingWithSeller>> {
        self.listing_repo().get(id).await
    }

    pub async fn listings_by_owner(&self, seller_id: i32) -> Result<Vec<ListingWithSeller>> {
        self.listing_repo().list_by_owner(seller_id).await
    }

    pub async fn listing_exists(&self, id: i32) -> Result<bool> {
        self.listing_repo().exists(id).await
    }

    pub async fn insert_listing(
        &self,
        seller_id: i32,
        fields: ListingFields,
    ) -> Result<ListingWithSeller> {
        self.listing_repo().insert(seller_id, fields).await
    }

    pub async fn update_listing(
        &self,
        id: i32,
        caller_id: i32,
        fields: ListingFields,
    ) -> Result<OwnedWrite<ListingWithSeller>> {
        self.listing_repo().update(id, caller_id, fields).await
    }

    pub async fn delete_listing(&self, id: i32, caller_id: i32) -> Result<OwnedWrite<()>> {
        self.listing_repo().delete(id, caller_id).await
    }

    // ========== Favorites ==========

    pub async fn favorites_for_user(&self, user_id: i32) -> Result<Vec<ListingWithSeller>> {
        self.favorite_repo().list_for_user(user_id).await
    }

    pub async fn add_favorite(&self, user_id: i32, listing_id: i32) -> Result<FavoriteAdd> {
        self.favorite_repo().add(user_id, listing_id).await
    }

    pub async fn remove_favorite(&self, user_id: i32, listing_id: i32) -> Result<bool> {
        self.favorite_repo().remove(user_id, listing_id).await
    }

    // ========== Comments ==========

    pub async fn comments_for_listing(&self, listing_id: i32) -> Result<Vec<CommentWithAuthor>> {
        self.comment_repo().list_for_listing(listing_id).await
    }

    pub async fn add_comment(
        &self,
        listing_id: i32,
        user_id: i32,
        content: String,
    ) -> Result<CommentWithAuthor> {
        self.comment_repo().add(listing_id, user_id, content).await
    }
}
