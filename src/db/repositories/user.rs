use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::entities::{prelude::*, users};

use super::is_unique_violation;

/// User data returned from the repository. The password hash never leaves
/// the storage layer except through the explicit credential paths below.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub school: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            school: model.school,
            phone: model.phone,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Fields for a new account. The hash is produced by the service layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub school: Option<String>,
    pub phone: Option<String>,
}

/// Outcome of a write that can collide with the unique username/email
/// indexes. The index is the authority; callers treat `Conflict` the same
/// whether it came from the pre-check or from the engine losing a race.
#[derive(Debug)]
pub enum IdentityWrite {
    Ok(User),
    Conflict,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, new_user: NewUser) -> Result<IdentityWrite> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            school: Set(new_user.school),
            phone: Set(new_user.phone),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let res = match Users::insert(active).exec(&self.conn).await {
            Ok(res) => res,
            Err(e) if is_unique_violation(&e) => return Ok(IdentityWrite::Conflict),
            Err(e) => return Err(e).context("Failed to insert user"),
        };

        let user = self
            .get_by_id(res.last_insert_id)
            .await?
            .context("Inserted user missing on re-read")?;

        Ok(IdentityWrite::Ok(user))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    /// Login path: user plus stored hash, looked up by email.
    pub async fn get_by_email_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    pub async fn password_hash_by_id(&self, id: i32) -> Result<Option<String>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        Ok(user.map(|u| u.password_hash))
    }

    /// Pre-check for a friendlier duplicate-identity message. Not a
    /// correctness mechanism; inserts still handle the constraint error.
    pub async fn identity_taken(
        &self,
        username: &str,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        let mut query = Users::find().filter(
            Condition::any()
                .add(users::Column::Username.eq(username))
                .add(users::Column::Email.eq(email)),
        );

        if let Some(id) = exclude_id {
            query = query.filter(users::Column::Id.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to check identity uniqueness")?;

        Ok(count > 0)
    }

    /// Overwrite the profile fields of an account.
    pub async fn update_profile(
        &self,
        id: i32,
        username: &str,
        email: &str,
        school: Option<String>,
        phone: Option<String>,
    ) -> Result<IdentityWrite> {
        let Some(user) = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for profile update")?
        else {
            anyhow::bail!("User not found: {id}");
        };

        let mut active: users::ActiveModel = user.into();
        active.username = Set(username.to_string());
        active.email = Set(email.to_string());
        active.school = Set(school);
        active.phone = Set(phone);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        match active.update(&self.conn).await {
            Ok(updated) => Ok(IdentityWrite::Ok(User::from(updated))),
            Err(e) if is_unique_violation(&e) => Ok(IdentityWrite::Conflict),
            Err(e) => Err(e).context("Failed to update profile"),
        }
    }

    pub async fn update_password(&self, id: i32, new_hash: String) -> Result<()> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        Users::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }
}
