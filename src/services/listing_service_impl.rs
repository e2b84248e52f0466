//! `SeaORM` implementation of the [`ListingService`] trait.

use async_trait::async_trait;

use crate::db::{ListingFields, ListingFilter, ListingWithSeller, OwnedWrite, Store};
use crate::services::listing_service::{
    Category, Condition, ListingError, ListingInput, ListingService,
};

pub struct SeaOrmListingService {
    store: Store,
}

impl SeaOrmListingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn validate(input: ListingInput) -> Result<ListingFields, ListingError> {
    if input.title.trim().is_empty() {
        return Err(ListingError::Validation("Title is required".to_string()));
    }

    if input.price <= 0 {
        return Err(ListingError::Validation(
            "Price must be a positive integer".to_string(),
        ));
    }

    let category: Category = input
        .category
        .parse()
        .map_err(|()| ListingError::Validation(format!("Invalid category: {}", input.category)))?;

    let condition: Condition = input.condition.parse().map_err(|()| {
        ListingError::Validation(format!("Invalid condition: {}", input.condition))
    })?;

    Ok(ListingFields {
        title: input.title,
        description: input.description,
        price: input.price,
        category: category.as_str().to_string(),
        condition: condition.as_str().to_string(),
        image: input.image,
    })
}

#[async_trait]
impl ListingService for SeaOrmListingService {
    async fn list(&self, filter: &ListingFilter) -> Result<Vec<ListingWithSeller>, ListingError> {
        Ok(self.store.list_listings(filter).await?)
    }

    async fn search(&self, term: &str) -> Result<Vec<ListingWithSeller>, ListingError> {
        Ok(self.store.search_listings(term).await?)
    }

    async fn get(&self, id: i32) -> Result<ListingWithSeller, ListingError> {
        self.store
            .get_listing(id)
            .await?
            .ok_or(ListingError::NotFound)
    }

    async fn list_by_owner(&self, seller_id: i32) -> Result<Vec<ListingWithSeller>, ListingError> {
        Ok(self.store.listings_by_owner(seller_id).await?)
    }

    async fn create(
        &self,
        caller_id: i32,
        input: ListingInput,
    ) -> Result<ListingWithSeller, ListingError> {
        let fields = validate(input)?;
        Ok(self.store.insert_listing(caller_id, fields).await?)
    }

    async fn update(
        &self,
        id: i32,
        caller_id: i32,
        input: ListingInput,
    ) -> Result<ListingWithSeller, ListingError> {
        let fields = validate(input)?;

        match self.store.update_listing(id, caller_id, fields).await? {
            OwnedWrite::Done(listing) => Ok(listing),
            OwnedWrite::NotFound => Err(ListingError::NotFound),
            OwnedWrite::Forbidden => Err(ListingError::Forbidden),
        }
    }

    async fn delete(&self, id: i32, caller_id: i32) -> Result<(), ListingError> {
        match self.store.delete_listing(id, caller_id).await? {
            OwnedWrite::Done(()) => Ok(()),
            OwnedWrite::NotFound => Err(ListingError::NotFound),
            OwnedWrite::Forbidden => Err(ListingError::Forbidden),
        }
    }
}
