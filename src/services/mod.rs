pub mod account_service;
pub use account_service::{AccountError, AccountService, AuthSession, ProfileInput, RegisterInput};

pub mod account_service_impl;
pub use account_service_impl::SeaOrmAccountService;

pub mod listing_service;
pub use listing_service::{Category, Condition, ListingError, ListingInput, ListingService};

pub mod listing_service_impl;
pub use listing_service_impl::SeaOrmListingService;
