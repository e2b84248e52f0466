pub mod prelude;

pub mod comments;
pub mod favorites;
pub mod listings;
pub mod users;
