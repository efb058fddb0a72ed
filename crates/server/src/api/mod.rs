pub mod auth;
pub mod catalog;
pub mod error;
pub mod favorites;
pub mod handlers;
pub mod middleware;
pub mod platforms;
pub mod reviews;
pub mod routes;

pub use error::ApiError;
pub use routes::create_router;
