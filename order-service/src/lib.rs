pub mod api;
pub mod coordinator;
pub mod error;
pub mod payment_client;
pub mod store;
