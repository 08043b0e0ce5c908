pub mod auth;
pub mod data;
pub mod load;
pub mod messages;
pub mod practitioner;
pub mod sessions;
