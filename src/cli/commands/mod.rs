pub mod auth;
pub mod server;
pub mod subscription;
pub mod tenant;
pub mod user;
