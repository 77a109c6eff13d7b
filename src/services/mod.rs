pub mod auth;
pub mod greeting;
pub mod options;
pub mod request;
