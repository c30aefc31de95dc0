pub mod auth;
pub mod calendar;
pub mod posts;
pub mod tasks;
pub mod users;
