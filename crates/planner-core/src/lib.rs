pub mod access;
pub mod config;
pub mod error;
pub mod io;
pub mod password;
pub mod paths;
pub mod post;
pub mod query;
pub mod roles;
pub mod state;
pub mod status;
pub mod types;
pub mod user;
pub mod workspace;

pub use error::{PlannerError, Result};
