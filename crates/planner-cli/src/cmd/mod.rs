pub mod init;
pub mod post;
pub mod serve;
pub mod user;
