//! Database models and queries

pub mod apps;
pub mod init;
pub mod models;

pub use apps::*;
pub use init::*;
pub use models::*;
