mod content;
pub mod db;
mod documents;
pub mod models;
mod reviews;
mod tables;

pub use db::{Database, DatabaseError};
pub use tables::*;
