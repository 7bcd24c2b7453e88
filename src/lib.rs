pub mod audit;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod tally;
pub mod validate;
pub mod view;
