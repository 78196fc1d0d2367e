pub mod config;
pub mod invoke;
pub mod operations;
pub mod paginate;
pub mod token;
pub mod validate;
