pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod loader;
pub mod map;
pub mod output;
pub mod record;
pub mod summary;
pub mod timestamp;
