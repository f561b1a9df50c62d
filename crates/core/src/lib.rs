pub mod errors;
pub mod models;
pub mod sessions;
pub mod stats;
