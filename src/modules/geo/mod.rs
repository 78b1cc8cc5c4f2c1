pub mod cache;
pub mod google;
pub mod granularity;
pub mod provider;
pub mod resolver;
