pub mod bootstrap;
pub mod config;
pub mod db;
pub mod modules;
pub mod routers;
pub mod shared;
