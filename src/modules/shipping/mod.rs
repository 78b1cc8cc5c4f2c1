pub mod dtos;
pub mod entities;
pub mod handlers;
pub mod infra;
pub mod matcher;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;
