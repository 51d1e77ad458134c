pub mod auth_service;
pub mod submission_service;
