pub mod auth_service;
pub mod content_generator;
pub mod project_service;
