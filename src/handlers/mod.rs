pub mod auth_handler;
pub mod health_handler;
pub mod material_handler;
pub mod quiz_handler;
