pub mod services;

pub use services::status_service::StatusService;
