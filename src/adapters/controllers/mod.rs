pub mod entry_controller;
pub mod health_controller;
