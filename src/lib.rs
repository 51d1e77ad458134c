pub mod notifications;
pub mod server;
pub mod services;
pub mod store;
pub mod web;
