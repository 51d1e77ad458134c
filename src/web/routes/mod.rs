pub mod admin_routes;
pub mod submission_routes;
