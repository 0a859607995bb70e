// Provisioning gateway API server

pub mod handlers;
pub mod routes;
pub mod state;
