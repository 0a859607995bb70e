// Common library shared between the API server and the upstream provider clients

pub mod clients;
pub mod config;
pub mod errors;
pub mod telemetry;
