pub mod configuration;
pub mod contract;
pub mod domain;
pub mod petstore_client;
pub mod telemetry;
