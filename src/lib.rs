pub mod configuration;
pub mod connectors;
pub mod db;
pub mod forms;
pub mod health;
pub mod helpers;
pub mod models;
pub mod routes;
pub mod services;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod views;
