// Library exports for classfolio
// This allows integration tests and the binary to share modules

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod mail;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
