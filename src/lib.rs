// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod derive;
pub mod logging;
pub mod models;
pub mod routes;
pub mod runtime_client;
pub mod scheduler;
