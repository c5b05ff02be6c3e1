// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod error;
pub mod host_store;
pub mod models;
pub mod poller;
pub mod routes;
