pub mod app;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod session;
pub mod srs;
#[cfg(test)]
pub mod testing;
