pub mod audit;
pub mod browse;
pub mod classify;
pub mod config;
pub mod host;
pub mod paths;
pub mod record;
pub mod retention;
pub mod scheduler;
pub mod service;
pub mod sweep;
pub mod tracker;
pub mod util;
pub mod warn;
pub mod writer;

#[cfg(test)]
pub(crate) mod fake_host;
