#![deny(rust_2018_idioms)]

pub mod commands;
pub mod config;
pub mod consumer_config;
pub mod host;
pub mod permissions;
