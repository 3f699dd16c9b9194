pub mod application;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetch;
pub mod http;
pub mod manifest;
pub mod resolver;
pub mod runtime;
pub mod version;
