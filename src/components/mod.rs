pub mod analytics;

pub mod config;

pub mod error;

pub mod export;

pub mod repl;

pub mod source;

pub mod store;
