pub mod builder;
pub mod chain;
pub mod cli;
pub mod config;
pub mod logging;
pub mod precompress;
pub mod registry;
pub mod serve;
