pub mod classes;
pub mod config;
pub mod symbols;
