pub mod app;
pub mod apply;
pub mod components;
pub mod config;
