pub mod app;
pub mod classify;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod view;
