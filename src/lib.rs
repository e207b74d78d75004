pub mod app;
pub mod book;
pub mod command;
pub mod config;
pub mod diary;
pub mod error;
pub mod event;
pub mod input;
pub mod logging;
pub mod media;
pub mod ui;
