pub mod agenda;
pub mod config;
pub mod events;
pub mod grid;
pub mod provider;
pub mod selection;
pub mod ui;
pub mod view;
