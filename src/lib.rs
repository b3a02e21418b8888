pub mod actions;
pub mod audio;
pub mod behaviours;
pub mod compute;
pub mod config;
pub mod dialogue;
pub mod display;
pub mod engine;
pub mod entities;
pub mod error;
pub mod game;
pub mod levels;
pub mod rituals;
pub mod session;
pub mod shop;
