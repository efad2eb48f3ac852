pub mod audio;
pub mod auth;
pub mod llm;
pub mod menu;
pub mod observability;
pub mod persistence;
