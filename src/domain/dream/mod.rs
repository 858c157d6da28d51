pub mod dto;
pub mod entity;
pub mod handler;
pub mod language;
pub mod prompt;
pub mod service;
