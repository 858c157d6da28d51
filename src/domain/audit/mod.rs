pub mod entity;
pub mod service;

pub use service::{actions, AuditService};
