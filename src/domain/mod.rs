pub mod admin;
pub mod ai;
pub mod audit;
pub mod dream;
pub mod health;
pub mod user;
