//! API handlers module

pub mod analysis;
pub mod appraisals;
pub mod auth;
pub mod email;
pub mod fields;
pub mod health;
pub mod insights;
pub mod profile;
pub mod publications;
pub mod reports;
pub mod scrape;
pub mod users;
