pub mod admin;
pub mod analyze;
pub mod blacklist;
pub mod dashboard;
pub mod login;
pub mod not_found;
pub mod register;
