//! StudyHub - A password-gated study resource portal
//!
//! Students sign in with a shared password to browse curated links; an admin
//! password unlocks editing the list.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
