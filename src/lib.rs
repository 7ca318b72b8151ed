//! A small MySQL connection wrapper.
//!
//! Opens a single connection, makes sure the users table exists, and offers
//! select/insert operations that log failures and report them as `false`.

pub mod config;
pub mod services;
