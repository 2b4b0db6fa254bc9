#![cfg_attr(not(test), forbid(unsafe_code))]

//! Wire models and configuration shared by the Expensa web and terminal clients.

pub mod config;
pub mod models;
