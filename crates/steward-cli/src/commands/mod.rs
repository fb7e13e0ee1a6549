pub mod crud;
pub mod config;
