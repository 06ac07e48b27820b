//! Quill - A small publishing platform
//!
//! This library provides the blog visibility rules, comment authorization,
//! like and view tracking, and the reader client for Quill.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
