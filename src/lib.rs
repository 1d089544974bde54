//! Pressnote - a news board with comments and a personal notes area
//!
//! This library provides the core functionality for the Pressnote web application.

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod web;
