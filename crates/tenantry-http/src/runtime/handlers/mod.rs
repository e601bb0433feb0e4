//! HTTP request handlers
//!
//! This module contains all the HTTP endpoint handlers organized by functionality.

pub mod health;
pub mod tasks;

pub use health::*;
pub use tasks::*;
