//! Wellbeing Survey: a conversational check-in survey and its collection service.

pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod submit;
pub mod surface;
pub mod survey;
