//! Choice Sherpa - Interactive Decision Support Application
//!
//! This crate implements the PrOACT framework for structured decision making
//! through conversational AI guidance.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
