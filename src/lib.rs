//! Sahayak - Offline-first dialogue orchestration engine
//!
//! This crate turns noisy, partial, multi-turn vendor utterances into a
//! consistent session context, decides between asking a targeted
//! question and forwarding to an external guidance backend, and keeps
//! all state durable and synchronizable across unreliable connectivity.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
