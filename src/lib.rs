//! TGMD-3 Inference Client
//!
//! This library is the client half of a motor-skill grading system: it
//! uploads a video or pre-extracted skeleton file to an out-of-process
//! inference backend, submits a grading job for one of the twelve TGMD-3
//! behaviors, and drives that job through its asynchronous lifecycle
//! (submission, status polling, result retrieval, terminal-state handling).
//! The backend itself is an opaque HTTP service; this crate owns only the
//! client side of the contract.

pub mod config;
pub mod models;
pub mod services;
