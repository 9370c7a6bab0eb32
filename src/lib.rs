//! Barangay ID Verification
//!
//! This library provides the identity document check used by the barangay
//! portal's request forms: an uploaded ID image is read by a remote OCR proxy
//! (falling back to a local Tesseract engine) and tested for the deployment's
//! required locality before a resident may submit.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
