//! Skincare consultation booking platform: quiz scoring, booking lifecycle,
//! consultant assignment, and post-completion feedback.
//!
//! The domain modules (`booking`, `quiz`, `feedback`) each expose a
//! repository trait, a service composing the business rules, and an axum
//! router. Storage adapters live with the binary so the services can be
//! exercised in isolation.

pub mod auth;
pub mod booking;
pub mod config;
pub mod directory;
pub mod error;
pub mod feedback;
pub mod quiz;
pub mod telemetry;
