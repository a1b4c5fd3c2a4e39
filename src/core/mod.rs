//! Core components of `riskpulse`.
//!
//! This module contains the foundational building blocks of the crate, including:
//! - The [`NewsClient`] and its builder.
//! - The primary [`RiskError`] type.
//! - Shared data models like [`RatingLabel`] and [`ProbabilityDistribution`].
//! - The [`SharedResource`] holder for lazily-loaded heavy state.
//! - Environment [`Settings`].

/// The news provider client (`NewsClient`) and builder.
pub mod client;
/// Environment-driven settings.
pub mod config;
/// The primary error type (`RiskError`) for the crate.
pub mod error;
/// Shared data models used across modules.
pub mod models;
/// Thread-safe initialize-once holder for heavy resources.
pub mod resource;

// convenient re-exports so most code can just `use crate::core::RiskError`
pub use client::{NewsClient, NewsClientBuilder};
pub use config::Settings;
pub use error::RiskError;
pub use models::{FeatureContribution, ProbabilityDistribution, RatingLabel};
pub use resource::SharedResource;
