//! Aleator - Personal Decision Randomizer
//!
//! Users define decisions (binary yes/no with a probability, or weighted
//! multi-choice), the service draws weighted random outcomes, enforces
//! cooldowns, and records whether the user followed through.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
