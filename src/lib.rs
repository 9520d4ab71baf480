//! Integration SDK core
//!
//! Loads carrier and order-source plugin definitions into a sealed,
//! mutually-referential definition graph, and runs every plugin-supplied
//! business method through one pipeline that validates its input, invokes
//! it with a transaction, normalizes its errors, and validates its output.
//!
//! # Layout
//!
//! - `domain` - validation, reference registry, localization, definitions, values
//! - `ports` - the contract plugin methods implement
//! - `application` - invocation pipeline, method contracts, apps
//! - `adapters` - tracing setup
//! - `config` - typed configuration from the environment

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
