//! Idempotent application configuration engine.
//!
//! Reads a declarative document naming applications and their desired
//! settings, makes each application's command available, and converges the
//! host towards the declared state through a per-application handler. Running
//! the same document twice changes nothing the second time.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: load YAML/JSON/TOML documents and expand placeholders
//! - **[`resources`]**: idempotent `check + apply` primitives (config keys, profile lines, JSON properties, …)
//! - **[`handlers`]**: per-application handlers and the static registry
//! - **[`engine`]**: dependency resolution, dispatch and outcome aggregation
//! - **[`commands`]**: top-level subcommand orchestration (`apply`, `list`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod handlers;
pub mod logging;
pub mod platform;
pub mod resources;
