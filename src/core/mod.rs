//! # Core Application Logic
//!
//! This module contains Flowchat's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • App (chat state)     │
//!                    │  • Action / Effect      │
//!                    │  • update() (reducer)   │
//!                    │  • MessageStore         │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │    Flow    │
//!           │  Adapter   │              │   Client   │
//!           │ (ratatui)  │              │ (reqwest)  │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all chat state in one place
//! - [`action`]: The `Action` enum and the `update` reducer
//! - [`message`]: Append-only message store and response-time formatting
//! - [`config`]: Config file, env and CLI resolution
//! - [`i18n`]: Turkish/English phrase tables

pub mod action;
pub mod config;
pub mod i18n;
pub mod message;
pub mod state;
