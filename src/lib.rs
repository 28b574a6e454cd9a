// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)        cmd::install (batch)
//!                |                     |
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '-------------+-------------'
//!                            v
//!                        pipeline
//!      normalize -> verify -> clone -> resolve -> bootstrap -> build
//!                 |          |                    |
//!                 v          v                    v
//!                net        git               toolchain
//!              reqwest   git CLI               go CLI
//!
//!   +-----------------------------------------+
//!   |  core        process spawning           |
//!   +-----------------------------------------+
//!   |  foundation  error, logging             |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod net;
pub mod pipeline;
pub mod toolchain;
