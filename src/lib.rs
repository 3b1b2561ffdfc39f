// repo-fleet: branch-based bulk changes across git repositories
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
//!             cli (clap)          cmd (handlers)
//!                |       repos / release / exec / pr
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |       orchestrator        |
//!              |  group, acquire, guard,   |
//!              |  transform, reconcile     |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!              units         git     github
//!          lists, filter  handle,   REST client,
//!          descriptors    guard,    reconcile,
//!                         summary   merge
//!
//!   registry: image references and the TagSource collaborator
//!   used by tag-update transformations
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging, config    |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod logging;
pub mod orchestrator;
pub mod registry;
pub mod units;
