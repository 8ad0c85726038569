/*
 * ucp - lib.rs
 *
 * Copyright 2026 ucp contributors
 *
 * This file is part of ucp.
 *
 * ucp is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * ucp is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with ucp. If not, see <http://www.gnu.org/licenses/>.
 */

#![deny(
    rustdoc::redundant_explicit_links,
    unsafe_op_in_unsafe_fn,
    /* groups */
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    /* restriction */
    clippy::dbg_macro,
    clippy::as_underscore,
    clippy::assertions_on_result_states,
    /* rustdoc */
    rustdoc::broken_intra_doc_links,
    /* pedantic */
    clippy::doc_markdown,
    clippy::expect_fun_call,
    clippy::or_fun_call,
    clippy::unnecessary_fallible_conversions,
)]

//! Command line frontend of `ucp`.
//!
//! Parsing, merging and filtering of the Unicode Character Database files is
//! done in the `ucplib` crate; this crate resolves command line arguments
//! and the optional configuration file into [`conf::Settings`] and runs the
//! requested actions in [`subcommands`].

pub use structopt::StructOpt;
pub use ucplib::{self, error::*, log, LogLevel, ShellExpandTrait, StderrLogger};

pub mod args;
pub mod conf;
pub mod subcommands;

#[macro_use]
extern crate serde_derive;
