/*
 * ucp - args.rs
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

//! Command line arguments.

use std::{io::Write, path::PathBuf};

use super::*;
use crate::conf::Settings;

#[derive(Debug, Default, StructOpt)]
#[structopt(
    name = "ucp",
    about = "generate codepoint to description maps from Unicode Character Database files"
)]
pub struct Opt {
    /// use specified configuration file
    #[structopt(short, long, parse(from_os_str), value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Unicode version to work on: `MAJOR[.MINOR[.PATCH]]` or `latest`.
    #[structopt(short = "u", long, value_name = "VERSION")]
    pub unicode_version: Option<String>,

    /// print supported Unicode versions, their emoji release and files.
    #[structopt(short, long, display_order = 1)]
    pub list: bool,

    /// print builtin matchset rules.
    #[structopt(long, display_order = 2)]
    pub list_builtins: bool,

    /// download upstream files into `<output-dir>/<version>/upstream`.
    #[structopt(short, long, display_order = 3)]
    pub download: bool,

    /// write `<version>.raw` and `<version>.map` under `<output-dir>/<version>`.
    #[structopt(short, long, display_order = 4)]
    pub generate: bool,

    /// remote root URL to download from, or a local directory to generate
    /// from.
    #[structopt(short, long, value_name = "URL")]
    pub root: Option<String>,

    /// comma separated rules selecting entries for the `.map` file, e.g.
    /// `_emoji_,-cat`. See `--list-builtins`.
    #[structopt(short, long, value_name = "EXPR", allow_hyphen_values = true)]
    pub matchset: Option<String>,

    /// local directory holding upstream files, or a single upstream file.
    #[structopt(short, long, parse(from_os_str), value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// directory for generated files. [default: codepoints]
    #[structopt(short, long, parse(from_os_str), value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// filter an existing `.raw` file instead of parsing upstream files.
    #[structopt(long, parse(from_os_str), value_name = "PATH")]
    pub raw: Option<PathBuf>,

    /// increase log verbosity, may be repeated.
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,
}

impl Opt {
    pub fn has_action(&self) -> bool {
        self.list || self.list_builtins || self.download || self.generate || self.raw.is_some()
    }

    /// Run every requested action in order: listings, download, generation.
    pub fn execute(&self, settings: &Settings) -> Result<()> {
        if !self.has_action() {
            return Err(Error::new("Nothing to do.")
                .set_details(
                    "Give at least one of --list, --list-builtins, --download, --generate or \
                     --raw. See --help.",
                )
                .set_kind(ErrorKind::Configuration));
        }
        let mut stdout = std::io::stdout().lock();
        if self.list {
            subcommands::list_versions(&mut stdout)?;
        }
        if self.list_builtins {
            subcommands::list_builtins(&mut stdout)?;
        }
        if self.download {
            for path in subcommands::download(settings)? {
                writeln!(stdout, "{}", path.display())?;
            }
        }
        if self.generate || self.raw.is_some() {
            let report = subcommands::generate(settings)?;
            writeln!(stdout, "{}", report)?;
        }
        Ok(())
    }
}
