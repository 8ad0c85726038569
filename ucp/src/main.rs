/*
 * ucp - main.rs
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

//! Command line client binary.
//!
//! Argument and configuration handling lives here; UCD parsing and matchset
//! filtering is done in the `ucplib` crate.

use ucp::{args::*, conf, *};

fn main() {
    let opt = Opt::from_args();
    ::std::process::exit(match run_app(opt) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}", err);
            1
        }
    });
}

fn run_app(opt: Opt) -> Result<()> {
    if let Some(config_location) = opt.config.as_ref() {
        std::env::set_var(conf::CONFIG_ENV_VAR, config_location);
    }
    let settings = conf::Settings::new(&opt, conf::FileSettings::new()?)?;
    let logger = StderrLogger::new(settings.log_level);
    if let Some(ref log_file) = settings.log_file {
        logger.change_log_dest(log_file)?;
    }
    log::debug!("settings: {:?}", settings);
    opt.execute(&settings)
}
