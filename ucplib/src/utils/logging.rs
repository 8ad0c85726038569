//
// ucp
//
// Copyright 2026 ucp contributors
//
// This file is part of ucp.
//
// ucp is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// ucp is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with ucp. If not, see <http://www.gnu.org/licenses/>.
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc, Mutex,
    },
};

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::{
    error::{ResultIntoError, Result},
    utils::shellexpand::ShellExpandTrait,
};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, PartialOrd, Serialize)]
#[repr(u8)]
pub enum LogLevel {
    OFF = 0,
    ERROR,
    #[default]
    WARN,
    INFO,
    DEBUG,
    TRACE,
}

impl From<u8> for LogLevel {
    fn from(verbosity: u8) -> Self {
        match verbosity {
            0 => Self::OFF,
            1 => Self::ERROR,
            2 => Self::WARN,
            3 => Self::INFO,
            4 => Self::DEBUG,
            _ => Self::TRACE,
        }
    }
}

impl LogLevel {
    /// Level for a number of `-v` flags given on the command line, counting up
    /// from `base`.
    pub fn from_verbosity(base: Self, occurrences: u8) -> Self {
        Self::from((base as u8).saturating_add(occurrences))
    }
}

impl From<LogLevel> for Level {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::ERROR => Self::Error,
            LogLevel::WARN => Self::Warn,
            LogLevel::OFF | LogLevel::INFO => Self::Info,
            LogLevel::DEBUG => Self::Debug,
            LogLevel::TRACE => Self::Trace,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::OFF => Self::Off,
            LogLevel::ERROR => Self::Error,
            LogLevel::WARN => Self::Warn,
            LogLevel::INFO => Self::Info,
            LogLevel::DEBUG => Self::Debug,
            LogLevel::TRACE => Self::Trace,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                OFF => "OFF",
                ERROR => "ERROR",
                WARN => "WARN",
                INFO => "INFO",
                DEBUG => "DEBUG",
                TRACE => "TRACE",
            }
        )
    }
}

use LogLevel::*;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, PartialOrd, Serialize)]
pub enum Destination {
    #[default]
    Stderr,
    None,
}

struct FileOutput {
    writer: BufWriter<std::fs::File>,
    path: PathBuf,
}

#[derive(Clone)]
pub struct StderrLogger {
    dest: Arc<Mutex<Option<FileOutput>>>,
    level: Arc<AtomicU8>,
    print_level: bool,
    print_module_names: bool,
    debug_dest: Destination,
}

impl std::fmt::Debug for StderrLogger {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.debug_struct(stringify!(StderrLogger))
            .field("level", &LogLevel::from(self.level.load(Ordering::SeqCst)))
            .field("print_level", &self.print_level)
            .field("print_module_names", &self.print_module_names)
            .field("debug_dest", &self.debug_dest)
            .finish()
    }
}

impl Default for StderrLogger {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl StderrLogger {
    /// Create a logger writing to stderr and install it as the global `log`
    /// logger. Only the first logger created in a process is installed; later
    /// ones share nothing with it.
    pub fn new(level: LogLevel) -> Self {
        use std::sync::Once;

        static INIT_STDERR_LOGGING: Once = Once::new();

        let logger = Self {
            dest: Arc::new(Mutex::new(None)),
            level: Arc::new(AtomicU8::new(level as u8)),
            print_level: true,
            print_module_names: cfg!(feature = "debug-tracing"),
            debug_dest: if std::env::var("UCP_DEBUG_STDERR").is_ok() {
                Destination::Stderr
            } else {
                Destination::None
            },
        };

        #[cfg(feature = "debug-tracing")]
        log::set_max_level(
            if matches!(LevelFilter::from(logger.log_level()), LevelFilter::Off) {
                LevelFilter::Off
            } else {
                LevelFilter::Trace
            },
        );
        #[cfg(not(feature = "debug-tracing"))]
        log::set_max_level(LevelFilter::from(logger.log_level()));

        INIT_STDERR_LOGGING.call_once(|| {
            // Fails only if another logger was installed by the embedding
            // program; keep theirs.
            _ = log::set_boxed_logger(Box::new(logger.clone()));
        });
        logger
    }

    pub fn log_level(&self) -> LogLevel {
        self.level.load(Ordering::SeqCst).into()
    }

    /// Additionally append log records to the file at `path`.
    pub fn change_log_dest(&self, path: &Path) -> Result<()> {
        let path = path.expand();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .chain_err_summary(|| format!("Could not open log file {}", path.display()))?;
        let mut dest = self.dest.lock()?;
        *dest = Some(FileOutput {
            writer: BufWriter::new(file),
            path,
        });
        Ok(())
    }

    pub fn log_dest(&self) -> Option<PathBuf> {
        self.dest
            .lock()
            .ok()
            .and_then(|d| d.as_ref().map(|d| d.path.clone()))
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        !["curl", "isahc", "polling", "async_io"]
            .iter()
            .any(|t| metadata.target().starts_with(t))
            && (metadata.level() <= Level::from(self.log_level())
                || !matches!(self.debug_dest, Destination::None))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) || self.log_level() == OFF {
            return;
        }

        fn write(
            writer: &mut impl Write,
            record: &Record,
            (print_level, print_module_names): (bool, bool),
        ) -> Option<()> {
            writer
                .write_all(
                    chrono::Local::now()
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string()
                        .as_bytes(),
                )
                .ok()?;
            writer.write_all(b" [").ok()?;
            if print_level {
                writer
                    .write_all(record.level().to_string().as_bytes())
                    .ok()?;
            }
            write!(writer, "]: ").ok()?;
            if print_module_names {
                write!(writer, "{}: ", record.metadata().target()).ok()?;
            }
            write!(writer, "{}", record.args()).ok()?;
            writer.write_all(b"\n").ok()?;
            writer.flush().ok()?;
            Some(())
        }

        let flags = (self.print_level, self.print_module_names);
        _ = self
            .dest
            .lock()
            .ok()
            .and_then(|mut d| d.as_mut().and_then(|d| write(&mut d.writer, record, flags)));
        if record.metadata().level() <= Level::from(self.log_level())
            || matches!(self.debug_dest, Destination::Stderr)
        {
            _ = write(&mut std::io::stderr(), record, flags);
        }
    }

    fn flush(&self) {
        self.dest
            .lock()
            .ok()
            .and_then(|mut w| w.as_mut().and_then(|w| w.writer.flush().ok()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(LogLevel::from_verbosity(LogLevel::WARN, 0), LogLevel::WARN);
        assert_eq!(LogLevel::from_verbosity(LogLevel::WARN, 1), LogLevel::INFO);
        assert_eq!(LogLevel::from_verbosity(LogLevel::WARN, 2), LogLevel::DEBUG);
        assert_eq!(LogLevel::from_verbosity(LogLevel::WARN, 9), LogLevel::TRACE);
        assert_eq!(
            LogLevel::from_verbosity(LogLevel::INFO, u8::MAX),
            LogLevel::TRACE
        );
        assert_eq!(LevelFilter::from(LogLevel::OFF), LevelFilter::Off);
    }

    #[test]
    fn test_log_file_destination() {
        let tmp_dir = tempfile::TempDir::new().unwrap();
        let path = tmp_dir.path().join("ucp.log");
        let logger = StderrLogger::new(LogLevel::INFO);
        logger.change_log_dest(&path).unwrap();
        assert_eq!(logger.log_dest().as_deref(), Some(path.as_path()));
        logger.log(
            &Record::builder()
                .args(format_args!("parsed {} lines", 42))
                .level(Level::Info)
                .target("ucplib::ucd")
                .build(),
        );
        logger.flush();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[INFO]: "), "{contents}");
        assert!(contents.trim_end().ends_with("parsed 42 lines"), "{contents}");
    }
}
