//
// ucp - error module
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

//! An error object for `ucplib`

use std::{borrow::Cow, fmt, io, path::PathBuf, result, str, string, sync::Arc};

pub mod network;

pub use network::NetworkErrorKind;

pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ErrorKind {
    #[default]
    None,
    /// Invalid user input: unknown version, bad matchset, bad configuration
    /// file.
    Configuration,
    /// A value could not be interpreted.
    ValueError,
    /// A file or directory does not exist.
    NotFound,
    /// Any other I/O failure reported by the operating system.
    OSError,
    /// Platform specific failures, e.g. missing XDG directories.
    Platform,
    Network(NetworkErrorKind),
    NotSupported,
    Bug,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "{}",
            match self {
                Self::None => "",
                Self::Configuration => "Configuration",
                Self::ValueError => "Invalid value",
                Self::NotFound => "Not found",
                Self::OSError => "OS Error",
                Self::Platform => "Platform/Runtime environment error",
                Self::Network(ref inner) => inner.as_str(),
                Self::NotSupported => "Not supported",
                Self::Bug => "Bug, please report this!",
            }
        )
    }
}

impl ErrorKind {
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration)
    }

    pub const fn is_io(&self) -> bool {
        matches!(self, Self::NotFound | Self::OSError | Self::Platform)
    }
}

#[derive(Clone, Debug)]
pub struct Error {
    pub summary: Cow<'static, str>,
    pub details: Option<Cow<'static, str>>,
    pub source: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
    pub related_path: Option<PathBuf>,
    pub kind: ErrorKind,
}

pub trait IntoError {
    fn set_err_summary<M>(self, msg: M) -> Error
    where
        M: Into<Cow<'static, str>>;

    fn set_err_details<M>(self, msg: M) -> Error
    where
        M: Into<Cow<'static, str>>;

    fn set_err_kind(self, kind: ErrorKind) -> Error;
}

pub trait ResultIntoError<T> {
    fn chain_err_summary<M, F>(self, msg_fn: F) -> Result<T>
    where
        F: Fn() -> M,
        M: Into<Cow<'static, str>>;

    fn chain_err_details<M, F>(self, msg_fn: F) -> Result<T>
    where
        F: Fn() -> M,
        M: Into<Cow<'static, str>>;

    fn chain_err_related_path(self, p: &std::path::Path) -> Result<T>;

    fn chain_err_kind(self, kind: ErrorKind) -> Result<T>;
}

/// Wrap any error into an [`Error`] with the given summary, keeping the
/// original as its source.
pub trait WrapResultIntoError<T, I>
where
    I: Send + Sync + std::error::Error + 'static,
{
    fn wrap_err<M, F>(self, msg_fn: F) -> Result<T>
    where
        F: Fn() -> M,
        M: Into<Cow<'static, str>>;
}

impl<T, I> WrapResultIntoError<T, I> for std::result::Result<T, I>
where
    I: Send + Sync + std::error::Error + 'static,
{
    #[inline]
    fn wrap_err<M, F>(self, msg_fn: F) -> Result<T>
    where
        F: Fn() -> M,
        M: Into<Cow<'static, str>>,
    {
        self.map_err(|err| Error::new(msg_fn()).set_source(Some(Arc::new(err))))
    }
}

impl<I: Into<Error>> IntoError for I {
    #[inline]
    fn set_err_summary<M>(self, msg: M) -> Error
    where
        M: Into<Cow<'static, str>>,
    {
        let err: Error = self.into();
        err.set_summary(msg)
    }

    #[inline]
    fn set_err_details<M>(self, msg: M) -> Error
    where
        M: Into<Cow<'static, str>>,
    {
        let err: Error = self.into();
        err.set_details(msg)
    }

    #[inline]
    fn set_err_kind(self, kind: ErrorKind) -> Error {
        let err: Error = self.into();
        err.set_kind(kind)
    }
}

impl<T, I: Into<Error>> ResultIntoError<T> for std::result::Result<T, I> {
    #[inline]
    fn chain_err_summary<M, F>(self, msg_fn: F) -> Result<T>
    where
        F: Fn() -> M,
        M: Into<Cow<'static, str>>,
    {
        self.map_err(|err| err.set_err_summary(msg_fn()))
    }

    #[inline]
    fn chain_err_details<M, F>(self, msg_fn: F) -> Result<T>
    where
        F: Fn() -> M,
        M: Into<Cow<'static, str>>,
    {
        self.map_err(|err| err.set_err_details(msg_fn()))
    }

    #[inline]
    fn chain_err_related_path(self, p: &std::path::Path) -> Result<T> {
        self.map_err(|err| Into::<Error>::into(err).set_related_path(Some(p)))
    }

    #[inline]
    fn chain_err_kind(self, kind: ErrorKind) -> Result<T> {
        self.map_err(|err| err.set_err_kind(kind))
    }
}

impl Error {
    pub fn new<M>(msg: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self {
            summary: msg.into(),
            details: None,
            source: None,
            related_path: None,
            kind: ErrorKind::None,
        }
    }

    /// Replace the summary; the previous summary becomes part of the
    /// details.
    pub fn set_summary<M>(mut self, summary: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        let old = std::mem::replace(&mut self.summary, summary.into());
        self.details = Some(match self.details.take() {
            Some(details) => format!("{}\n{}", old, details).into(),
            None => old,
        });
        self
    }

    pub fn set_details<M>(mut self, details: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        if let Some(old_details) = self.details.as_ref() {
            self.details = Some(format!("{}. {}", old_details, details.into()).into());
        } else {
            self.details = Some(details.into());
        }
        self
    }

    pub fn set_source(
        mut self,
        new_val: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = new_val;
        self
    }

    pub fn set_kind(mut self, new_val: ErrorKind) -> Self {
        self.kind = new_val;
        self
    }

    pub fn set_related_path<P: Into<PathBuf>>(mut self, new_val: Option<P>) -> Self {
        self.related_path = new_val.map(Into::into);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;
        if let Some(details) = self.details.as_ref() {
            if !details.trim().is_empty() {
                writeln!(f, "{}", details)?;
            }
        }
        if let Some(ref path) = self.related_path {
            writeln!(f, "Related path: {}", path.display())?;
        }
        if let Some(ref source) = self.source {
            writeln!(f, "Caused by: {}", source)?;
        }
        if self.kind != ErrorKind::None {
            write!(f, "Error kind: {}", self.kind)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| &(*(*s)) as &(dyn std::error::Error + 'static))
    }
}

impl From<io::ErrorKind> for ErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::OSError,
        }
    }
}

impl From<io::Error> for Error {
    #[inline]
    fn from(err: io::Error) -> Self {
        let s = if let Some(raw_os_err) = err.raw_os_error() {
            format!("OS Error {}: {}", raw_os_err, err)
        } else {
            err.to_string()
        };
        Self::new(s)
            .set_kind(err.kind().into())
            .set_source(Some(Arc::new(err)))
    }
}

impl<'a> From<Cow<'a, str>> for Error {
    #[inline]
    fn from(err: Cow<'_, str>) -> Self {
        Self::new(err.to_string())
    }
}

impl From<string::FromUtf8Error> for Error {
    #[inline]
    fn from(err: string::FromUtf8Error) -> Self {
        Self::new(err.to_string())
            .set_kind(ErrorKind::ValueError)
            .set_source(Some(Arc::new(err)))
    }
}

impl From<str::Utf8Error> for Error {
    #[inline]
    fn from(err: str::Utf8Error) -> Self {
        Self::new(err.to_string())
            .set_kind(ErrorKind::ValueError)
            .set_source(Some(Arc::new(err)))
    }
}

impl From<std::num::ParseIntError> for Error {
    #[inline]
    fn from(err: std::num::ParseIntError) -> Self {
        Self::new(err.to_string())
            .set_kind(ErrorKind::ValueError)
            .set_source(Some(Arc::new(err)))
    }
}

impl From<regex::Error> for Error {
    #[inline]
    fn from(err: regex::Error) -> Self {
        Self::new("Could not compile regular expression")
            .set_details(err.to_string())
            .set_kind(ErrorKind::Configuration)
            .set_source(Some(Arc::new(err)))
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    #[inline]
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::new(err.to_string()).set_kind(ErrorKind::Bug)
    }
}

impl From<log::SetLoggerError> for Error {
    #[inline]
    fn from(err: log::SetLoggerError) -> Self {
        Self::new(err.to_string())
            .set_kind(ErrorKind::Bug)
            .set_source(Some(Arc::new(err)))
    }
}

#[cfg(feature = "http")]
impl From<isahc::Error> for Error {
    #[inline]
    fn from(err: isahc::Error) -> Self {
        let kind = NetworkErrorKind::from(err.kind());
        Self::new(err.to_string())
            .set_kind(ErrorKind::Network(kind))
            .set_source(Some(Arc::new(err)))
    }
}

#[cfg(feature = "http")]
impl From<isahc::http::Error> for Error {
    #[inline]
    fn from(err: isahc::http::Error) -> Self {
        Self::new(err.to_string())
            .set_kind(ErrorKind::Network(NetworkErrorKind::InvalidRequest))
            .set_source(Some(Arc::new(err)))
    }
}

impl From<Box<dyn std::error::Error + Sync + Send + 'static>> for Error {
    #[inline]
    fn from(err: Box<dyn std::error::Error + Sync + Send + 'static>) -> Self {
        Self::new(err.to_string()).set_source(Some(err.into()))
    }
}

impl From<&str> for Error {
    #[inline]
    fn from(err: &str) -> Self {
        Self::new(err.to_string())
    }
}

impl From<String> for Error {
    #[inline]
    fn from(err: String) -> Self {
        Self::new(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_chaining() {
        let res: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        let err = res
            .chain_err_summary(|| "Could not open UnicodeData.txt")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.kind.is_io());
        assert_eq!(err.summary, "Could not open UnicodeData.txt");
        assert_eq!(err.details.as_deref(), Some("no such file"));
        assert!(std::error::Error::source(&err).is_some());

        let err = Error::new("bad token").set_kind(ErrorKind::Configuration);
        let display = err.to_string();
        assert!(display.starts_with("bad token\n"));
        assert!(display.ends_with("Error kind: Configuration"));
    }
}
