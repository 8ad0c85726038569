/*
 * ucp - conf.rs
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

//! Configuration file and the settings resolved from it and the command
//! line.
//!
//! The configuration file is looked up at, in order:
//!
//! - the path given with `--config`,
//! - `$UCP_CONFIG`,
//! - `$XDG_CONFIG_HOME/ucp/config.toml`.
//!
//! Only the last one may be missing. Every key is optional and command line
//! flags override it:
//!
//! ```toml
//! unicode_version = "15.1"
//! root = "https://www.unicode.org/Public"
//! matchset = "_emoji_,-_skin-tones_"
//! output_dir = "~/.cache/ucp"
//! log_level = "INFO"
//! log_file = "~/.cache/ucp/ucp.log"
//! ```

use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
};

use ucplib::{
    matchset::DEFAULT_MATCHSET,
    ucd::{lookup, OutputLayout, Root, UnicodeRelease},
};

use super::*;
use crate::args::Opt;

pub const CONFIG_ENV_VAR: &str = "UCP_CONFIG";
pub const DEFAULT_OUTPUT_DIR: &str = "codepoints";

/// Location of the configuration file, if there is one to read.
pub fn get_config_file() -> Result<Option<PathBuf>> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(Some(PathBuf::from(path).expand()));
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ucp")
        .wrap_err(|| "Could not detect XDG base directories")
        .chain_err_kind(ErrorKind::Platform)?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Contents of the configuration file.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub root: Option<String>,
    pub matchset: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub unicode_version: Option<String>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
}

impl FileSettings {
    /// Read the configuration file found by [`get_config_file`], or the
    /// defaults if there is none.
    pub fn new() -> Result<Self> {
        match get_config_file()? {
            Some(path) => Self::validate(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(path: &Path) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(
                Error::new("Given configuration path is empty.").set_kind(ErrorKind::Configuration)
            );
        }
        let s = std::fs::read_to_string(path)
            .chain_err_summary(|| format!("Could not read configuration file {}", path.display()))
            .chain_err_related_path(path)?;
        Self::validate_string(&s).chain_err_related_path(path)
    }

    pub fn validate_string(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|err| {
            Error::new("Config file contains errors")
                .set_source(Some(Arc::new(err)))
                .set_kind(ErrorKind::Configuration)
        })
    }
}

/// Everything an action needs, with command line flags taking precedence
/// over the configuration file.
#[derive(Clone, Debug)]
pub struct Settings {
    pub release: &'static UnicodeRelease,
    pub root: Root,
    pub matchset: String,
    pub source: Option<PathBuf>,
    pub raw: Option<PathBuf>,
    pub output: OutputLayout,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn new(opt: &Opt, file: FileSettings) -> Result<Self> {
        let FileSettings {
            root,
            matchset,
            output_dir,
            source,
            unicode_version,
            log_level,
            log_file,
        } = file;
        let version = opt
            .unicode_version
            .clone()
            .or(unicode_version)
            .unwrap_or_else(|| "latest".to_string());
        let release = lookup(&version)?;
        let root = opt
            .root
            .as_deref()
            .or(root.as_deref())
            .map(|r| match Root::from(r) {
                Root::Local(path) => Root::Local(path.expand()),
                remote => remote,
            })
            .unwrap_or_default();
        let expand = |p: PathBuf| p.expand();
        Ok(Self {
            release,
            root,
            matchset: opt
                .matchset
                .clone()
                .or(matchset)
                .unwrap_or_else(|| DEFAULT_MATCHSET.to_string()),
            source: opt.source.clone().or(source).map(expand),
            raw: opt.raw.clone().map(expand),
            output: OutputLayout::new(
                opt.output_dir
                    .clone()
                    .or(output_dir)
                    .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), expand),
            ),
            log_level: LogLevel::from_verbosity(log_level.unwrap_or_default(), opt.verbose),
            log_file: log_file.map(expand),
        })
    }
}

#[cfg(test)]
mod tests {
    use ucplib::ucd::latest;

    use super::*;

    #[test]
    fn test_config_parse() {
        let file = FileSettings::validate_string(
            r#"
unicode_version = "12.0"
root = "http://mirror.example.org/unicode/"
matchset = "_flags_"
output_dir = "/tmp/ucp-out"
log_level = "DEBUG"
"#,
        )
        .unwrap();
        assert_eq!(file.unicode_version.as_deref(), Some("12.0"));
        assert_eq!(file.log_level, Some(LogLevel::DEBUG));
        assert_eq!(file.source, None);

        assert_eq!(FileSettings::validate_string("").unwrap(), FileSettings::default());
    }

    #[test]
    fn test_config_unknown_keys() {
        let err = FileSettings::validate_string("match_set = \"_emoji_\"\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.source.is_some());
        let err = FileSettings::validate_string("log_level = \"LOUD\"\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_config_file() {
        let tmp_dir = tempfile::TempDir::new().unwrap();
        let path = tmp_dir.path().join("config.toml");
        std::fs::write(&path, "matchset = \"rocket\"\n").unwrap();
        assert_eq!(
            FileSettings::validate(&path).unwrap().matchset.as_deref(),
            Some("rocket")
        );
        let err = FileSettings::validate(&tmp_dir.path().join("missing.toml")).unwrap_err();
        assert!(err.kind.is_io(), "{}", err);
    }

    #[test]
    fn test_settings_precedence() {
        let file = FileSettings {
            root: Some("http://mirror.example.org/unicode/".to_string()),
            matchset: Some("_flags_".to_string()),
            unicode_version: Some("12.0".to_string()),
            log_level: Some(LogLevel::INFO),
            ..FileSettings::default()
        };

        let settings = Settings::new(&Opt::default(), file.clone()).unwrap();
        assert_eq!(settings.release.version.to_string(), "12.0.0");
        assert_eq!(
            settings.root,
            Root::Remote("http://mirror.example.org/unicode".to_string())
        );
        assert_eq!(settings.matchset, "_flags_");
        assert_eq!(settings.output.root, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(settings.log_level, LogLevel::INFO);

        let opt = Opt {
            unicode_version: Some("latest".to_string()),
            matchset: Some("-_zwj_,_all_".to_string()),
            root: Some("/srv/ucd".to_string()),
            verbose: 2,
            ..Opt::default()
        };
        let settings = Settings::new(&opt, file).unwrap();
        assert_eq!(settings.release, latest());
        assert_eq!(settings.matchset, "-_zwj_,_all_");
        assert_eq!(settings.root, Root::Local(PathBuf::from("/srv/ucd")));
        assert_eq!(settings.log_level, LogLevel::TRACE);

        let settings = Settings::new(&Opt::default(), FileSettings::default()).unwrap();
        assert_eq!(settings.matchset, DEFAULT_MATCHSET);
        assert_eq!(settings.root, Root::default());
        assert_eq!(settings.log_level, LogLevel::WARN);

        let opt = Opt {
            unicode_version: Some("4.0".to_string()),
            ..Opt::default()
        };
        let err = Settings::new(&opt, FileSettings::default()).unwrap_err();
        assert!(err.kind.is_configuration());
    }
}
