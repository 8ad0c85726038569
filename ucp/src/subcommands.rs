/*
 * ucp - subcommands.rs
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

//! Actions requested on the command line.

use std::{
    fmt,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use ucplib::{
    matchset::{MatchRuleSet, BUILTINS},
    ucd::{FileKind, Mapping, Root, VersionTargetSet, RELEASES},
};

use super::*;
use crate::conf::Settings;

pub fn list_versions(out: &mut impl Write) -> Result<()> {
    for release in RELEASES {
        let emoji = release
            .emoji
            .map_or_else(|| "-".to_string(), |e| format!("emoji {}", e));
        let files = release
            .files()
            .map(FileKind::file_name)
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            out,
            "{:<8} {:<11} {}",
            release.version.to_string(),
            emoji,
            files
        )?;
    }
    Ok(())
}

pub fn list_builtins(out: &mut impl Write) -> Result<()> {
    for builtin in BUILTINS {
        writeln!(
            out,
            "{:<19} {:<11} {}\n{:<19} {}",
            builtin.name,
            builtin.field.to_string(),
            builtin.help,
            "",
            builtin.pattern
        )?;
    }
    Ok(())
}

/// Fetch every file of the selected release into its upstream directory.
#[cfg(feature = "http")]
pub fn download(settings: &Settings) -> Result<Vec<PathBuf>> {
    if !settings.root.is_remote() {
        return Err(Error::new(format!(
            "Cannot download from {}",
            settings.root
        ))
        .set_details("The root must be an http:// or https:// URL.")
        .set_kind(ErrorKind::Configuration));
    }
    let targets = VersionTargetSet::new(settings.release, &settings.root);
    let dir = settings.output.upstream_dir(&settings.release.version);
    log::info!(
        "downloading {} files of Unicode {} into {}",
        targets.len(),
        settings.release.version,
        dir.display()
    );
    ucplib::download::Downloader::new()?.fetch_targets(&targets, &dir)
}

#[cfg(not(feature = "http"))]
pub fn download(_settings: &Settings) -> Result<Vec<PathBuf>> {
    Err(Error::new(
        "This version of ucp was built without download support (cargo feature `http`).",
    )
    .set_kind(ErrorKind::NotSupported))
}

/// Files to parse: `--source` if given, else a local `--root`, else the
/// download cache of the release.
pub fn resolve_targets(settings: &Settings) -> Result<VersionTargetSet> {
    let release = settings.release;
    let dir = match (&settings.source, &settings.root) {
        (Some(path), _) if path.is_file() => {
            let kind = FileKind::from_path(path).ok_or_else(|| {
                Error::new(format!(
                    "Cannot tell what kind of file {} is",
                    path.display()
                ))
                .set_details(format!(
                    "Source files must keep their upstream name, one of: {}",
                    FileKind::ALL
                        .iter()
                        .map(|k| k.file_name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
                .set_kind(ErrorKind::Configuration)
            })?;
            return Ok(VersionTargetSet::single(release, kind, path.clone()));
        }
        (Some(dir), _) => dir.clone(),
        (None, Root::Local(dir)) => dir.clone(),
        (None, Root::Remote(_)) => settings.output.upstream_dir(&release.version),
    };
    if !dir.is_dir() {
        return Err(Error::new(format!(
            "Source directory {} does not exist",
            dir.display()
        ))
        .set_details("Download the upstream files with --download, or give --source.")
        .set_related_path(Some(&dir))
        .set_kind(ErrorKind::NotFound));
    }
    Ok(VersionTargetSet::new(release, &Root::Local(dir)))
}

#[derive(Clone, Debug)]
pub struct GenerateReport {
    pub raw: Option<(PathBuf, usize)>,
    pub map: (PathBuf, usize),
}

impl fmt::Display for GenerateReport {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if let Some((ref path, entries)) = self.raw {
            writeln!(fmt, "{}: {} entries", path.display(), entries)?;
        }
        write!(fmt, "{}: {} entries", self.map.0.display(), self.map.1)
    }
}

/// Build the mapping of the selected release (or read it from `--raw`),
/// then write the full and the filtered artifacts.
pub fn generate(settings: &Settings) -> Result<GenerateReport> {
    let rules = MatchRuleSet::parse(&settings.matchset)
        .chain_err_summary(|| format!("Invalid matchset `{}`", settings.matchset))?;
    let version = &settings.release.version;

    let (mapping, raw, map_path) = if let Some(ref raw_path) = settings.raw {
        let mapping = Mapping::read_raw_file(raw_path)?;
        log::info!("read {} entries from {}", mapping.len(), raw_path.display());
        (mapping, None, raw_path.with_extension("map"))
    } else {
        let targets = resolve_targets(settings)?;
        log::info!(
            "parsing {} files of Unicode {}",
            targets.len(),
            settings.release.version
        );
        let mapping = Mapping::build(&targets)?;
        let raw_path = settings.output.raw_path(version);
        write_artifact(&raw_path, |w| mapping.write_raw(w))?;
        let entries = mapping.len();
        (mapping, Some((raw_path, entries)), settings.output.map_path(version))
    };

    let filtered = rules.filter(&mapping);
    log::info!(
        "matchset `{}` selected {} of {} entries",
        rules,
        filtered.len(),
        mapping.len()
    );
    write_artifact(&map_path, |w| filtered.write_map(w))?;
    Ok(GenerateReport {
        raw,
        map: (map_path, filtered.len()),
    })
}

fn write_artifact<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .chain_err_summary(|| format!("Could not create directory {}", parent.display()))
            .chain_err_related_path(parent)?;
    }
    let file = File::create(path)
        .chain_err_summary(|| format!("Could not create {}", path.display()))
        .chain_err_related_path(path)?;
    write(&mut BufWriter::new(file))
        .chain_err_summary(|| format!("Could not write {}", path.display()))
        .chain_err_related_path(path)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use ucplib::ucd::{lookup, OutputLayout};

    use super::*;
    use crate::{args::Opt, conf::FileSettings};

    fn settings(output: &Path) -> Settings {
        let mut settings = Settings::new(&Opt::default(), FileSettings::default()).unwrap();
        settings.release = lookup("6.0").unwrap();
        settings.output = OutputLayout::new(output);
        settings
    }

    #[test]
    fn test_listings() {
        let mut out = vec![];
        list_versions(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), RELEASES.len());
        assert!(out.lines().next().unwrap().starts_with("5.2.0    -"));
        assert!(out.contains("6.0.0    emoji 1.0   UnicodeData.txt emoji-data.txt\n"));

        let mut out = vec![];
        list_builtins(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        for builtin in BUILTINS {
            assert!(out.contains(builtin.name));
        }
    }

    #[test]
    fn test_resolve_targets() {
        let tmp_dir = TempDir::new().unwrap();
        let mut settings = settings(tmp_dir.path());

        let err = resolve_targets(&settings).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let upstream = settings.output.upstream_dir(&settings.release.version);
        fs::create_dir_all(&upstream).unwrap();
        let targets = resolve_targets(&settings).unwrap();
        assert_eq!(targets.len(), 2);
        assert!(targets
            .targets()
            .all(|t| t.location.to_string().starts_with(&upstream.display().to_string())));

        let file = tmp_dir.path().join("emoji-data.txt");
        fs::write(&file, "").unwrap();
        settings.source = Some(file);
        let targets = resolve_targets(&settings).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(
            targets.targets().next().unwrap().kind,
            FileKind::EmojiData
        );

        let file = tmp_dir.path().join("NamesList.txt");
        fs::write(&file, "").unwrap();
        settings.source = Some(file);
        assert!(resolve_targets(&settings).unwrap_err().kind.is_configuration());
    }

    #[test]
    fn test_generate_from_raw() {
        let tmp_dir = TempDir::new().unwrap();
        let raw = tmp_dir.path().join("6.0.0.raw");
        fs::write(
            &raw,
            "0x41;latin-capital-letter-a;0\n0x1f600;grinning-face;0\n0x1f1e6 0x1f1e8;flag:-ascension-island;1\n",
        )
        .unwrap();
        let mut settings = settings(tmp_dir.path());
        settings.raw = Some(raw);
        let report = generate(&settings).unwrap();
        assert!(report.raw.is_none());
        assert_eq!(report.map, (tmp_dir.path().join("6.0.0.map"), 1));
        assert_eq!(
            fs::read_to_string(&report.map.0).unwrap(),
            "0x1f600;grinning-face\n"
        );

        settings.matchset = "_emoji_,".to_string();
        assert!(generate(&settings).unwrap_err().kind.is_configuration());
    }
}
