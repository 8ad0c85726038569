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


//! Fetch upstream files into the local cache.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use isahc::{
    config::{Configurable, RedirectPolicy},
    HttpClient, ReadResponseExt,
};

use crate::{
    error::{Error, ErrorKind, NetworkErrorKind, Result, ResultIntoError},
    ucd::{Location, VersionTargetSet},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct Downloader {
    client: HttpClient,
}

impl Downloader {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .redirect_policy(RedirectPolicy::Limit(10))
            .default_header(
                "User-Agent",
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )
            .build()?;
        Ok(Self { client })
    }

    /// Download `url` to `dest`, replacing any existing file. The body is
    /// written to a `.part` sibling first and renamed into place once
    /// complete. Returns the number of bytes written.
    pub fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        log::info!("fetching {}", url);
        let mut response = self
            .client
            .get(url)
            .chain_err_summary(|| format!("Could not fetch {}", url))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::new(format!("Could not fetch {}", url))
                .set_details(format!("Server replied with {}", status))
                .set_kind(ErrorKind::Network(NetworkErrorKind::from(status))));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .chain_err_summary(|| format!("Could not create {}", parent.display()))
                .chain_err_related_path(parent)?;
        }
        let part = part_path(dest);
        let written = (|| -> Result<u64> {
            let mut writer = BufWriter::new(File::create(&part)?);
            let written = response.copy_to(&mut writer)?;
            writer.flush()?;
            Ok(written)
        })()
        .chain_err_summary(|| format!("Could not write {}", dest.display()))
        .chain_err_related_path(&part);
        let written = match written {
            Ok(n) => n,
            Err(err) => {
                _ = fs::remove_file(&part);
                return Err(err);
            }
        };
        fs::rename(&part, dest).chain_err_related_path(dest)?;
        log::debug!("wrote {} bytes to {}", written, dest.display());
        Ok(written)
    }

    /// Download every remote target of `targets` into `dir`, flat. Returns
    /// the written paths in target order.
    pub fn fetch_targets(&self, targets: &VersionTargetSet, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut ret = Vec::with_capacity(targets.len());
        for target in targets.targets() {
            let Location::Url(ref url) = target.location else {
                return Err(Error::new(format!(
                    "{} is not a remote location",
                    target.location
                ))
                .set_details("Downloads need an http:// or https:// root.")
                .set_kind(ErrorKind::NotSupported));
            };
            let dest = dir.join(target.kind.file_name());
            self.fetch(url, &dest)?;
            ret.push(dest);
        }
        Ok(ret)
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ucd::{lookup, Root};

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("codepoints/15.1.0/upstream/UnicodeData.txt")),
            Path::new("codepoints/15.1.0/upstream/UnicodeData.txt.part")
        );
    }

    #[test]
    fn test_fetch_targets_requires_remote_root() {
        let tmp_dir = tempfile::TempDir::new().unwrap();
        let release = lookup("15.1").unwrap();
        let targets = VersionTargetSet::new(release, &Root::Local(tmp_dir.path().to_path_buf()));
        let err = Downloader::new()
            .unwrap()
            .fetch_targets(&targets, tmp_dir.path())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotSupported);
    }

    #[test]
    fn test_fetch_connection_refused() {
        let tmp_dir = tempfile::TempDir::new().unwrap();
        let dest = tmp_dir.path().join("UnicodeData.txt");
        let err = Downloader::with_timeout(Duration::from_secs(5))
            .unwrap()
            .fetch("http://127.0.0.1:1/UnicodeData.txt", &dest)
            .unwrap_err();
        assert!(err.kind.is_network(), "{}", err);
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }
}
