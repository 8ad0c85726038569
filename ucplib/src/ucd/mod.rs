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

//! Unicode Character Database sources: which files exist per release, how
//! their lines are parsed and how they are merged into one [`Mapping`].

pub mod grammar;
pub mod mapping;
pub mod targets;

use std::path::{Path, PathBuf};

pub use grammar::{LineParser, ParsedLine, Syntax};
pub use mapping::{CodepointEntry, Mapping, SourceKind};
pub use targets::{
    latest, lookup, EmojiRelease, FileKind, Location, Root, Target, UnicodeRelease,
    VersionIdentifier, VersionTargetSet, RELEASES,
};

/// Paths of generated artifacts under an output directory:
///
/// ```text
/// <out>/<version>/upstream/<file>
/// <out>/<version>/<version>.raw
/// <out>/<version>/<version>.map
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputLayout {
    pub root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn version_dir(&self, version: &VersionIdentifier) -> PathBuf {
        self.root.join(version.to_string())
    }

    /// Download cache, also the default local root for generation.
    pub fn upstream_dir(&self, version: &VersionIdentifier) -> PathBuf {
        self.version_dir(version).join("upstream")
    }

    pub fn raw_path(&self, version: &VersionIdentifier) -> PathBuf {
        self.version_dir(version).join(format!("{}.raw", version))
    }

    pub fn map_path(&self, version: &VersionIdentifier) -> PathBuf {
        self.version_dir(version).join(format!("{}.map", version))
    }
}
