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

//! Which upstream files make up each supported Unicode release, and where
//! to find them.
//!
//! A [`VersionTargetSet`] is resolved against a [`Root`], which is either a
//! remote URL prefix laid out like `https://www.unicode.org/Public` or a local
//! directory holding the files side by side (see
//! [`OutputLayout::upstream_dir`](super::OutputLayout::upstream_dir)).

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Result};

pub const DEFAULT_ROOT_URL: &str = "https://www.unicode.org/Public";

/// The kinds of upstream files understood by the line parser.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum FileKind {
    UnicodeData,
    EmojiData,
    EmojiSequences,
    EmojiZwjSequences,
    EmojiVariationSequences,
}

impl FileKind {
    pub const ALL: [Self; 5] = [
        Self::UnicodeData,
        Self::EmojiData,
        Self::EmojiSequences,
        Self::EmojiZwjSequences,
        Self::EmojiVariationSequences,
    ];

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::UnicodeData => "UnicodeData.txt",
            Self::EmojiData => "emoji-data.txt",
            Self::EmojiSequences => "emoji-sequences.txt",
            Self::EmojiZwjSequences => "emoji-zwj-sequences.txt",
            Self::EmojiVariationSequences => "emoji-variation-sequences.txt",
        }
    }

    pub const fn is_emoji(self) -> bool {
        !matches!(self, Self::UnicodeData)
    }

    /// Guess the kind of a file from its name, ignoring any directory
    /// components.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|k| k.file_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.file_name())
    }
}

/// A Unicode version, `MAJOR.MINOR.PATCH`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VersionIdentifier {
    major: u8,
    minor: u8,
    patch: u8,
}

impl VersionIdentifier {
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub const fn major(&self) -> u8 {
        self.major
    }

    pub const fn minor(&self) -> u8 {
        self.minor
    }

    pub const fn patch(&self) -> u8 {
        self.patch
    }
}

impl fmt::Display for VersionIdentifier {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for VersionIdentifier {
    type Err = Error;

    /// Accepts `MAJOR`, `MAJOR.MINOR` and `MAJOR.MINOR.PATCH`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::new(format!("Invalid Unicode version identifier `{}`", s))
                .set_details("Expected MAJOR, MAJOR.MINOR or MAJOR.MINOR.PATCH, e.g. `15.1`.")
                .set_kind(ErrorKind::Configuration)
        };
        let mut parts = [0_u8; 3];
        let mut count = 0;
        for part in s.trim().split('.') {
            if count == parts.len() || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(invalid());
            }
            parts[count] = part.parse().map_err(|_| invalid())?;
            count += 1;
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

/// An Unicode emoji data release, `MAJOR.MINOR`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EmojiRelease {
    major: u8,
    minor: u8,
}

impl EmojiRelease {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    pub const fn major(&self) -> u8 {
        self.major
    }

    /// Emoji files present in this release.
    pub fn files(&self) -> &'static [FileKind] {
        use FileKind::*;
        match self.major {
            0 | 1 => &[EmojiData],
            2 | 3 => &[EmojiData, EmojiSequences, EmojiZwjSequences],
            _ => &[
                EmojiData,
                EmojiSequences,
                EmojiZwjSequences,
                EmojiVariationSequences,
            ],
        }
    }

    /// Starting with 13.0 `emoji-data.txt` and `emoji-variation-sequences.txt`
    /// are published inside the UCD directory instead of `emoji/`.
    pub const fn in_ucd_dir(&self, kind: FileKind) -> bool {
        self.major >= 13
            && matches!(
                kind,
                FileKind::EmojiData | FileKind::EmojiVariationSequences
            )
    }
}

impl fmt::Display for EmojiRelease {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}.{}", self.major, self.minor)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnicodeRelease {
    pub version: VersionIdentifier,
    pub emoji: Option<EmojiRelease>,
}

impl UnicodeRelease {
    const fn new(version: VersionIdentifier, emoji: Option<EmojiRelease>) -> Self {
        Self { version, emoji }
    }

    pub fn files(&self) -> impl Iterator<Item = FileKind> + '_ {
        std::iter::once(FileKind::UnicodeData)
            .chain(self.emoji.iter().flat_map(|e| e.files().iter().copied()))
    }
}

const fn v(major: u8, minor: u8, patch: u8) -> VersionIdentifier {
    VersionIdentifier::new(major, minor, patch)
}

const fn e(major: u8, minor: u8) -> Option<EmojiRelease> {
    Some(EmojiRelease::new(major, minor))
}

/// Every supported release in ascending order.
pub const RELEASES: &[UnicodeRelease] = &[
    UnicodeRelease::new(v(5, 2, 0), None),
    UnicodeRelease::new(v(6, 0, 0), e(1, 0)),
    UnicodeRelease::new(v(7, 0, 0), e(2, 0)),
    UnicodeRelease::new(v(8, 0, 0), e(3, 0)),
    UnicodeRelease::new(v(9, 0, 0), e(4, 0)),
    UnicodeRelease::new(v(10, 0, 0), e(5, 0)),
    UnicodeRelease::new(v(11, 0, 0), e(11, 0)),
    UnicodeRelease::new(v(12, 0, 0), e(12, 0)),
    UnicodeRelease::new(v(12, 1, 0), e(12, 1)),
    UnicodeRelease::new(v(13, 0, 0), e(13, 0)),
    UnicodeRelease::new(v(14, 0, 0), e(14, 0)),
    UnicodeRelease::new(v(15, 0, 0), e(15, 0)),
    UnicodeRelease::new(v(15, 1, 0), e(15, 1)),
    UnicodeRelease::new(v(16, 0, 0), e(16, 0)),
];

pub fn latest() -> &'static UnicodeRelease {
    &RELEASES[RELEASES.len() - 1]
}

/// Find a supported release by identifier. `latest` selects the newest one.
pub fn lookup(version: &str) -> Result<&'static UnicodeRelease> {
    if version.trim().eq_ignore_ascii_case("latest") {
        return Ok(latest());
    }
    let id: VersionIdentifier = version.parse()?;
    RELEASES.iter().find(|r| r.version == id).ok_or_else(|| {
        Error::new(format!("Unsupported Unicode version `{}`", version.trim()))
            .set_details(format!(
                "Supported versions: {}",
                RELEASES
                    .iter()
                    .map(|r| r.version.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
            .set_kind(ErrorKind::Configuration)
    })
}

/// Where upstream files are read from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Root {
    Remote(String),
    Local(PathBuf),
}

impl Root {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl Default for Root {
    fn default() -> Self {
        Self::Remote(DEFAULT_ROOT_URL.to_string())
    }
}

impl From<&str> for Root {
    fn from(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Remote(s.trim_end_matches('/').to_string())
        } else {
            Self::Local(PathBuf::from(s))
        }
    }
}

impl fmt::Display for Root {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(fmt, "{}", url),
            Self::Local(path) => write!(fmt, "{}", path.display()),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Location {
    Url(String),
    Path(PathBuf),
}

impl fmt::Display for Location {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Url(url) => write!(fmt, "{}", url),
            Self::Path(path) => write!(fmt, "{}", path.display()),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Target {
    pub kind: FileKind,
    pub location: Location,
}

/// All files of one release, grouped by logical name (`unicode-15.1.0`,
/// `emoji-15.1`). The base UnicodeData group always comes first.
#[derive(Clone, Debug)]
pub struct VersionTargetSet {
    pub release: UnicodeRelease,
    pub groups: IndexMap<String, Vec<Target>>,
}

impl VersionTargetSet {
    pub fn new(release: &UnicodeRelease, root: &Root) -> Self {
        let locate = |kind: FileKind| -> Location {
            match root {
                Root::Local(dir) => Location::Path(dir.join(kind.file_name())),
                Root::Remote(url) => Location::Url(match release.emoji {
                    Some(emoji) if kind.is_emoji() && !emoji.in_ucd_dir(kind) => {
                        format!("{}/emoji/{}/{}", url, emoji, kind.file_name())
                    }
                    Some(_) if kind.is_emoji() => format!(
                        "{}/{}/ucd/emoji/{}",
                        url,
                        release.version,
                        kind.file_name()
                    ),
                    _ => format!("{}/{}/ucd/{}", url, release.version, kind.file_name()),
                }),
            }
        };
        let mut groups = IndexMap::new();
        groups.insert(
            format!("unicode-{}", release.version),
            vec![Target {
                kind: FileKind::UnicodeData,
                location: locate(FileKind::UnicodeData),
            }],
        );
        if let Some(emoji) = release.emoji {
            groups.insert(
                format!("emoji-{}", emoji),
                emoji
                    .files()
                    .iter()
                    .map(|&kind| Target {
                        kind,
                        location: locate(kind),
                    })
                    .collect(),
            );
        }
        Self {
            release: *release,
            groups,
        }
    }

    /// A set made of a single local file.
    pub fn single(release: &UnicodeRelease, kind: FileKind, path: PathBuf) -> Self {
        let mut groups = IndexMap::new();
        groups.insert(
            format!("file-{}", kind.file_name()),
            vec![Target {
                kind,
                location: Location::Path(path),
            }],
        );
        Self {
            release: *release,
            groups,
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.groups.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_release_has_targets() {
        for release in RELEASES {
            for root in [Root::default(), Root::Local(PathBuf::from("/tmp/upstream"))] {
                let set = VersionTargetSet::new(release, &root);
                assert!(!set.is_empty());
                assert_eq!(
                    set.targets().next().map(|t| t.kind),
                    Some(FileKind::UnicodeData)
                );
                for target in set.targets() {
                    assert!(FileKind::ALL.contains(&target.kind));
                }
            }
        }
        let mut sorted = RELEASES.to_vec();
        sorted.sort_by_key(|r| r.version);
        assert_eq!(sorted, RELEASES);
    }

    #[test]
    fn test_emoji_file_composition() {
        let kinds = |v: &str| lookup(v).unwrap().files().collect::<Vec<_>>();
        assert_eq!(kinds("5.2"), vec![FileKind::UnicodeData]);
        assert_eq!(kinds("6"), vec![FileKind::UnicodeData, FileKind::EmojiData]);
        assert_eq!(
            kinds("8.0.0"),
            vec![
                FileKind::UnicodeData,
                FileKind::EmojiData,
                FileKind::EmojiSequences,
                FileKind::EmojiZwjSequences
            ]
        );
        assert_eq!(kinds("9").len(), 5);
        assert_eq!(kinds("latest").len(), 5);
        assert_eq!(lookup("10").unwrap().emoji, Some(EmojiRelease::new(5, 0)));
        assert_eq!(lookup("12.1").unwrap().emoji, Some(EmojiRelease::new(12, 1)));
    }

    #[test]
    fn test_unsupported_versions() {
        for v in ["4.1", "99", "12.2", "12.0.0.0", "twelve", "", "12..1"] {
            let err = lookup(v).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Configuration, "{v}");
        }
    }

    #[test]
    fn test_remote_locations() {
        let set = VersionTargetSet::new(lookup("12.0").unwrap(), &Root::default());
        let urls = set
            .targets()
            .map(|t| t.location.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            urls,
            [
                "https://www.unicode.org/Public/12.0.0/ucd/UnicodeData.txt",
                "https://www.unicode.org/Public/emoji/12.0/emoji-data.txt",
                "https://www.unicode.org/Public/emoji/12.0/emoji-sequences.txt",
                "https://www.unicode.org/Public/emoji/12.0/emoji-zwj-sequences.txt",
                "https://www.unicode.org/Public/emoji/12.0/emoji-variation-sequences.txt",
            ]
        );
        assert_eq!(
            set.groups.keys().collect::<Vec<_>>(),
            ["unicode-12.0.0", "emoji-12.0"]
        );

        let set = VersionTargetSet::new(lookup("15.1").unwrap(), &Root::from("http://mirror/"));
        let urls = set
            .targets()
            .map(|t| t.location.to_string())
            .collect::<Vec<_>>();
        assert_eq!(urls[1], "http://mirror/15.1.0/ucd/emoji/emoji-data.txt");
        assert_eq!(urls[2], "http://mirror/emoji/15.1/emoji-sequences.txt");
        assert_eq!(
            urls[4],
            "http://mirror/15.1.0/ucd/emoji/emoji-variation-sequences.txt"
        );
    }

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(
            FileKind::from_path(Path::new("/a/b/UnicodeData.txt")),
            Some(FileKind::UnicodeData)
        );
        assert_eq!(
            FileKind::from_path(Path::new("emoji-zwj-sequences.txt")),
            Some(FileKind::EmojiZwjSequences)
        );
        assert_eq!(FileKind::from_path(Path::new("NamesList.txt")), None);
    }
}
