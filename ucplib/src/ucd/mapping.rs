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

//! Codepoint to description mappings.
//!
//! Keys are canonical codepoint strings: every codepoint is written as
//! lowercase `0x`-prefixed hex without padding, and sequences are joined
//! with a single space (`0x1f468 0x200d 0x1f469`).
//!
//! Insertion is first writer wins: once a key is present neither its
//! description nor its [`SourceKind`] changes. UnicodeData is always read
//! before the emoji files, so its names take precedence.

use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use indexmap::IndexMap;

use super::{
    grammar::{LineParser, ParsedLine, RangeBoundary, MAX_CODEPOINT},
    targets::{EmojiRelease, FileKind, Location, VersionTargetSet},
};
use crate::error::{Error, ErrorKind, Result, ResultIntoError};

/// Which family of files an entry came from. Serialized as `0`/`1`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum SourceKind {
    Unicode = 0,
    Emoji = 1,
}

impl From<FileKind> for SourceKind {
    fn from(kind: FileKind) -> Self {
        if kind.is_emoji() {
            Self::Emoji
        } else {
            Self::Unicode
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", *self as u8)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CodepointEntry {
    pub codepoints: Vec<u32>,
    pub description: String,
    pub kind: SourceKind,
}

impl CodepointEntry {
    pub fn new(codepoints: Vec<u32>, description: &str, kind: SourceKind) -> Self {
        Self {
            codepoints,
            description: normalize_description(description),
            kind,
        }
    }

    pub fn key(&self) -> String {
        canonical_key(&self.codepoints)
    }
}

pub fn canonical_key(codepoints: &[u32]) -> String {
    codepoints
        .iter()
        .map(|c| format!("{:#x}", c))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase, with spaces turned into hyphens.
pub fn normalize_description(description: &str) -> String {
    description.trim().to_lowercase().replace(' ', "-")
}

fn parse_key(key: &str) -> Option<Vec<u32>> {
    let codepoints = key
        .split(' ')
        .map(|c| {
            c.strip_prefix("0x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        })
        .collect::<Option<Vec<u32>>>()?;
    (!codepoints.is_empty()).then_some(codepoints)
}

#[derive(Clone, Debug, Default)]
pub struct Mapping {
    entries: IndexMap<String, CodepointEntry>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every target of `targets`, base UnicodeData first. All targets
    /// must be local files.
    pub fn build(targets: &VersionTargetSet) -> Result<Self> {
        let mut ret = Self::new();
        for (group, files) in &targets.groups {
            for target in files {
                let path = match target.location {
                    Location::Path(ref path) => path,
                    Location::Url(ref url) => {
                        return Err(Error::new(format!(
                            "{} has not been downloaded yet",
                            target.kind
                        ))
                        .set_details(format!(
                            "Fetch {} first, or point the source to a local directory.",
                            url
                        ))
                        .set_kind(ErrorKind::NotSupported));
                    }
                };
                let added = ret
                    .extend_from_file(path, target.kind, targets.release.emoji)
                    .chain_err_summary(|| {
                        format!(
                            "Could not read {} of {} for Unicode {}",
                            target.kind, group, targets.release.version
                        )
                    })?;
                log::info!("{}: {} new entries from {}", group, added, path.display());
            }
        }
        Ok(ret)
    }

    pub fn extend_from_file(
        &mut self,
        path: &Path,
        kind: FileKind,
        emoji: Option<EmojiRelease>,
    ) -> Result<usize> {
        if !path.is_file() {
            return Err(Error::new(format!("Missing target file {}", path.display()))
                .set_related_path(Some(path))
                .set_kind(ErrorKind::NotFound));
        }
        let file = File::open(path).chain_err_related_path(path)?;
        let parser = LineParser::new(kind, emoji)?;
        log::debug!(
            "parsing {} with {:?} grammar",
            path.display(),
            parser.syntax()
        );
        self.extend_from_reader(BufReader::new(file), &parser, SourceKind::from(kind))
    }

    /// Add every record `parser` recognizes in `reader`. Returns the number
    /// of new entries.
    pub fn extend_from_reader<R: BufRead>(
        &mut self,
        reader: R,
        parser: &LineParser,
        kind: SourceKind,
    ) -> Result<usize> {
        let before = self.len();
        let mut pending_first: Option<ParsedLine> = None;
        for (i, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let Ok(line) = std::str::from_utf8(&line) else {
                log::trace!("skipping line {}: invalid UTF-8", i + 1);
                continue;
            };
            let Some(parsed) = parser.parse(line) else {
                log::trace!("skipping line {}: {:?}", i + 1, line);
                continue;
            };
            match (parsed.boundary, pending_first.take()) {
                (Some(RangeBoundary::Last), Some(first))
                    if parsed.codepoints.len() == 1
                        && parsed.codepoints[0] >= first.codepoints[0] =>
                {
                    let count = parsed.codepoints[0] - first.codepoints[0] + 1;
                    self.add_line(
                        ParsedLine {
                            count,
                            boundary: None,
                            ..first
                        },
                        kind,
                    );
                }
                (boundary, first) => {
                    if let Some(first) = first {
                        log::debug!("unterminated range at {:#x}", first.codepoints[0]);
                        self.add_line(first, kind);
                    }
                    if boundary == Some(RangeBoundary::First) {
                        pending_first = Some(parsed);
                    } else {
                        self.add_line(parsed, kind);
                    }
                }
            }
        }
        if let Some(first) = pending_first {
            self.add_line(first, kind);
        }
        Ok(self.len() - before)
    }

    /// Insert `line`, expanding a repeat count into sequential codepoints
    /// with an index suffix on the description.
    pub fn add_line(&mut self, line: ParsedLine, kind: SourceKind) {
        let ParsedLine {
            codepoints,
            description,
            count,
            ..
        } = line;
        if count <= 1 || codepoints.len() != 1 {
            if count > 1 {
                log::debug!(
                    "ignoring repeat count {} of sequence {}",
                    count,
                    canonical_key(&codepoints)
                );
            }
            self.insert(CodepointEntry::new(codepoints, &description, kind));
            return;
        }
        let base = codepoints[0];
        let available = (MAX_CODEPOINT + 1).saturating_sub(base);
        if count > available {
            log::debug!(
                "truncating repeat count {} of {:#x} at {:#x}",
                count,
                base,
                MAX_CODEPOINT
            );
        }
        for i in 0..count.min(available) {
            let codepoint = base + i;
            self.insert(CodepointEntry::new(
                vec![codepoint],
                &format!("{}-{}", description, i),
                kind,
            ));
        }
    }

    /// Returns `false` if an entry with the same key already existed, in
    /// which case the mapping is unchanged.
    pub fn insert(&mut self, entry: CodepointEntry) -> bool {
        match self.entries.entry(entry.key()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(v) => {
                v.insert(entry);
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&CodepointEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, CodepointEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, CodepointEntry> {
        self.entries.keys()
    }

    /// Write `codepoint;description;kind` lines in insertion order.
    pub fn write_raw<W: Write>(&self, mut writer: W) -> Result<()> {
        for (key, entry) in self.iter() {
            writeln!(writer, "{};{};{}", key, entry.description, entry.kind)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write `codepoint;description` lines in insertion order.
    pub fn write_map<W: Write>(&self, mut writer: W) -> Result<()> {
        for (key, entry) in self.iter() {
            writeln!(writer, "{};{}", key, entry.description)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read back a mapping written by [`Mapping::write_raw`].
    pub fn read_raw<R: BufRead>(reader: R) -> Result<Self> {
        let mut ret = Self::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let invalid = || {
                Error::new(format!("Invalid raw mapping record on line {}", i + 1))
                    .set_details(format!("`{}`", line))
                    .set_kind(ErrorKind::ValueError)
            };
            let mut fields = line.split(';');
            let (Some(key), Some(description), Some(kind), None) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                return Err(invalid());
            };
            let kind = match kind.trim() {
                "0" => SourceKind::Unicode,
                "1" => SourceKind::Emoji,
                _ => return Err(invalid()),
            };
            let codepoints = parse_key(key).ok_or_else(invalid)?;
            ret.insert(CodepointEntry {
                codepoints,
                description: description.to_string(),
                kind,
            });
        }
        Ok(ret)
    }

    pub fn read_raw_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .chain_err_summary(|| format!("Could not open {}", path.display()))
            .chain_err_related_path(path)?;
        Self::read_raw(BufReader::new(file)).chain_err_related_path(path)
    }
}

impl FromIterator<CodepointEntry> for Mapping {
    fn from_iter<I: IntoIterator<Item = CodepointEntry>>(iter: I) -> Self {
        let mut ret = Self::new();
        for entry in iter {
            ret.insert(entry);
        }
        ret
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a CodepointEntry);
    type IntoIter = indexmap::map::Iter<'a, String, CodepointEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
