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

//! Line grammars of the upstream file formats.
//!
//! The layout of the emoji files changed a few times between releases, so
//! each (file kind, emoji release) pair resolves to one [`Descriptor`]. A
//! descriptor pattern uses these named groups:
//!
//! - `c`: codepoint field. A single codepoint, a `FIRST..LAST` range or a
//!   space separated sequence.
//! - `d`: description.
//! - `n`: optional repeat count, `[n]` in the trailing comment.
//! - `a`: (UnicodeData) Unicode 1.0 name, used for `<control>` characters.
//! - `s`: (variation sequences) presentation style, appended to the
//!   description.

use regex::Regex;

use super::targets::{EmojiRelease, FileKind};
use crate::error::Result;

/// Highest Unicode scalar value. Fields above it make the line malformed.
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Syntax {
    /// `0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;`
    UnicodeData,
    /// `00A9 ; text ; L1 ; none ; j # V1.1 (©) COPYRIGHT SIGN`
    EmojiDataV1,
    /// `1F600..1F64F ; Emoji # 6.1 [80] (😀..🙏) grinning face..folded hands`
    TrailingName,
    /// `1F1E6 1F1E8 ; Emoji_Flag_Sequence ; flag: Ascension Island # 6.0 [1] (🇦🇨)`
    FieldName,
    /// `0023 FE0E ; text style; # (1.1) NUMBER SIGN`
    VariationSequence,
}

#[derive(Clone, Copy, Debug)]
pub struct Descriptor {
    pub syntax: Syntax,
    pub pattern: &'static str,
}

macro_rules! descriptor {
    ($syntax:ident, $($part:literal),+ $(,)?) => {
        Descriptor {
            syntax: Syntax::$syntax,
            pattern: concat!($($part),+),
        }
    };
}

static UNICODE_DATA: Descriptor = descriptor!(
    UnicodeData,
    r"^(?P<c>[0-9A-Fa-f]{4,6});(?P<d>[^;]*)",
    r"(?:;(?:[^;]*;){8}(?P<a>[^;]*))?",
);

static EMOJI_DATA_V1: Descriptor = descriptor!(
    EmojiDataV1,
    r"^(?P<c>[0-9A-Fa-f]{4,6})\s*;[^#]*#\s*V?[0-9.]+\s*",
    r"\(.*?\)\s*(?P<d>.+?)\s*$",
);

static TRAILING_NAME: Descriptor = descriptor!(
    TrailingName,
    r"^(?P<c>[0-9A-Fa-f]{4,6}(?:(?:\.\.|\s+)[0-9A-Fa-f]{4,6})*)\s*;[^#]*#",
    r"\s*E?[0-9.]+\s*(?:\[(?P<n>[0-9]+)\])?\s*\(.*?\)\s*",
    r"(?P<d>.+?)(?:\.\..*)?\s*$",
);

static FIELD_NAME: Descriptor = descriptor!(
    FieldName,
    r"^(?P<c>[0-9A-Fa-f]{4,6}(?:(?:\.\.|\s+)[0-9A-Fa-f]{4,6})*)\s*;[^;#]*;",
    r"\s*(?P<d>[^#]+?)(?:\.\.[^#]*)?\s*#[^\[]*(?:\[(?P<n>[0-9]+)\])?",
);

static VARIATION_SEQUENCE: Descriptor = descriptor!(
    VariationSequence,
    r"^(?P<c>[0-9A-Fa-f]{4,6}(?:\s+[0-9A-Fa-f]{4,6})+)\s*;\s*(?P<s>[^;]*?)\s*;",
    r"\s*#\s*(?:\([^)]*\)\s*)?(?P<d>.+?)\s*$",
);

impl Descriptor {
    /// The grammar of `kind` as published in `emoji`. UnicodeData does not
    /// depend on the emoji release.
    pub fn lookup(kind: FileKind, emoji: Option<EmojiRelease>) -> &'static Self {
        let major = emoji.map(|e| e.major()).unwrap_or(u8::MAX);
        match kind {
            FileKind::UnicodeData => &UNICODE_DATA,
            FileKind::EmojiData if major <= 1 => &EMOJI_DATA_V1,
            FileKind::EmojiData => &TRAILING_NAME,
            FileKind::EmojiSequences | FileKind::EmojiZwjSequences if major < 5 => {
                &TRAILING_NAME
            }
            FileKind::EmojiSequences | FileKind::EmojiZwjSequences => &FIELD_NAME,
            FileKind::EmojiVariationSequences => &VARIATION_SEQUENCE,
        }
    }
}

/// Marks the halves of a UnicodeData range such as
/// `4E00;<CJK Ideograph, First>` / `9FFF;<CJK Ideograph, Last>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RangeBoundary {
    First,
    Last,
}

/// One record extracted from an upstream line. The description is returned
/// as found; normalization happens in the mapping builder.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedLine {
    pub codepoints: Vec<u32>,
    pub description: String,
    pub count: u32,
    pub boundary: Option<RangeBoundary>,
}

#[derive(Debug)]
pub struct LineParser {
    descriptor: &'static Descriptor,
    regex: Regex,
}

impl LineParser {
    pub fn new(kind: FileKind, emoji: Option<EmojiRelease>) -> Result<Self> {
        let descriptor = Descriptor::lookup(kind, emoji);
        Ok(Self {
            descriptor,
            regex: Regex::new(descriptor.pattern)?,
        })
    }

    pub fn syntax(&self) -> Syntax {
        self.descriptor.syntax
    }

    /// Returns `None` for blank lines, comments and lines the grammar does
    /// not recognize.
    pub fn parse(&self, line: &str) -> Option<ParsedLine> {
        let line = line.trim_start_matches('\u{feff}').trim_end();
        if line.trim_start().is_empty() || line.trim_start().starts_with('#') {
            return None;
        }
        let caps = self.regex.captures(line)?;
        let field = caps.name("c")?.as_str();
        let mut description = caps.name("d")?.as_str().trim().to_string();

        let (codepoints, range_len) = parse_codepoints(field)?;
        let count = match range_len {
            Some(len) => len,
            None => caps
                .name("n")
                .and_then(|n| n.as_str().parse().ok())
                .unwrap_or(1),
        };

        let mut boundary = None;
        match self.descriptor.syntax {
            Syntax::UnicodeData => {
                if let Some(inner) = description
                    .strip_prefix('<')
                    .and_then(|d| d.strip_suffix('>'))
                {
                    if let Some(name) = inner.strip_suffix(", First") {
                        boundary = Some(RangeBoundary::First);
                        description = name.to_string();
                    } else if let Some(name) = inner.strip_suffix(", Last") {
                        boundary = Some(RangeBoundary::Last);
                        description = name.to_string();
                    } else if let Some(alias) = caps
                        .name("a")
                        .map(|a| a.as_str().trim())
                        .filter(|a| !a.is_empty())
                    {
                        description = alias.to_string();
                    }
                }
            }
            Syntax::VariationSequence => {
                if let Some(style) = caps
                    .name("s")
                    .map(|s| s.as_str().trim())
                    .filter(|s| !s.is_empty())
                {
                    description.push(' ');
                    description.push_str(style);
                }
            }
            Syntax::EmojiDataV1 | Syntax::TrailingName | Syntax::FieldName => {}
        }
        if description.is_empty() {
            return None;
        }

        Some(ParsedLine {
            codepoints,
            description,
            count,
            boundary,
        })
    }
}

/// Parse a codepoint field. Ranges return their first codepoint and their
/// length.
fn parse_codepoints(field: &str) -> Option<(Vec<u32>, Option<u32>)> {
    let hex = |s: &str| {
        u32::from_str_radix(s.trim(), 16)
            .ok()
            .filter(|c| *c <= MAX_CODEPOINT)
    };
    if let Some((first, last)) = field.split_once("..") {
        let (first, last) = (hex(first)?, hex(last)?);
        if last < first {
            return None;
        }
        return Some((vec![first], Some(last - first + 1)));
    }
    let codepoints = field
        .split_whitespace()
        .map(hex)
        .collect::<Option<Vec<u32>>>()?;
    if codepoints.is_empty() {
        return None;
    }
    Some((codepoints, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(kind: FileKind, emoji: (u8, u8)) -> LineParser {
        LineParser::new(kind, Some(EmojiRelease::new(emoji.0, emoji.1))).unwrap()
    }

    fn line(codepoints: &[u32], description: &str, count: u32) -> Option<ParsedLine> {
        Some(ParsedLine {
            codepoints: codepoints.to_vec(),
            description: description.to_string(),
            count,
            boundary: None,
        })
    }

    #[test]
    fn test_descriptor_table() {
        let syntax =
            |kind, major| Descriptor::lookup(kind, Some(EmojiRelease::new(major, 0))).syntax;
        assert_eq!(syntax(FileKind::UnicodeData, 1), Syntax::UnicodeData);
        assert_eq!(
            Descriptor::lookup(FileKind::UnicodeData, None).syntax,
            Syntax::UnicodeData
        );
        assert_eq!(syntax(FileKind::EmojiData, 1), Syntax::EmojiDataV1);
        assert_eq!(syntax(FileKind::EmojiData, 2), Syntax::TrailingName);
        assert_eq!(syntax(FileKind::EmojiData, 15), Syntax::TrailingName);
        assert_eq!(syntax(FileKind::EmojiSequences, 3), Syntax::TrailingName);
        assert_eq!(syntax(FileKind::EmojiZwjSequences, 5), Syntax::FieldName);
        assert_eq!(
            syntax(FileKind::EmojiVariationSequences, 4),
            Syntax::VariationSequence
        );
        for kind in FileKind::ALL {
            for major in [1, 2, 4, 5, 11, 16] {
                assert!(LineParser::new(kind, Some(EmojiRelease::new(major, 0))).is_ok());
            }
        }
    }

    #[test]
    fn test_unicode_data_lines() {
        let p = LineParser::new(FileKind::UnicodeData, None).unwrap();
        assert_eq!(
            p.parse("0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;"),
            line(&[0x41], "LATIN CAPITAL LETTER A", 1)
        );
        assert_eq!(
            p.parse("0041;LATIN CAPITAL LETTER A;Lu;..."),
            line(&[0x41], "LATIN CAPITAL LETTER A", 1)
        );
        assert_eq!(
            p.parse("1F600;GRINNING FACE;So;0;ON;;;;;N;;;;;"),
            line(&[0x1f600], "GRINNING FACE", 1)
        );
        assert_eq!(
            p.parse("000A;<control>;Cc;0;B;;;;;N;LINE FEED (LF);;;;"),
            line(&[0xa], "LINE FEED (LF)", 1)
        );
        assert_eq!(
            p.parse("0080;<control>;Cc;0;BN;;;;;N;;;;;"),
            line(&[0x80], "<control>", 1)
        );
        let first = p.parse("4E00;<CJK Ideograph, First>;Lo;0;L;;;;;N;;;;;").unwrap();
        assert_eq!(first.description, "CJK Ideograph");
        assert_eq!(first.boundary, Some(RangeBoundary::First));
        let last = p.parse("9FFF;<CJK Ideograph, Last>;Lo;0;L;;;;;N;;;;;").unwrap();
        assert_eq!(last.codepoints, vec![0x9fff]);
        assert_eq!(last.boundary, Some(RangeBoundary::Last));

        assert_eq!(p.parse(""), None);
        assert_eq!(p.parse("   "), None);
        assert_eq!(p.parse("# comment"), None);
        assert_eq!(p.parse("not a record"), None);
        assert_eq!(p.parse("0041;"), None);
    }

    #[test]
    fn test_emoji_data_lines() {
        let v1 = parser(FileKind::EmojiData, (1, 0));
        assert_eq!(
            v1.parse("00A9 ;\ttext ;\tL1 ;\tnone ;\tj\t# V1.1 (©) COPYRIGHT SIGN"),
            line(&[0xa9], "COPYRIGHT SIGN", 1)
        );

        let v2 = parser(FileKind::EmojiData, (3, 0));
        assert_eq!(
            v2.parse("231A..231B    ; Emoji                # 1.1  [2] (⌚..⌛)    WATCH..HOURGLASS"),
            line(&[0x231a], "WATCH", 2)
        );

        let v15 = parser(FileKind::EmojiData, (15, 1));
        assert_eq!(
            v15.parse(
                "1F600..1F64F  ; Emoji                # E1.0 [80] (😀..🙏)    grinning face..folded hands"
            ),
            line(&[0x1f600], "grinning face", 80)
        );
        assert_eq!(
            v15.parse("00A9          ; Emoji                # E0.6   [1] (©️)       copyright"),
            line(&[0xa9], "copyright", 1)
        );
        assert_eq!(
            v15.parse("# 1F600..1F64F ; Emoji # E1.0 [80] (😀..🙏) grinning face..folded hands"),
            None
        );
        // A range always wins over a disagreeing count.
        assert_eq!(
            v15.parse(
                "1F600..1F602 ; Emoji # E1.0 [80] (😀..😂) grinning face..face with tears of joy"
            ),
            line(&[0x1f600], "grinning face", 3)
        );
        assert_eq!(v15.parse("110000 ; Emoji # E1.0 [1] (x) beyond"), None);
        assert_eq!(v15.parse("10FFFF..110001 ; Emoji # E1.0 [3] (x) beyond"), None);
    }

    #[test]
    fn test_sequence_lines() {
        let v3 = parser(FileKind::EmojiSequences, (3, 0));
        assert_eq!(
            v3.parse("0023 FE0F 20E3 ; Emoji_Combining_Sequence  # 3.0  [1] (#️⃣) keycap: #"),
            line(&[0x23, 0xfe0f, 0x20e3], "keycap: #", 1)
        );

        let v15 = parser(FileKind::EmojiSequences, (15, 0));
        assert_eq!(
            v15.parse(
                "1F1E6 1F1E8   ; RGI_Emoji_Flag_Sequence        ; flag: Ascension Island       # E2.0   [1] (🇦🇨)"
            ),
            line(&[0x1f1e6, 0x1f1e8], "flag: Ascension Island", 1)
        );
        assert_eq!(
            v15.parse("231A..231B    ; Basic_Emoji   ; watch..hourglass   # E0.6   [2] (⌚..⌛)"),
            line(&[0x231a], "watch", 2)
        );

        let zwj = parser(FileKind::EmojiZwjSequences, (12, 0));
        assert_eq!(
            zwj.parse(
                "1F468 200D 2764 FE0F 200D 1F468 ; Emoji_ZWJ_Sequence ; couple with heart: man, man # E2.0 [1] (👨‍❤️‍👨)"
            ),
            line(
                &[0x1f468, 0x200d, 0x2764, 0xfe0f, 0x200d, 0x1f468],
                "couple with heart: man, man",
                1
            )
        );
    }

    #[test]
    fn test_variation_sequence_lines() {
        let p = parser(FileKind::EmojiVariationSequences, (15, 1));
        assert_eq!(
            p.parse("0023 FE0E  ; text style;  # (1.1) NUMBER SIGN"),
            line(&[0x23, 0xfe0e], "NUMBER SIGN text style", 1)
        );
        assert_eq!(
            p.parse("1F600 FE0F ; emoji style; # (6.1) GRINNING FACE"),
            line(&[0x1f600, 0xfe0f], "GRINNING FACE emoji style", 1)
        );
        assert_eq!(p.parse("0023 ; text style; # (1.1) NUMBER SIGN"), None);
    }
}
