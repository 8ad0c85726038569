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


//! Matchset expressions select a subset of a [`Mapping`].
//!
//! A matchset is a comma separated list of rules. Each rule is optionally
//! prefixed with `-` (exclude) or `+` (include, the default) and is either a
//! builtin preset such as `_emoji_` or a literal fragment:
//!
//! - fragments starting with `0x` match the codepoint key, e.g. `0x1f60`,
//! - any other fragment matches the description, e.g. `cat face`.
//!
//! Fragments are literal substrings, matched case-insensitively. An entry is
//! kept if no exclusion rule matches it and at least one inclusion rule does.
//!
//! ```
//! use ucplib::{matchset::MatchRuleSet, ucd::{CodepointEntry, Mapping, SourceKind}};
//!
//! let mapping: Mapping = [
//!     CodepointEntry::new(vec![0x41], "LATIN CAPITAL LETTER A", SourceKind::Unicode),
//!     CodepointEntry::new(vec![0x1f600], "GRINNING FACE", SourceKind::Unicode),
//!     CodepointEntry::new(vec![0x1f639], "CAT FACE WITH TEARS OF JOY", SourceKind::Unicode),
//! ]
//! .into_iter()
//! .collect();
//!
//! let rules: MatchRuleSet = "_emoji_, -cat".parse().unwrap();
//! let filtered = rules.filter(&mapping);
//! assert_eq!(filtered.keys().collect::<Vec<_>>(), ["0x1f600"]);
//! ```

use std::{borrow::Cow, fmt, str::FromStr};

use regex::{Regex, RegexBuilder};

use crate::{
    error::{Error, ErrorKind, Result, WrapResultIntoError},
    ucd::{mapping::normalize_description, CodepointEntry, Mapping},
};

pub const DEFAULT_MATCHSET: &str = "_emoji_";

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Polarity {
    #[default]
    Positive,
    Negative,
}

impl fmt::Display for Polarity {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Positive => write!(fmt, "+"),
            Self::Negative => write!(fmt, "-"),
        }
    }
}

/// The part of an entry a rule is matched against.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MatchField {
    /// Canonical key, `0x1f468 0x200d 0x1f469`.
    Codepoint,
    Description,
    /// Number of codepoints in the key.
    Count,
    /// `0` for UnicodeData entries, `1` for emoji entries.
    Kind,
}

impl MatchField {
    pub fn value<'e>(&self, key: &'e str, entry: &'e CodepointEntry) -> Cow<'e, str> {
        match self {
            Self::Codepoint => Cow::Borrowed(key),
            Self::Description => Cow::Borrowed(entry.description.as_str()),
            Self::Count => Cow::Owned(entry.codepoints.len().to_string()),
            Self::Kind => Cow::Owned(entry.kind.to_string()),
        }
    }
}

impl fmt::Display for MatchField {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "{}",
            match self {
                Self::Codepoint => "codepoint",
                Self::Description => "description",
                Self::Count => "count",
                Self::Kind => "kind",
            }
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Builtin {
    pub name: &'static str,
    pub field: MatchField,
    pub pattern: &'static str,
    pub help: &'static str,
}

macro_rules! builtins {
    ($($name:literal => $field:ident, $pattern:literal, $help:literal;)+) => {
        &[$(Builtin {
            name: $name,
            field: MatchField::$field,
            pattern: $pattern,
            help: $help,
        }),+]
    };
}

pub static BUILTINS: &[Builtin] = builtins! {
    "_emoji_" => Codepoint, r"^0x1f[3-6][0-9a-f]{2}$",
        "single codepoints in U+1F300..U+1F6FF";
    "_emoticons_" => Codepoint, r"^0x1f6[0-4][0-9a-f]$",
        "Emoticons block, U+1F600..U+1F64F";
    "_symbols_" => Codepoint, r"^0x1f[3-5][0-9a-f]{2}$",
        "Miscellaneous Symbols and Pictographs, U+1F300..U+1F5FF";
    "_transport_" => Codepoint, r"^0x1f6[89a-f][0-9a-f]$",
        "Transport and Map Symbols, U+1F680..U+1F6FF";
    "_supplemental_" => Codepoint, r"^0x1f9[0-9a-f]{2}$",
        "Supplemental Symbols and Pictographs, U+1F900..U+1F9FF";
    "_dingbats_" => Codepoint, r"^0x27[0-9ab][0-9a-f]$",
        "Dingbats, U+2700..U+27BF";
    "_flags_" => Codepoint, r"^(?:0x1f1(?:e[6-9a-f]|f[0-9a-f]) 0x1f1(?:e[6-9a-f]|f[0-9a-f])|0x1f3f4 0xe00[0-7][0-9a-f].*)$",
        "regional indicator pairs and tag sequence flags";
    "_keycaps_" => Codepoint, r" 0x20e3$",
        "keycap sequences";
    "_zwj_" => Codepoint, r" 0x200d ",
        "zero width joiner sequences";
    "_skin-tones_" => Codepoint, r"0x1f3f[b-f]",
        "anything containing a skin tone modifier";
    "_sequences_" => Count, r"^(?:[2-9]|[1-9][0-9]+)$",
        "entries of two or more codepoints";
    "_singles_" => Count, r"^1$",
        "entries of a single codepoint";
    "_emoji-derived_" => Kind, r"^1$",
        "entries first defined by an emoji file";
    "_unicode-derived_" => Kind, r"^0$",
        "entries first defined by UnicodeData.txt";
    "_all_" => Codepoint, r"^",
        "every entry";
};

impl Builtin {
    pub fn lookup(name: &str) -> Option<&'static Self> {
        BUILTINS.iter().find(|b| b.name.eq_ignore_ascii_case(name))
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .wrap_err(|| format!("Could not compile regular expression `{}`", pattern))
}

/// One parsed matchset token. The regex is compiled once here, so filtering
/// never looks at the token text again.
#[derive(Clone, Debug)]
pub enum MatchRule {
    Builtin {
        builtin: &'static Builtin,
        polarity: Polarity,
        pattern: Regex,
    },
    Custom {
        fragment: String,
        polarity: Polarity,
        field: MatchField,
        pattern: Regex,
    },
}

impl MatchRule {
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = |details: &str| {
            Error::new(format!("Invalid matchset rule `{}`", token))
                .set_details(details.to_string())
                .set_kind(ErrorKind::Configuration)
        };
        let token = token.trim();
        if token.is_empty() {
            return Err(invalid("Empty rule; check for stray commas."));
        }
        let (polarity, body) = if let Some(rest) = token.strip_prefix('-') {
            (Polarity::Negative, rest.trim_start())
        } else if let Some(rest) = token.strip_prefix('+') {
            (Polarity::Positive, rest.trim_start())
        } else {
            (Polarity::Positive, token)
        };
        if body.is_empty() {
            return Err(invalid("A polarity sign must be followed by a rule."));
        }

        if body.len() > 1 && body.starts_with('_') && body.ends_with('_') {
            let builtin = Builtin::lookup(body).ok_or_else(|| {
                invalid(&format!(
                    "Unknown builtin. Available builtins: {}",
                    BUILTINS
                        .iter()
                        .map(|b| b.name)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;
            return Ok(Self::Builtin {
                builtin,
                polarity,
                pattern: compile(builtin.pattern)?,
            });
        }

        if body.contains(';') {
            return Err(invalid("Fragments cannot contain `;`."));
        }
        let (field, fragment) = match body.get(..2) {
            Some(prefix) if prefix.eq_ignore_ascii_case("0x") => {
                let digits = &body[2..];
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid(
                        "Codepoint fragments are `0x` followed by hexadecimal digits.",
                    ));
                }
                (MatchField::Codepoint, body.to_ascii_lowercase())
            }
            _ => (MatchField::Description, normalize_description(body)),
        };
        Ok(Self::Custom {
            pattern: compile(&regex::escape(&fragment))?,
            fragment,
            polarity,
            field,
        })
    }

    pub fn polarity(&self) -> Polarity {
        match self {
            Self::Builtin { polarity, .. } | Self::Custom { polarity, .. } => *polarity,
        }
    }

    pub fn field(&self) -> MatchField {
        match self {
            Self::Builtin { builtin, .. } => builtin.field,
            Self::Custom { field, .. } => *field,
        }
    }

    pub fn is_match(&self, key: &str, entry: &CodepointEntry) -> bool {
        let (Self::Builtin { pattern, .. } | Self::Custom { pattern, .. }) = self;
        pattern.is_match(&self.field().value(key, entry))
    }
}

impl FromStr for MatchRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Builtin {
                builtin, polarity, ..
            } => write!(fmt, "{}{}", polarity, builtin.name),
            Self::Custom {
                fragment, polarity, ..
            } => write!(fmt, "{}{}", polarity, fragment),
        }
    }
}

/// Parsed matchset: exclusion and inclusion rules in the order given.
#[derive(Clone, Debug, Default)]
pub struct MatchRuleSet {
    pub negative: Vec<MatchRule>,
    pub positive: Vec<MatchRule>,
}

impl MatchRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(expression: &str) -> Result<Self> {
        let mut ret = Self::new();
        for token in expression.split(',') {
            ret.push(MatchRule::parse(token)?);
        }
        log::debug!("matchset `{}` parsed into {}", expression, ret);
        Ok(ret)
    }

    pub fn push(&mut self, rule: MatchRule) {
        match rule.polarity() {
            Polarity::Negative => self.negative.push(rule),
            Polarity::Positive => self.positive.push(rule),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.negative.is_empty() && self.positive.is_empty()
    }

    pub fn is_match(&self, key: &str, entry: &CodepointEntry) -> bool {
        if let Some(rule) = self.negative.iter().find(|r| r.is_match(key, entry)) {
            log::trace!("{} excluded by {}", key, rule);
            return false;
        }
        self.positive.iter().any(|r| r.is_match(key, entry))
    }

    pub fn filter(&self, mapping: &Mapping) -> Mapping {
        if self.positive.is_empty() {
            log::warn!("matchset has no inclusion rules, the result is empty");
        }
        mapping
            .iter()
            .filter(|(key, entry)| self.is_match(key, entry))
            .map(|(_, entry)| entry.clone())
            .collect()
    }
}

impl FromStr for MatchRuleSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MatchRuleSet {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let rules = self
            .positive
            .iter()
            .chain(self.negative.iter())
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        write!(fmt, "{}", rules.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ucd::SourceKind;

    fn fixture() -> Mapping {
        [
            (vec![0x41], "LATIN CAPITAL LETTER A", SourceKind::Unicode),
            (vec![0x1f600], "GRINNING FACE", SourceKind::Unicode),
            (vec![0x1f638], "GRINNING CAT FACE WITH SMILING EYES", SourceKind::Unicode),
            (vec![0x1f680], "ROCKET", SourceKind::Unicode),
            (vec![0x1f923], "ROLLING ON THE FLOOR LAUGHING", SourceKind::Unicode),
            (vec![0x1f1e6, 0x1f1e8], "flag: Ascension Island", SourceKind::Emoji),
            (vec![0x23, 0xfe0f, 0x20e3], "keycap: #", SourceKind::Emoji),
            (
                vec![0x1f468, 0x200d, 0x1f469, 0x200d, 0x1f466],
                "family: man, woman, boy",
                SourceKind::Emoji,
            ),
            (vec![0x1f44b, 0x1f3fb], "waving hand: light skin tone", SourceKind::Emoji),
        ]
        .into_iter()
        .map(|(cps, desc, kind)| CodepointEntry::new(cps, desc, kind))
        .collect()
    }

    fn select(expression: &str) -> Vec<String> {
        MatchRuleSet::parse(expression)
            .unwrap()
            .filter(&fixture())
            .keys()
            .cloned()
            .collect()
    }

    #[test]
    fn test_emoji_builtin() {
        let mapping: Mapping = [
            CodepointEntry::new(vec![0x1f600], "GRINNING FACE", SourceKind::Unicode),
            CodepointEntry::new(vec![0x41], "LATIN CAPITAL LETTER A", SourceKind::Unicode),
        ]
        .into_iter()
        .collect();
        let filtered = MatchRuleSet::parse(DEFAULT_MATCHSET).unwrap().filter(&mapping);
        assert_eq!(filtered.keys().collect::<Vec<_>>(), ["0x1f600"]);
        assert_eq!(filtered.get("0x1f600").unwrap().description, "grinning-face");
    }

    #[test]
    fn test_builtins() {
        assert_eq!(select("_emoticons_"), ["0x1f600", "0x1f638"]);
        assert_eq!(select("_transport_"), ["0x1f680"]);
        assert_eq!(select("_supplemental_"), ["0x1f923"]);
        assert_eq!(select("_flags_"), ["0x1f1e6 0x1f1e8"]);
        assert_eq!(select("_keycaps_"), ["0x23 0xfe0f 0x20e3"]);
        assert_eq!(
            select("_zwj_"),
            ["0x1f468 0x200d 0x1f469 0x200d 0x1f466"]
        );
        assert_eq!(select("_skin-tones_"), ["0x1f44b 0x1f3fb"]);
        assert_eq!(select("_sequences_").len(), 4);
        assert_eq!(select("_singles_").len(), 5);
        assert_eq!(select("_emoji-derived_"), select("_sequences_"));
        assert_eq!(select("_unicode-derived_"), select("_singles_"));
        assert_eq!(select("_all_").len(), fixture().len());
        assert_eq!(select("_EMOJI_"), select("_emoji_"));
        for builtin in BUILTINS {
            assert!(MatchRule::parse(builtin.name).is_ok(), "{}", builtin.name);
        }
    }

    #[test]
    fn test_custom_fragments() {
        assert_eq!(select("cat face"), ["0x1f638"]);
        assert_eq!(select("GRINNING"), ["0x1f600", "0x1f638"]);
        assert_eq!(select("0x1f6"), ["0x1f600", "0x1f638", "0x1f680"]);
        assert_eq!(select("0X1F1E8"), ["0x1f1e6 0x1f1e8"]);
        // Regex metacharacters are literal.
        assert_eq!(select("keycap: #"), ["0x23 0xfe0f 0x20e3"]);
        assert!(select("grinning.*").is_empty());
        assert_eq!(select("man,-woman"), Vec::<String>::new());
        assert_eq!(
            select("_zwj_, rocket"),
            ["0x1f680", "0x1f468 0x200d 0x1f469 0x200d 0x1f466"]
        );
    }

    #[test]
    fn test_negative_rules_win() {
        assert_eq!(select("_emoji_,-cat"), ["0x1f600", "0x1f680"]);
        assert_eq!(select("-cat, _emoji_"), ["0x1f600", "0x1f680"]);
        assert_eq!(select("+_all_,-_all_"), Vec::<String>::new());
        assert_eq!(select("_all_, -_sequences_, -0x41"), select("_singles_")[1..]);
    }

    #[test]
    fn test_only_negative_rules_select_nothing() {
        let rules = MatchRuleSet::parse("-_flags_, -rocket").unwrap();
        assert!(rules.positive.is_empty());
        assert_eq!(rules.negative.len(), 2);
        assert!(rules.filter(&fixture()).is_empty());
    }

    #[test]
    fn test_invalid_tokens() {
        for expression in [
            "",
            "_emoji_,",
            "_emoji_,,rocket",
            "-",
            "+ ",
            "_nope_",
            "0x",
            "0xzz",
            "0x1f6 00",
            "a;b",
        ] {
            let err = MatchRuleSet::parse(expression).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Configuration, "{:?}", expression);
        }
    }

    #[test]
    fn test_rule_fields_and_display() {
        let rules = MatchRuleSet::parse(" _emoji_ , -Cat Face , +0x1F6 ").unwrap();
        assert_eq!(rules.positive[0].field(), MatchField::Codepoint);
        assert_eq!(rules.negative[0].field(), MatchField::Description);
        assert_eq!(rules.negative[0].polarity(), Polarity::Negative);
        assert_eq!(rules.to_string(), "+_emoji_,+0x1f6,-cat-face");
    }
}
