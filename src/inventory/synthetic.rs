//! Synthetic host names.
//!
//! A definition file named `web[01-04].yaml` stands for four hosts, `web01`
//! through `web04`; `web[03].yaml` stands for `web03` alone. The name is
//! tokenized into a prefix, a bracketed range and an optional trailing part.
//! A legacy ordinal suffix such as `web[01-04] + '2'` is recognised and
//! ignored, as is anything else following the closing bracket.

use std::ops::RangeInclusive;

/// A parsed synthetic host name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticName<'a> {
    /// Text before the opening bracket
    pub prefix: &'a str,
    /// Numeric range between the brackets
    pub range: HostRange,
    /// Text after the closing bracket
    pub suffix: Suffix<'a>,
}

/// Inclusive range of host numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostRange {
    /// First host number
    pub start: u32,
    /// Last host number, inclusive
    pub end: u32,
}

/// Whatever follows the bracketed range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix<'a> {
    /// Nothing follows the range
    None,
    /// Legacy `+ 'N'` ordinal modifier
    LegacyOrdinal(u32),
    /// Any other trailing text
    Other(&'a str),
}

impl HostRange {
    /// Numbers covered by this range; empty when `start > end`
    pub fn numbers(self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Number of hosts in the range
    pub fn len(self) -> usize {
        if self.start > self.end {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    /// Whether the range covers no hosts
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl<'a> SyntheticName<'a> {
    /// Parse a file stem, returning `None` if it is a literal host name
    pub fn parse(stem: &'a str) -> Option<Self> {
        let open = stem.find('[')?;
        let prefix = &stem[..open];
        let rest = &stem[open + 1..];
        let close = rest.find(']')?;

        let range = parse_range(&rest[..close])?;
        let suffix = parse_suffix(&rest[close + 1..]);

        Some(Self {
            prefix,
            range,
            suffix,
        })
    }

    /// Concrete short host names, numbers zero padded to two digits
    pub fn expand(&self) -> impl Iterator<Item = String> + '_ {
        self.range
            .numbers()
            .map(move |n| format!("{}{:02}", self.prefix, n))
    }
}

/// Short host names of one file stem, produced one at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostNames {
    /// A literal stem, yielded once
    Literal(Option<String>),
    /// A synthetic range still being expanded
    Range {
        /// Text before the range
        prefix: String,
        /// Numbers not yet yielded
        numbers: RangeInclusive<u32>,
    },
}

impl HostNames {
    /// Names for a file stem; literal stems yield themselves unchanged
    pub fn new(stem: &str) -> Self {
        match SyntheticName::parse(stem) {
            Some(name) => HostNames::Range {
                prefix: name.prefix.to_string(),
                numbers: name.range.numbers(),
            },
            None => HostNames::Literal(Some(stem.to_string())),
        }
    }
}

impl Iterator for HostNames {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            HostNames::Literal(name) => name.take(),
            HostNames::Range { prefix, numbers } => {
                numbers.next().map(|n| format!("{prefix}{n:02}"))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            HostNames::Literal(name) => {
                let n = usize::from(name.is_some());
                (n, Some(n))
            }
            HostNames::Range { numbers, .. } => numbers.size_hint(),
        }
    }
}

/// Expand a file stem into short host names.
///
/// Literal stems come back unchanged as a single name.
pub fn expand_stem(stem: &str) -> Vec<String> {
    HostNames::new(stem).collect()
}

fn parse_range(body: &str) -> Option<HostRange> {
    match body.split_once('-') {
        Some((start, end)) => Some(HostRange {
            start: parse_number(start)?,
            end: parse_number(end)?,
        }),
        None => {
            let n = parse_number(body)?;
            Some(HostRange { start: n, end: n })
        }
    }
}

fn parse_number(token: &str) -> Option<u32> {
    let token = token.trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn parse_suffix(tail: &str) -> Suffix<'_> {
    if tail.trim().is_empty() {
        return Suffix::None;
    }

    let ordinal = tail
        .trim_start()
        .strip_prefix('+')
        .map(str::trim)
        .and_then(|quoted| {
            let quote = quoted.chars().next().filter(|c| *c == '\'' || *c == '"')?;
            quoted[1..].strip_suffix(quote)
        })
        .and_then(parse_number);

    match ordinal {
        Some(n) => Suffix::LegacyOrdinal(n),
        None => Suffix::Other(tail),
    }
}
