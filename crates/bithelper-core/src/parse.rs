use regex::{Captures, Regex, RegexBuilder};
use tracing::{debug, trace};

use crate::Error;

/// Longest line the repetition macro may expand to.
const MAX_EXPANDED_LEN: usize = 1 << 16;

/// A mutation of the bit vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    ToggleBit(usize),
    SetBit(usize),
    ClearBit(usize),
    ToggleRange(usize, usize),
    SetRange(usize, usize),
    ClearRange(usize, usize),
    /// Set the range, or clear it if every bit is already set.
    StickySetRange(usize, usize),
    /// Clear the range, or set it if every bit is already clear.
    StickyClearRange(usize, usize),
    /// Replace the vector with a zeroed one of this many bytes.
    Resize(usize),
    Or(String),
    Xor(String),
    And(String),
    SetAll,
    ClearAll,
    Invert,
}

/// A fully parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Apply(Operation),
    Copy,
    Help,
    QuickHelp,
    BitSchema,
    Quit,
}

type Build = fn(&Captures<'_>) -> Result<Command, Error>;

struct Rule {
    re: Regex,
    build: Build,
}

/// Line parser for the command grammar.
///
/// Rules are tried in a fixed order and the first pattern that matches the whole
/// line decides the command. Matching is case-insensitive.
pub struct CommandParser {
    repetition: Regex,
    rules: Vec<Rule>,
}

impl CommandParser {
    pub fn new() -> Result<Self, Error> {
        let grammar: [(&str, Build); 12] = [
            (r"^t\s(\d+)$", |c| apply(Operation::ToggleBit(index(c)?))),
            (r"^s\s(\d+)$", |c| apply(Operation::SetBit(index(c)?))),
            (r"^c\s(\d+)$", |c| apply(Operation::ClearBit(index(c)?))),
            (r"^t\s(\d+)-(\d+)$", |c| {
                let (lo, hi) = range(c)?;
                apply(Operation::ToggleRange(lo, hi))
            }),
            (r"^s\s(\d+)-(\d+)$", |c| {
                let (lo, hi) = range(c)?;
                apply(Operation::SetRange(lo, hi))
            }),
            (r"^c\s(\d+)-(\d+)$", |c| {
                let (lo, hi) = range(c)?;
                apply(Operation::ClearRange(lo, hi))
            }),
            (r"^ss\s(\d+)-(\d+)$", |c| {
                let (lo, hi) = range(c)?;
                apply(Operation::StickySetRange(lo, hi))
            }),
            (r"^sc\s(\d+)-(\d+)$", |c| {
                let (lo, hi) = range(c)?;
                apply(Operation::StickyClearRange(lo, hi))
            }),
            (r"^size\s(\d+)$", |c| {
                let bytes = number(c, 1).ok_or(Error::InvalidSize)?;
                apply(Operation::Resize(bytes))
            }),
            (r"^or\s([\da-f]+)$", |c| apply(Operation::Or(c[1].to_string()))),
            (r"^xor\s([\da-f]+)$", |c| apply(Operation::Xor(c[1].to_string()))),
            (r"^and\s([\da-f]+)$", |c| apply(Operation::And(c[1].to_string()))),
        ];

        let rules = grammar
            .into_iter()
            .map(|(pattern, build)| Ok(Rule { re: build_regex(pattern)?, build }))
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self {
            repetition: build_regex(r"\[(\d+)x([0-9a-f]+)\]")?,
            rules,
        })
    }

    /// Parse one input line (without its line terminator).
    pub fn parse_line(&self, line: &str) -> Result<Command, Error> {
        if line.is_empty() {
            return Err(Error::NoInput);
        }
        let line = self.preprocess(line)?;

        let cmd = match self.rules.iter().find_map(|r| r.re.captures(&line).map(|c| (r, c))) {
            Some((rule, caps)) => (rule.build)(&caps)?,
            None => parse_keyword(&line)?,
        };
        debug!(?cmd, "parsed command");
        Ok(cmd)
    }

    /// Expand repetition macros, then drop ignored characters.
    pub fn preprocess(&self, line: &str) -> Result<String, Error> {
        let expanded = self.expand_repetitions(line)?;
        Ok(strip_ignored(&expanded))
    }

    /// Replace every `[<n>x<hex>]` with `hex` repeated `n` times.
    ///
    /// Matches are located in the input as given; expanded text is never
    /// scanned again.
    pub fn expand_repetitions(&self, line: &str) -> Result<String, Error> {
        let mut out = String::with_capacity(line.len());
        let mut last = 0;
        for caps in self.repetition.captures_iter(line) {
            let Some(whole) = caps.get(0) else { continue };
            let count = parse_count(&caps[1]).ok_or(Error::InvalidQuantity)?;
            let fragment = &caps[2];
            let grows_to = count
                .checked_mul(fragment.len())
                .and_then(|n| n.checked_add(out.len()))
                .filter(|&n| n <= MAX_EXPANDED_LEN)
                .ok_or(Error::InvalidQuantity)?;
            trace!(count, fragment, grows_to, "expanding repetition");

            out.push_str(&line[last..whole.start()]);
            out.push_str(&fragment.repeat(count));
            last = whole.end();
        }
        out.push_str(&line[last..]);
        Ok(out)
    }
}

/// Remove the `_` digit separators.
pub fn strip_ignored(line: &str) -> String {
    line.chars().filter(|&c| c != '_').collect()
}

fn parse_keyword(line: &str) -> Result<Command, Error> {
    let cmd = match line.to_lowercase().as_str() {
        "set" => Command::Apply(Operation::SetAll),
        "clr" | "cls" | "clear" => Command::Apply(Operation::ClearAll),
        "not" => Command::Apply(Operation::Invert),
        "qh" | "quick" => Command::QuickHelp,
        "bits" => Command::BitSchema,
        "help" => Command::Help,
        "copy" => Command::Copy,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(Error::Unrecognized),
    };
    Ok(cmd)
}

fn apply(op: Operation) -> Result<Command, Error> {
    Ok(Command::Apply(op))
}

fn number(caps: &Captures<'_>, group: usize) -> Option<usize> {
    caps.get(group).and_then(|m| parse_count(m.as_str()))
}

/// Parse a decimal count, limited to the non-negative range of an `i32`.
fn parse_count(digits: &str) -> Option<usize> {
    digits.parse::<i32>().ok().and_then(|n| usize::try_from(n).ok())
}

fn index(caps: &Captures<'_>) -> Result<usize, Error> {
    number(caps, 1).ok_or(Error::InvalidIndex)
}

/// Both range ends, lowest first.
fn range(caps: &Captures<'_>) -> Result<(usize, usize), Error> {
    let x = number(caps, 1).ok_or(Error::InvalidRange)?;
    let y = number(caps, 2).ok_or(Error::InvalidRange)?;
    Ok((x.min(y), x.max(y)))
}

fn build_regex(pattern: &str) -> Result<Regex, Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::Pattern(e.to_string()))
}
