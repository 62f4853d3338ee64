use std::collections::BTreeMap;
use std::fmt::Write;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::field::Context;
use crate::error::{bail, Cord19Error, Cord19Result};

/// Named word lists used to fill the slots of a [Template].
#[derive(Debug, Clone, Default)]
pub struct Lexicon(BTreeMap<String, Vec<String>>);

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the word list `name`.
    pub fn with<S: Into<String>>(mut self, name: S, words: &[&str]) -> Self {
        self.0
            .insert(name.into(), words.iter().map(|w| w.to_string()).collect());
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Keep,
    Lower,
    Title,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(String, Case),
    Int(i64, i64),
    Index(usize),
}

/// A text pattern with placeholders.
///
/// The following placeholders are supported:
///
/// * `{name}`: a random word of the lexicon entry `name`; the modifiers
///   `{name|lower}` and `{name|title}` change the case of the word.
/// * `{int:LOW:HIGH}`: a random integer in `LOW..HIGH`.
/// * `{index}` and `{index:WIDTH}`: the index of the record, padded
///   with zeros to `WIDTH` digits.
///
/// Literal braces are written as `{{` and `}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Returns the names of all lexicon entries used by the template.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(name, _) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Renders the template. Slots without a matching lexicon entry
    /// render as an empty string.
    pub fn render(
        &self,
        lexicon: &Lexicon,
        ctx: &Context,
        rng: &mut StdRng,
    ) -> String {
        let mut out = String::new();

        for segment in self.segments.iter() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(name, case) => {
                    let word = lexicon
                        .get(name)
                        .and_then(|words| words.choose(rng))
                        .map(String::as_str)
                        .unwrap_or_default();

                    match case {
                        Case::Keep => out.push_str(word),
                        Case::Lower => out.push_str(&word.to_lowercase()),
                        Case::Title => out.push_str(&title_case(word)),
                    }
                }
                Segment::Int(low, high) => {
                    let _ = write!(out, "{}", rng.gen_range(*low..*high));
                }
                Segment::Index(width) => {
                    let _ = write!(out, "{:0w$}", ctx.index, w = *width);
                }
            }
        }

        out
    }
}

/// Upper-cases the first letter of every word and lower-cases all
/// other letters. A word starts after any non-alphabetic character.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start = false;
        } else {
            out.push(c);
            start = true;
        }
    }

    out
}

fn parse_placeholder(inner: &str) -> Cord19Result<Segment> {
    let parts: Vec<&str> = inner.split(':').collect();
    match parts.as_slice() {
        ["int", low, high] => {
            let low = low.trim().parse::<i64>().map_err(Cord19Error::other)?;
            let high = high.trim().parse::<i64>().map_err(Cord19Error::other)?;
            if low >= high {
                bail!("empty integer range `{{{inner}}}`");
            }
            Ok(Segment::Int(low, high))
        }
        ["index"] => Ok(Segment::Index(0)),
        ["index", width] => Ok(Segment::Index(
            width.trim().parse::<usize>().map_err(Cord19Error::other)?,
        )),
        [slot] => {
            let (name, case) = match slot.split_once('|') {
                None => (*slot, Case::Keep),
                Some((name, "lower")) => (name, Case::Lower),
                Some((name, "title")) => (name, Case::Title),
                Some((_, modifier)) => {
                    bail!("unknown modifier `{modifier}`")
                }
            };

            if name.trim().is_empty() {
                bail!("empty placeholder");
            }

            Ok(Segment::Slot(name.trim().to_string(), case))
        }
        _ => bail!("invalid placeholder `{{{inner}}}`"),
    }
}

impl FromStr for Template {
    type Err = Cord19Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = vec![];
        let mut literal = String::new();
        let mut chars = s.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut inner = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => inner.push(c),
                            None => bail!("unclosed placeholder in `{s}`"),
                        }
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(
                            &mut literal,
                        )));
                    }

                    segments.push(parse_placeholder(&inner)?);
                }
                '}' => bail!("unmatched `}}` in `{s}`"),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }
}
