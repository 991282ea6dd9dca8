//! Front-matter parsing. Every content file starts with a YAML header block
//! carrying its metadata, separated from the Markdown body by the first blank
//! line:
//!
//! ```md
//! title: Hello, world!
//! date: 2021-04-16
//! tags: [greet]
//!
//! # Hello
//!
//! World
//! ```
//!
//! The engine itself only ever reads `title` and `date`; `tags` ride along
//! for templates. Dates stay strings here; content identity is derived from
//! names, and only the feed builder interprets dates as timestamps.

use serde::Deserialize;
use std::fmt;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Frontmatter {
    pub title: String,

    /// `YYYY-MM-DD`. Kept as a string; lexicographic order is date order.
    pub date: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Splits `input` into front matter and body at the first blank line and
/// deserializes the header. A file with no blank line is all header and no
/// body, which mirrors how the header is written by the creation tooling
/// (header, blank line, then whatever the author types).
pub fn parse(input: &str) -> Result<(Frontmatter, &str)> {
    let (header, body) = match input.find("\n\n") {
        Some(i) => (&input[..i], &input[i + 2..]),
        None => (input, ""),
    };
    let frontmatter = serde_yaml::from_str(header)?;
    Ok((frontmatter, body))
}

/// The result of a front-matter parse.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a front-matter parsing failure.
#[derive(Debug)]
pub enum Error {
    /// Returned when the header is not the YAML the engine expects (missing
    /// `title` or `date`, or not YAML at all).
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DeserializeYaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts [`serde_yaml::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator for deserialization.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}
