//! Support for creating the Atom feed from the blog listing. The builder only
//! assembles ordered entries with canonical absolute URLs; the envelope and
//! XML serialization belong to the `atom_syndication` crate.

use crate::config::{Author, Config};
use crate::listing::Entry;
use crate::route::Route;
use atom_syndication::{
    Entry as AtomEntry, EntryBuilder, Error as AtomError, Feed, FeedBuilder, FixedDateTime,
    LinkBuilder, Person, PersonBuilder, Text,
};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, ParseError, TimeZone, Utc};
use std::fmt;
use std::io::Write;

/// Creates a feed from the site configuration and an already-ordered listing
/// (most recent first, see [`crate::listing::build_listing`]) and writes the
/// XML to `w`.
pub fn write_feed<W: Write>(config: &Config, entries: &[Entry], w: W) -> Result<()> {
    feed(config, entries)?.write_to(w)?;
    Ok(())
}

fn feed(config: &Config, entries: &[Entry]) -> Result<Feed> {
    Ok(FeedBuilder::default()
        .title(Text::plain(config.title.clone()))
        .id(config.site_root.as_str())
        .updated(FixedOffset::east(0).from_utc_datetime(&Utc::now().naive_utc()))
        .authors(author_to_people(config.author.clone()))
        .links(vec![LinkBuilder::default()
            .href(config.site_root.as_str())
            .rel("alternate".to_string())
            .build()])
        .entries(feed_entries(config, entries)?)
        .build())
}

fn feed_entries(config: &Config, entries: &[Entry]) -> Result<Vec<AtomEntry>> {
    let mut atom_entries = Vec::with_capacity(entries.len());
    for entry in entries {
        let date = parse_date(&entry.date)?;
        let url = Route::Post(entry.id.clone()).url(config)?;
        atom_entries.push(
            EntryBuilder::default()
                .title(Text::plain(entry.title.clone()))
                .id(url.as_str())
                .updated(date)
                .authors(author_to_people(config.author.clone()))
                .links(vec![LinkBuilder::default()
                    .href(url.as_str())
                    .rel("alternate".to_string())
                    .build()])
                .published(Some(date))
                .build(),
        );
    }
    Ok(atom_entries)
}

/// Posts carry date-only strings; the feed format wants full timestamps, so
/// every date becomes midnight UTC.
fn parse_date(date: &str) -> std::result::Result<FixedDateTime, ParseError> {
    let naive_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
    let naive_date_time = NaiveDateTime::new(naive_date, NaiveTime::from_hms(0, 0, 0));
    Ok(FixedOffset::east(0).from_utc_datetime(&naive_date_time))
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![PersonBuilder::default()
            .name(author.name)
            .email(author.email)
            .build()],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, Atom, URL, and
/// date-time parsing issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when there is an issue parsing a post's date.
    DateTimeParse(ParseError),

    /// Returned when a post URL can't be built under the site root.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::DateTimeParse(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::DateTimeParse(err) => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: ParseError) -> Error {
        Error::DateTimeParse(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when building post URLs.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
