//! The blog listing: every post's title, date, and identity, most recent
//! first. The listing is assembled from enumerated post routes plus each
//! post's front matter; it doesn't care how the metadata was parsed, only
//! that a title and a `YYYY-MM-DD` date come back for each post.

use crate::config::Config;
use crate::frontmatter;
use crate::resolve::{self, Resolver};
use crate::route::{self, Route};
use crate::scan::PostId;
use std::fmt;
use std::fs;
use std::io;

/// One listing row. Carries the full post identity so consumers (the listing
/// template, the feed) can build the post's URL under either URL style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub id: PostId,
    pub title: String,

    /// The publish date, `YYYY-MM-DD`. String comparison is date comparison.
    pub date: String,
}

impl Entry {
    pub fn slug(&self) -> &str {
        &self.id.slug
    }
}

/// Orders entries by date descending. The sort is stable, so posts sharing a
/// date keep their relative input order; there is no hidden secondary key.
pub fn build_listing(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

/// Enumerates post routes, joins each with its front matter, and returns the
/// ordered listing.
pub fn collect(config: &Config) -> Result<Vec<Entry>> {
    let resolver = Resolver::new(config);
    let mut entries = Vec::new();
    for route in route::enumerate(config)? {
        if let Route::Post(id) = route {
            let relative = resolver.resolve_post(&id)?;
            let contents = fs::read_to_string(config.content_directory.join(relative))?;
            let (frontmatter, _) = frontmatter::parse(&contents)?;
            entries.push(Entry {
                id,
                title: frontmatter.title,
                date: frontmatter.date,
            });
        }
    }
    Ok(build_listing(entries))
}

/// The result of building a listing.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a listing failure: enumeration, resolution, front matter, or
/// plain I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors enumerating post routes.
    Enumerate(route::Error),

    /// Returned for errors resolving a post route back to disk.
    Resolve(resolve::Error),

    /// Returned for errors in a post's front matter.
    Frontmatter(frontmatter::Error),

    /// Returned for other I/O errors.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Enumerate(err) => err.fmt(f),
            Error::Resolve(err) => err.fmt(f),
            Error::Frontmatter(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Enumerate(err) => Some(err),
            Error::Resolve(err) => Some(err),
            Error::Frontmatter(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<route::Error> for Error {
    /// Converts [`route::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator around enumeration.
    fn from(err: route::Error) -> Error {
        Error::Enumerate(err)
    }
}

impl From<resolve::Error> for Error {
    /// Converts [`resolve::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator around resolution.
    fn from(err: resolve::Error) -> Error {
        Error::Resolve(err)
    }
}

impl From<frontmatter::Error> for Error {
    /// Converts [`frontmatter::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator around front-matter parsing.
    fn from(err: frontmatter::Error) -> Error {
        Error::Frontmatter(err)
    }
}

impl From<io::Error> for Error {
    /// Converts [`io::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{Author, DirLayout, UrlStyle};
    use crate::scan::PostDate;
    use std::path::Path;
    use tempfile::TempDir;
    use url::Url;

    fn entry(title: &str, date: &str, slug: &str) -> Entry {
        let (year, rest) = date.split_at(4);
        let (month, day) = (&rest[1..3], &rest[4..6]);
        Entry {
            id: PostId {
                date: PostDate {
                    year: year.to_owned(),
                    month: month.to_owned(),
                    day: day.to_owned(),
                },
                slug: slug.to_owned(),
            },
            title: title.to_owned(),
            date: date.to_owned(),
        }
    }

    #[test]
    fn test_listing_sorted_date_descending() {
        let listing = build_listing(vec![
            entry("Old", "2020-01-01", "old"),
            entry("New", "2021-06-15", "new"),
        ]);
        let slugs: Vec<&str> = listing.iter().map(Entry::slug).collect();
        assert_eq!(slugs, vec!["new", "old"]);
    }

    #[test]
    fn test_listing_ties_keep_input_order() {
        let listing = build_listing(vec![
            entry("Tie A", "2020-01-01", "tie-a"),
            entry("Mid", "2021-06-15", "mid"),
            entry("Tie B", "2020-01-01", "tie-b"),
        ]);
        let slugs: Vec<&str> = listing.iter().map(Entry::slug).collect();
        assert_eq!(slugs, vec!["mid", "tie-a", "tie-b"]);
    }

    #[test]
    fn test_collect_joins_front_matter() -> Result<()> {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "2021-03-14-my-first-post",
            "my-first-post",
            "title: My First Post\ndate: 2021-03-14\n\nHello.",
        );
        write_post(
            tmp.path(),
            "2022-06-15-later-post",
            "later-post",
            "title: Later Post\ndate: 2022-06-15\n\nMore.",
        );

        let config = Config {
            title: String::from("Test Blog"),
            site_root: Url::parse("https://example.com/").unwrap(),
            author: Some(Author {
                name: String::from("Test Author"),
                email: None,
            }),
            layout: DirLayout::Flat,
            url_style: UrlStyle::Dated,
            content_directory: tmp.path().to_owned(),
            output_directory: tmp.path().join("_build"),
            page_template: Vec::new(),
            post_template: Vec::new(),
            listing_template: Vec::new(),
        };
        let listing = collect(&config)?;
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].title, "Later Post");
        assert_eq!(listing[1].title, "My First Post");
        Ok(())
    }

    fn write_post(root: &Path, dir: &str, slug: &str, contents: &str) {
        let dir = root.join("posts").join(dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{}.md", slug)), contents).unwrap();
    }
}
