//! The content scanner. Walks the content root and classifies what it finds
//! by naming convention alone: top-level `*.md` files are pages, directories
//! under `posts/` whose names match the active layout's date-slug pattern are
//! posts. The directory tree itself is the content index: identity (slug,
//! year, month, day) is derived per-entry from names, never from a separate
//! database, so listing order and stray files are irrelevant.
//!
//! Entries that don't match any recognized pattern are silently skipped.
//! That is deliberate: a `posts/scratch-notes/` directory is not an error,
//! it just isn't content.

use crate::config::{Config, DirLayout};
use regex::Regex;
use std::fs::read_dir;
use std::io;
use std::path::{Path, PathBuf};

/// A post's date as zero-padded digit strings, exactly as they appear in the
/// directory name. Never parsed as a calendar date at this layer; only the
/// feed builder interprets dates, and only at the last moment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostDate {
    pub year: String,
    pub month: String,
    pub day: String,
}

/// The full identity of a post: its date plus its slug. This is what the
/// resolver reconstructs a directory name from and what every post route
/// carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostId {
    pub date: PostDate,
    pub slug: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Page,
    Post(PostDate),
}

/// One unit of publishable content, derived (not stored): recomputed from the
/// filesystem on every scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentItem {
    pub kind: Kind,

    /// The URL-safe identifier: the file stem for pages, the directory-name
    /// slug capture for posts.
    pub slug: String,

    /// The content file's location relative to the content root.
    pub relative_path: PathBuf,
}

impl ContentItem {
    /// The post identity for post items, `None` for pages.
    pub fn post_id(&self) -> Option<PostId> {
        match &self.kind {
            Kind::Post(date) => Some(PostId {
                date: date.clone(),
                slug: self.slug.clone(),
            }),
            Kind::Page => None,
        }
    }
}

const MARKDOWN_EXTENSION: &str = ".md";

/// Enumerates all content under the configured root: pages first, then posts.
/// Results are sorted by name within each kind so a scan of an unchanged tree
/// is identical on every platform (`read_dir` order is OS-dependent).
pub fn scan(config: &Config) -> io::Result<Vec<ContentItem>> {
    let mut items = scan_pages(&config.content_directory)?;
    items.extend(scan_posts(&config.content_directory, config.layout)?);
    Ok(items)
}

fn scan_pages(root: &Path) -> io::Result<Vec<ContentItem>> {
    let mut items = Vec::new();
    for result in read_dir(root)? {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if let Some(stem) = file_name.strip_suffix(MARKDOWN_EXTENSION) {
            // Only the final `.md` is the extension; a file named
            // `notes.md.md` is the page `notes.md`.
            if entry.file_type()?.is_file() {
                items.push(ContentItem {
                    kind: Kind::Page,
                    slug: stem.to_owned(),
                    relative_path: PathBuf::from(file_name.as_ref()),
                });
            }
        }
    }
    items.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(items)
}

fn scan_posts(root: &Path, layout: DirLayout) -> io::Result<Vec<ContentItem>> {
    let posts_root = root.join("posts");
    let mut items = Vec::new();
    match layout {
        DirLayout::Flat => {
            // The full date is encoded in each directory name.
            let pattern = Regex::new(
                r"^(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})-(?P<slug>[\w-]+)$",
            )
            .unwrap(); // the pattern is a literal; it always compiles
            for name in subdirectories(&posts_root)? {
                if let Some(captures) = pattern.captures(&name) {
                    push_post(
                        &mut items,
                        root,
                        PathBuf::from("posts").join(&name),
                        PostDate {
                            year: captures["year"].to_owned(),
                            month: captures["month"].to_owned(),
                            day: captures["day"].to_owned(),
                        },
                        captures["slug"].to_owned(),
                    );
                }
            }
        }
        DirLayout::NestedYear => {
            // The year is a directory level of its own; month and day stay in
            // the post directory name.
            let year_pattern = Regex::new(r"^\d{4}$").unwrap();
            let pattern =
                Regex::new(r"^(?P<month>\d{2})-(?P<day>\d{2})-(?P<slug>[\w-]+)$").unwrap();
            for year in subdirectories(&posts_root)? {
                if !year_pattern.is_match(&year) {
                    continue;
                }
                for name in subdirectories(&posts_root.join(&year))? {
                    if let Some(captures) = pattern.captures(&name) {
                        push_post(
                            &mut items,
                            root,
                            PathBuf::from("posts").join(&year).join(&name),
                            PostDate {
                                year: year.clone(),
                                month: captures["month"].to_owned(),
                                day: captures["day"].to_owned(),
                            },
                            captures["slug"].to_owned(),
                        );
                    }
                }
            }
        }
    }
    items.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(items)
}

/// Admits a matched post directory as a [`ContentItem`], provided its
/// canonical content file (`<slug>.md`) actually exists. Directories that
/// match the name pattern but lack the content file are skipped like any
/// other stray entry, so enumeration never emits an unresolvable route.
fn push_post(
    items: &mut Vec<ContentItem>,
    root: &Path,
    dir: PathBuf,
    date: PostDate,
    slug: String,
) {
    let relative_path = dir.join(format!("{}{}", slug, MARKDOWN_EXTENSION));
    if root.join(&relative_path).is_file() {
        items.push(ContentItem {
            kind: Kind::Post(date),
            slug,
            relative_path,
        });
    }
}

/// The sorted names of `dir`'s UTF-8-named subdirectories. A missing `dir` is
/// an empty posts tree, not an error; any other I/O failure propagates.
fn subdirectories(dir: &Path) -> io::Result<Vec<String>> {
    let entries = match read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut names = Vec::new();
    for result in entries {
        let entry = result?;
        if entry.file_type()?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}
