//! The freeze driver: stitches together the high-level steps of producing the
//! deployable static site. It enumerates every route ([`crate::route`]),
//! resolves each back to its source ([`crate::resolve`]), renders pages and
//! posts through the theme templates, copies post assets verbatim, writes the
//! blog listing page, and generates the Atom feed ([`crate::feed`]).
//!
//! Unresolvable routes can't happen here, since the enumerator only emits
//! routes the resolver can satisfy: every error out of a freeze is a real I/O or
//! template problem, never a 404.

use crate::config::Config;
use crate::feed;
use crate::frontmatter;
use crate::listing::{self, Entry};
use crate::markdown;
use crate::resolve::{self, Resolver};
use crate::route::{self, Route};
use gtmpl::{Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Freezes the whole site into `config.output_directory`. The old output
/// directory is blown away first so stale routes don't linger between runs.
pub fn freeze(config: &Config) -> Result<()> {
    let page_template = parse_template(config.page_template.iter())?;
    let post_template = parse_template(config.post_template.iter())?;
    let listing_template = parse_template(config.listing_template.iter())?;

    rmdir(&config.output_directory)?;
    std::fs::create_dir_all(&config.output_directory)?;

    Freezer {
        config,
        resolver: Resolver::new(config),
        page_template: &page_template,
        post_template: &post_template,
        listing_template: &listing_template,
    }
    .freeze()
}

struct Freezer<'a> {
    config: &'a Config,
    resolver: Resolver<'a>,

    /// The template for top-level pages (including the home page).
    page_template: &'a Template,

    /// The template for single posts.
    post_template: &'a Template,

    /// The template for the blog listing page.
    listing_template: &'a Template,
}

impl Freezer<'_> {
    fn freeze(&self) -> Result<()> {
        for route in route::enumerate(self.config)? {
            self.write_route(&route)?;
        }

        let listing = listing::collect(self.config)?;
        self.write_listing(&listing)?;
        feed::write_feed(
            self.config,
            &listing,
            File::create(self.config.output_directory.join("atom.xml"))?,
        )?;
        Ok(())
    }

    fn write_route(&self, route: &Route) -> Result<()> {
        match route {
            Route::Page { path } => self.render_content(
                route,
                self.page_template,
                &PathBuf::from(format!("{}.md", path)),
            ),
            Route::Post(id) => {
                let relative = self.resolver.resolve_post(id)?;
                self.render_content(route, self.post_template, &relative)
            }
            Route::PostAsset { post, filename } => {
                let assets_dir = self.resolver.resolve_asset_dir(post)?;
                let source = self
                    .config
                    .content_directory
                    .join(assets_dir)
                    .join(filename);
                let target = self
                    .config
                    .output_directory
                    .join(route.output_path(self.config));
                // output paths always end in a file name
                std::fs::create_dir_all(target.parent().unwrap())?;
                std::fs::copy(&source, &target)?;
                Ok(())
            }
        }
    }

    /// Reads a content file, splits front matter from body, renders the body
    /// to HTML, and templates the result into the route's output file.
    fn render_content(&self, route: &Route, template: &Template, relative: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(self.config.content_directory.join(relative))?;
        let (frontmatter, body_markdown) = frontmatter::parse(&contents)?;
        let mut body = String::new();
        markdown::to_html(&mut body, body_markdown);

        let mut item: HashMap<String, Value> = HashMap::new();
        item.insert("title".to_owned(), Value::String(frontmatter.title));
        item.insert("date".to_owned(), Value::String(frontmatter.date));
        item.insert(
            "tags".to_owned(),
            Value::Array(frontmatter.tags.into_iter().map(Value::String).collect()),
        );
        item.insert("body".to_owned(), Value::String(body));
        item.insert(
            "url".to_owned(),
            Value::String(route.url(self.config)?.to_string()),
        );

        self.write_page(
            template,
            Value::Object(item),
            &route.output_path(self.config),
        )
    }

    fn write_listing(&self, listing: &[Entry]) -> Result<()> {
        let mut rows = Vec::with_capacity(listing.len());
        for entry in listing {
            let mut row: HashMap<String, Value> = HashMap::new();
            row.insert("title".to_owned(), Value::String(entry.title.clone()));
            row.insert("date".to_owned(), Value::String(entry.date.clone()));
            row.insert("slug".to_owned(), Value::String(entry.slug().to_owned()));
            row.insert(
                "url".to_owned(),
                Value::String(
                    Route::Post(entry.id.clone())
                        .url(self.config)?
                        .to_string(),
                ),
            );
            rows.push(Value::Object(row));
        }
        self.write_page(
            self.listing_template,
            Value::Array(rows),
            Path::new("blog/index.html"),
        )
    }

    /// Takes a single rendered item, wraps it with the site-wide template
    /// context, and writes it to disk.
    fn write_page(&self, template: &Template, item: Value, output_relative: &Path) -> Result<()> {
        let mut context: HashMap<String, Value> = HashMap::new();
        context.insert("item".to_owned(), item);
        context.insert(
            "site_title".to_owned(),
            Value::String(self.config.title.clone()),
        );
        context.insert(
            "home_page".to_owned(),
            Value::String(self.config.site_root.to_string()),
        );

        let path = self.config.output_directory.join(output_relative);
        // output paths always end in a file name
        std::fs::create_dir_all(path.parent().unwrap())?;
        template.execute(
            &mut File::create(&path)?,
            &gtmpl::Context::from(Value::Object(context)).unwrap(),
        )?;
        Ok(())
    }
}

// Loads the template file contents, appends them to one another, and parses
// the result into a template. Chains exist because the template engine has no
// inheritance; a theme supplies base blocks first.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for freezing a site: enumeration, resolution, front matter,
/// templates, the feed, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors enumerating routes.
    Enumerate(route::Error),

    /// Returned for errors resolving a route back to disk.
    Resolve(resolve::Error),

    /// Returned for errors assembling the blog listing.
    Listing(listing::Error),

    /// Returned for errors in a content file's front matter.
    Frontmatter(frontmatter::Error),

    /// Returned for errors writing the feed.
    Feed(feed::Error),

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for errors executing a template against a page context.
    Template(String),

    /// Returned when a route URL can't be built under the site root.
    UrlParse(url::ParseError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Enumerate(err) => err.fmt(f),
            Error::Resolve(err) => err.fmt(f),
            Error::Listing(err) => err.fmt(f),
            Error::Frontmatter(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
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
            Error::Listing(err) => Some(err),
            Error::Frontmatter(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Template(_) => None,
            Error::UrlParse(err) => Some(err),
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

impl From<listing::Error> for Error {
    /// Converts [`listing::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator around listing assembly.
    fn from(err: listing::Error) -> Error {
        Error::Listing(err)
    }
}

impl From<frontmatter::Error> for Error {
    /// Converts [`frontmatter::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator around front-matter parsing.
    fn from(err: frontmatter::Error) -> Error {
        Error::Frontmatter(err)
    }
}

impl From<feed::Error> for Error {
    /// Converts [`feed::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator around feed generation.
    fn from(err: feed::Error) -> Error {
        Error::Feed(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for template execution.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when building route URLs.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
