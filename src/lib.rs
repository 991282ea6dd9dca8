//! The library code for the `glacier` static site generator. The content tree
//! is the database: directory and file names encode each page's and post's
//! identity (slug, and for posts year/month/day), so there is no separate
//! index to maintain or invalidate. The architecture follows the data:
//!
//! 1. Scanning the content tree into identity-bearing items ([`crate::scan`])
//! 2. Mapping identity to storage and back ([`crate::resolve`])
//! 3. Enumerating every servable route ([`crate::route`])
//! 4. Freezing the routes into a static output tree ([`crate::freeze`])
//!
//! Of these, the first three are the interesting part: the content
//! resolution engine. Freezing is mostly plumbing. It renders each enumerated
//! route through the theme templates ([`crate::markdown`], front matter via
//! [`crate::frontmatter`]), writes the blog listing ([`crate::listing`]) and
//! the Atom feed ([`crate::feed`]), and copies post assets verbatim.
//!
//! Everything is recomputed from the filesystem on demand; no scan result is
//! cached, so a freeze after a content change needs no process restart. The
//! write side lives in [`crate::new`], which scaffolds content under the same
//! naming conventions the scanner reads back.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod config;
pub mod feed;
pub mod freeze;
pub mod frontmatter;
pub mod listing;
pub mod markdown;
pub mod new;
pub mod resolve;
pub mod route;
pub mod scan;
pub mod slug;
