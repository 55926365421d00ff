//! Paginated access to the commit-hosting API.

pub mod client;
pub mod fetch;

pub use client::{CollectConfig, ForgejoClient};
pub use fetch::{collect_all, collect_repo};

use crate::error::Result;
use crate::model::{RawCommit, RawRepo};

/// One page of a paginated listing. Pages are numbered from 1; an empty page
/// (or a missing one) ends the listing.
pub trait CommitSource {
    fn repos_page(&self, page: u32) -> Result<Vec<RawRepo>>;

    fn commits_page(&self, repo: &str, page: u32) -> Result<Vec<RawCommit>>;
}

/// Request pages 1, 2, 3, ... until one comes back empty. Each page number is
/// requested exactly once; the empty page is not kept.
pub fn paginate<T, F>(mut fetch: F) -> Result<Vec<Vec<T>>>
where
    F: FnMut(u32) -> Result<Vec<T>>,
{
    let mut pages = Vec::new();
    let mut page = 1u32;
    loop {
        let items = fetch(page)?;
        if items.is_empty() {
            return Ok(pages);
        }
        pages.push(items);
        page += 1;
    }
}

pub fn list_repos<S: CommitSource + ?Sized>(source: &S) -> Result<Vec<RawRepo>> {
    let pages = paginate(|page| source.repos_page(page))?;
    Ok(pages.into_iter().flatten().collect())
}
