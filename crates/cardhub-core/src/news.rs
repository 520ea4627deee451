use cardhub_model::{NewNewsPost, NewsPost, slugify};
use cardhub_store::news;
use chrono::Utc;
use serde::Serialize;

use crate::{Hub, HubError, Result};

/// Highlighted posts at the top of the feed.
pub const FEATURED_LIMIT: usize = 5;
/// Remaining posts listed below the featured ones.
pub const OTHER_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewsFeed {
    pub featured: Vec<NewsPost>,
    pub others: Vec<NewsPost>,
}

/// First of `base`, `base-2`, `base-3`, ... that is not taken. An empty
/// base falls back to `post`.
pub fn unique_slug<E>(
    base: &str,
    mut is_taken: impl FnMut(&str) -> std::result::Result<bool, E>,
) -> std::result::Result<String, E> {
    let base = if base.is_empty() { "post" } else { base };
    if !is_taken(base)? {
        return Ok(base.to_string());
    }
    let mut suffix = 2_u32;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !is_taken(&candidate)? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

impl Hub {
    /// Store a post under a slug derived from its title.
    pub fn publish_news(&mut self, post: NewNewsPost) -> Result<NewsPost> {
        let title = post.title.trim();
        if title.is_empty() {
            return Err(HubError::invalid("news title is required"));
        }
        let post = NewNewsPost {
            title: title.to_string(),
            ..post
        };
        self.store.write(|conn| {
            let slug = unique_slug(&slugify(&post.title), |slug| news::slug_exists(conn, slug))?;
            Ok(news::insert(conn, &post, &slug, Utc::now())?)
        })
    }

    /// Published posts: highlighted ones first, then the rest, newest first.
    pub fn news_feed(&self) -> Result<NewsFeed> {
        let conn = self.store.conn();
        let featured = news::published(conn, Some(true), &[], FEATURED_LIMIT)?;
        let featured_ids: Vec<i64> = featured.iter().map(|post| post.id).collect();
        let others = news::published(conn, None, &featured_ids, OTHER_LIMIT)?;
        Ok(NewsFeed { featured, others })
    }

    pub fn recent_news(&self, limit: usize) -> Result<Vec<NewsPost>> {
        Ok(news::published(self.store.conn(), None, &[], limit)?)
    }

    /// A published post; drafts are reported as missing.
    pub fn news_post(&self, slug: &str) -> Result<NewsPost> {
        news::published_by_slug(self.store.conn(), slug)?
            .ok_or_else(|| HubError::not_found("news post", slug))
    }

    pub fn delete_news(&self, id: i64) -> Result<()> {
        Ok(news::delete(self.store.conn(), id)?)
    }
}
