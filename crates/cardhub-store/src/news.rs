//! News posts.

use cardhub_model::{NewNewsPost, NewsPost};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;

use crate::{Result, StoreError};

const POST_COLUMNS: &str = "id, title, slug, summary, body, highlight, is_published, published_at";

fn row_to_post(row: &Row<'_>) -> rusqlite::Result<NewsPost> {
    Ok(NewsPost {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        summary: row.get(3)?,
        body: row.get(4)?,
        highlight: row.get(5)?,
        is_published: row.get(6)?,
        published_at: row.get(7)?,
    })
}

pub fn insert(
    conn: &Connection,
    post: &NewNewsPost,
    slug: &str,
    published_at: DateTime<Utc>,
) -> Result<NewsPost> {
    conn.execute(
        &format!(
            "INSERT INTO news_posts ({POST_COLUMNS})
             VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ),
        params![
            post.title,
            slug,
            post.summary,
            post.body,
            post.highlight,
            post.is_published,
            published_at,
        ],
    )
    .map_err(StoreError::from_insert("news post", slug))?;
    let id = conn.last_insert_rowid();
    info!(post_id = id, slug, "published news post");
    Ok(NewsPost {
        id,
        title: post.title.clone(),
        slug: slug.to_string(),
        summary: post.summary.clone(),
        body: post.body.clone(),
        highlight: post.highlight,
        is_published: post.is_published,
        published_at,
    })
}

pub fn slug_exists(conn: &Connection, slug: &str) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM news_posts WHERE slug = ?1)",
        [slug],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn published_by_slug(conn: &Connection, slug: &str) -> Result<Option<NewsPost>> {
    let post = conn
        .query_row(
            &format!("SELECT {POST_COLUMNS} FROM news_posts WHERE slug = ?1 AND is_published = 1"),
            [slug],
            row_to_post,
        )
        .optional()?;
    Ok(post)
}

/// Published posts newest first. `highlight` restricts to featured
/// (`Some(true)`) or regular (`Some(false)`) posts; `exclude` drops ids.
pub fn published(
    conn: &Connection,
    highlight: Option<bool>,
    exclude: &[i64],
    limit: usize,
) -> Result<Vec<NewsPost>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS} FROM news_posts
         WHERE is_published = 1 AND (?1 IS NULL OR highlight = ?1)
         ORDER BY published_at DESC, id DESC"
    ))?;
    let mut posts = Vec::new();
    for post in stmt.query_map([highlight], row_to_post)? {
        let post = post?;
        if exclude.contains(&post.id) {
            continue;
        }
        posts.push(post);
        if posts.len() == limit {
            break;
        }
    }
    Ok(posts)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let removed = conn.execute("DELETE FROM news_posts WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(StoreError::not_found("news post", id));
    }
    Ok(())
}
