use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub body: String,
    pub highlight: bool,
    pub is_published: bool,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewNewsPost {
    pub title: String,
    pub summary: String,
    pub body: String,
    pub highlight: bool,
    pub is_published: bool,
}

/// Lower-case ASCII slug with single dashes between words.
///
/// Accented Latin letters are folded to their base letter; anything else
/// that is not alphanumeric becomes a separator.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        let folded = fold_accent(ch.to_lowercase().next().unwrap_or(ch));
        if folded.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(folded);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
