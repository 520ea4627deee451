//! Users, profiles and the home dashboard.

use cardhub_model::{Deck, LoyaltyEvent, NewsPost, ProfileUpdate, User, UserProfile};
use cardhub_store::{decks, loyalty, users};
use serde::Serialize;

use crate::{Hub, HubError, Result};

const HOME_ITEMS: usize = 5;

/// What a user sees first: points, latest activity and news. Anonymous
/// visitors only get the news.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeDashboard {
    pub balance: i64,
    pub recent_events: Vec<LoyaltyEvent>,
    pub recent_decks: Vec<Deck>,
    pub news: Vec<NewsPost>,
}

impl Hub {
    pub fn create_user(&self, username: &str, is_staff: bool) -> Result<User> {
        let username = username.trim();
        if username.is_empty() || username.contains(char::is_whitespace) {
            return Err(HubError::invalid(format!("invalid username: {username:?}")));
        }
        Ok(users::create(self.store.conn(), username, is_staff)?)
    }

    pub fn user(&self, username: &str) -> Result<User> {
        users::find_by_username(self.store.conn(), username)?
            .ok_or_else(|| HubError::not_found("user", username.trim()))
    }

    pub fn users(&self) -> Result<Vec<User>> {
        Ok(users::list(self.store.conn())?)
    }

    /// The user's profile, created empty on first access.
    pub fn profile(&self, user: &User) -> Result<UserProfile> {
        let conn = self.store.conn();
        if let Some(profile) = users::profile(conn, user.id)? {
            return Ok(profile);
        }
        let profile = UserProfile::empty(user.id);
        users::save_profile(conn, &profile)?;
        Ok(profile)
    }

    pub fn update_profile(&self, user: &User, update: ProfileUpdate) -> Result<UserProfile> {
        let mut profile = self.profile(user)?;
        update.apply(&mut profile);
        users::save_profile(self.store.conn(), &profile)?;
        Ok(profile)
    }

    pub fn home(&self, user: Option<&User>) -> Result<HomeDashboard> {
        let news = self.recent_news(HOME_ITEMS)?;
        let Some(user) = user else {
            return Ok(HomeDashboard {
                news,
                ..HomeDashboard::default()
            });
        };
        let conn = self.store.conn();
        Ok(HomeDashboard {
            balance: loyalty::balance(conn, user.id)?,
            recent_events: loyalty::events(conn, user.id, Some(HOME_ITEMS))?,
            recent_decks: decks::recently_updated(conn, user.id, HOME_ITEMS)?,
            news,
        })
    }
}
