use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub full_name: String,
    /// Phone or WhatsApp contact.
    pub phone: String,
    /// In-game player nickname.
    pub nickname: String,
    pub receive_news: bool,
}

impl UserProfile {
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            full_name: String::new(),
            phone: String::new(),
            nickname: String::new(),
            receive_news: true,
        }
    }

    pub fn display_name<'a>(&'a self, user: &'a User) -> &'a str {
        if self.full_name.trim().is_empty() {
            &user.username
        } else {
            &self.full_name
        }
    }
}

/// Partial profile update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub nickname: Option<String>,
    pub receive_news: Option<bool>,
}

impl ProfileUpdate {
    pub fn apply(self, profile: &mut UserProfile) {
        if let Some(full_name) = self.full_name {
            profile.full_name = full_name.trim().to_string();
        }
        if let Some(phone) = self.phone {
            profile.phone = phone.trim().to_string();
        }
        if let Some(nickname) = self.nickname {
            profile.nickname = nickname.trim().to_string();
        }
        if let Some(receive_news) = self.receive_news {
            profile.receive_news = receive_news;
        }
    }
}
