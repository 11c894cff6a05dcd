use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub username: String,
    pub password_hash: String,  // bcrypt, never the plaintext
    pub created_at: DateTime<Utc>,
    pub analyses_count: u64,
}
