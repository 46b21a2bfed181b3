use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The logged-in identity restored from the durable store. There is a single
/// session per process; cells receive this through request extensions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub contact: String,
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl SessionUser {
    pub fn new(contact: &str) -> Self {
        Self {
            contact: contact.to_string(),
            logged_in_at: Some(Utc::now()),
        }
    }

    /// Avatar initial shown in the profile menu.
    pub fn initial(&self) -> String {
        self.contact
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }
}
