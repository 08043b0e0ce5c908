use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Mutex;
use uuid::Uuid;

/// Authenticated client context attached to requests by the session middleware
#[derive(Clone, Debug)]
pub struct ClientIdentity {
    pub client_id: Uuid,
    pub name: String,
}

#[derive(Debug)]
struct SessionEntry {
    client_id: Uuid,
    name: String,
    expires_at: DateTime<Utc>,
}

/// In-memory bearer-token session store.
///
/// Constructed once at startup and shared through the application state.
/// Tokens carry a fixed validity window from issuance; validation does not
/// extend it. Entries are only evicted when a lookup finds them expired, so
/// the map grows with issuance. State is lost on restart and clients simply
/// re-authenticate.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl_days: i64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl: Duration::days(ttl_days),
        }
    }

    #[cfg(test)]
    fn with_ttl(ttl: Duration) -> Self {
        Self { sessions: Mutex::new(HashMap::new()), ttl }
    }

    /// Issue a fresh opaque token bound to the given client identity.
    pub fn issue(&self, client_id: Uuid, name: &str) -> String {
        let token = generate_token();
        let entry = SessionEntry {
            client_id,
            name: name.to_string(),
            expires_at: Utc::now() + self.ttl,
        };

        let mut sessions = self.sessions.lock().expect("session registry poisoned");
        sessions.insert(token.clone(), entry);
        token
    }

    /// Look up a token. Expired entries are removed on the way out.
    pub fn validate(&self, token: &str) -> Option<ClientIdentity> {
        let mut sessions = self.sessions.lock().expect("session registry poisoned");

        let expired = match sessions.get(token) {
            None => return None,
            Some(entry) => entry.expires_at <= Utc::now(),
        };

        if expired {
            sessions.remove(token);
            return None;
        }

        sessions.get(token).map(|entry| ClientIdentity {
            client_id: entry.client_id,
            name: entry.name.clone(),
        })
    }
}

/// 32 random bytes, hex-encoded: 256 bits of entropy in 64 characters.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);

    let mut token = String::with_capacity(64);
    for b in bytes {
        let _ = write!(token, "{:02x}", b);
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_validates_to_same_identity() {
        let registry = SessionRegistry::new(7);
        let client_id = Uuid::new_v4();

        let token = registry.issue(client_id, "Ana");
        let identity = registry.validate(&token).expect("token should be valid");

        assert_eq!(identity.client_id, client_id);
        assert_eq!(identity.name, "Ana");
    }

    #[test]
    fn unknown_token_is_rejected() {
        let registry = SessionRegistry::new(7);
        assert!(registry.validate("deadbeef").is_none());
    }

    #[test]
    fn expired_token_is_rejected_and_purged() {
        let registry = SessionRegistry::with_ttl(Duration::seconds(-1));
        let token = registry.issue(Uuid::new_v4(), "Ana");

        assert!(registry.validate(&token).is_none());
        // Entry was removed, not just hidden
        assert!(registry.sessions.lock().unwrap().is_empty());
    }

    #[test]
    fn validation_does_not_extend_expiry() {
        let registry = SessionRegistry::new(7);
        let token = registry.issue(Uuid::new_v4(), "Ana");

        let before = registry.sessions.lock().unwrap()[&token].expires_at;
        registry.validate(&token);
        let after = registry.sessions.lock().unwrap()[&token].expires_at;

        assert_eq!(before, after);
    }

    #[test]
    fn tokens_are_64_hex_chars_and_unique() {
        let registry = SessionRegistry::new(7);
        let a = registry.issue(Uuid::new_v4(), "a");
        let b = registry.issue(Uuid::new_v4(), "b");

        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
