//! Per-user sessions.
//!
//! A session is identified by a random id that travels in a cookie as
//! `<id>.<signature>`. The signature is an HMAC-SHA256 of the id keyed with
//! the process session secret, so ids cannot be forged or altered by the
//! client. The tokens themselves stay server-side in a [`SessionStore`].
//!
//! A new id is minted for every completed authorization; ids presented by the
//! client are only ever looked up, never written to.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::sync::Mutex;

use crate::{types::Tokens, utils};

type HmacSha256 = Hmac<Sha256>;

/// Name of the cookie carrying the signed session id.
pub const SESSION_COOKIE: &str = "mixtape_session";

const SESSION_ID_LEN: usize = 32;

/// Storage for session tokens.
///
/// Implementations must be shareable between request handlers. The server
/// ships [`MemorySessionStore`]; a signed-cookie or external cache backed
/// store can be swapped in through [`crate::server::AppState::new`].
///
/// # Example
///
/// ```
/// let store = MemorySessionStore::new();
/// store.put("abc", tokens).await;
/// assert!(store.get("abc").await.is_some());
/// ```
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the tokens stored for `session_id`, if any.
    async fn get(&self, session_id: &str) -> Option<Tokens>;

    /// Stores `tokens` under `session_id`, replacing earlier tokens.
    async fn put(&self, session_id: &str, tokens: Tokens);
}

/// Sessions kept in process memory. Lost on restart, never expired.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Tokens>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Option<Tokens> {
        self.sessions.lock().await.get(session_id).cloned()
    }

    async fn put(&self, session_id: &str, tokens: Tokens) {
        self.sessions
            .lock()
            .await
            .insert(session_id.to_string(), tokens);
    }
}

/// Returns a new random session id of 32 alphanumeric characters.
pub fn new_session_id() -> String {
    utils::generate_random_string(SESSION_ID_LEN)
}

fn keyed_mac(secret: &str, session_id: &str) -> HmacSha256 {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC accepts keys of any length"),
    };
    mac.update(session_id.as_bytes());
    mac
}

/// Signs a session id for use as a cookie value.
///
/// # Arguments
///
/// * `secret` - The process session secret
/// * `session_id` - The id to sign
///
/// # Returns
///
/// `<id>.<signature>` with the signature base64url-encoded without padding.
///
/// # Example
///
/// ```
/// let value = sign_session_id("secret", "abc");
/// assert_eq!(verify_session_id("secret", &value), Some("abc".to_string()));
/// ```
pub fn sign_session_id(secret: &str, session_id: &str) -> String {
    let signature = keyed_mac(secret, session_id).finalize().into_bytes();
    format!("{}.{}", session_id, URL_SAFE_NO_PAD.encode(signature))
}

/// Returns the session id from a signed cookie value.
///
/// Returns `None` if the value is malformed, the signature is not valid
/// base64url, or it does not match. The comparison is constant-time.
pub fn verify_session_id(secret: &str, value: &str) -> Option<String> {
    let (session_id, given) = value.rsplit_once('.')?;
    if session_id.is_empty() {
        return None;
    }

    let given = URL_SAFE_NO_PAD.decode(given).ok()?;
    keyed_mac(secret, session_id)
        .verify_slice(&given)
        .ok()
        .map(|_| session_id.to_string())
}

/// Reads and verifies the session cookie from request headers.
///
/// All `Cookie` headers are searched; the first cookie named
/// [`SESSION_COOKIE`] decides the result.
pub fn session_id_from_headers(headers: &HeaderMap, secret: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| verify_session_id(secret, value))
}

/// Whether session cookies should carry the `Secure` attribute, which is the
/// case when the app is reached over https.
pub fn secure_cookies(redirect_uri: &str) -> bool {
    redirect_uri
        .get(..8)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
}

/// `Set-Cookie` header value carrying the signed session id.
///
/// The cookie is `HttpOnly`, `SameSite=Lax` and scoped to `/`. With `secure`
/// set it is also marked `Secure`.
pub fn session_cookie(secret: &str, session_id: &str, secure: bool) -> String {
    format!(
        "{name}={value}; Path=/; HttpOnly; SameSite=Lax{secure}",
        name = SESSION_COOKIE,
        value = sign_session_id(secret, session_id),
        secure = if secure { "; Secure" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn tokens(access_token: &str) -> Tokens {
        Tokens {
            access_token: access_token.to_string(),
            refresh_token: "refresh".to_string(),
            scope: String::new(),
            expires_in: 3600,
            obtained_at: 0,
        }
    }

    #[test]
    fn test_signed_id_round_trips() {
        let id = new_session_id();
        let value = sign_session_id("secret", &id);
        assert_eq!(verify_session_id("secret", &value), Some(id));
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let value = sign_session_id("secret", "abc");
        assert_eq!(verify_session_id("other", &value), None);
    }

    #[test]
    fn test_verify_rejects_swapped_id() {
        let value = sign_session_id("secret", "abc");
        let (_, sig) = value.split_once('.').unwrap();
        assert_eq!(verify_session_id("secret", &format!("abd.{}", sig)), None);
    }

    #[test]
    fn test_verify_rejects_malformed_values() {
        assert_eq!(verify_session_id("secret", "no-signature"), None);
        assert_eq!(verify_session_id("secret", ""), None);
        assert_eq!(verify_session_id("secret", ".sig"), None);
    }

    #[test]
    fn test_session_id_from_headers() {
        let mut headers = HeaderMap::new();
        let cookie = format!(
            "theme=dark; {}={}; other=1",
            SESSION_COOKIE,
            sign_session_id("secret", "abc")
        );
        headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());

        assert_eq!(
            session_id_from_headers(&headers, "secret"),
            Some("abc".to_string())
        );
        assert_eq!(session_id_from_headers(&HeaderMap::new(), "secret"), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("secret", "abc", false);
        assert!(cookie.starts_with(&format!("{}=abc.", SESSION_COOKIE)));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_session_cookie_secure_flag() {
        let cookie = session_cookie("secret", "abc", true);
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_secure_cookies_follows_redirect_scheme() {
        assert!(secure_cookies("https://mixtape.example.com/callback"));
        assert!(secure_cookies("HTTPS://mixtape.example.com/callback"));
        assert!(!secure_cookies("http://127.0.0.1:5000/callback"));
        assert!(!secure_cookies(""));
    }

    #[test]
    fn test_signature_is_hmac_sha256() {
        // RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?"
        let value = sign_session_id("Jefe", "what do ya want for nothing?");
        let (_, signature) = value.rsplit_once('.').unwrap();
        let expected =
            hex_to_bytes("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
        assert_eq!(URL_SAFE_NO_PAD.decode(signature).unwrap(), expected);
    }

    #[test]
    fn test_verify_rejects_appended_data() {
        let value = sign_session_id("secret", "abc");
        let (_, sig) = value.split_once('.').unwrap();
        assert_eq!(verify_session_id("secret", &format!("abc.extra.{}", sig)), None);
        assert_eq!(verify_session_id("secret", &format!("{}x", value)), None);
    }

    fn hex_to_bytes(hex: &str) -> Vec<u8> {
        (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_memory_store_put_and_get() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get("abc").await, None);

        store.put("abc", tokens("first")).await;
        store.put("abc", tokens("second")).await;
        store.put("xyz", tokens("third")).await;

        assert_eq!(store.get("abc").await.unwrap().access_token, "second");
        assert_eq!(store.get("xyz").await.unwrap().access_token, "third");
    }
}
