//! Cookie-backed flash messages.
//!
//! Mutations queue a message, the next rendered page consumes and clears it.
//! The payload is JSON wrapped in URL-safe base64 so it survives cookie value
//! restrictions; undecodable cookies are silently dropped.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

pub(crate) const FLASH_COOKIE: &str = "foglio_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.into(),
        }
    }
}

/// Consume pending messages, clearing the cookie.
pub fn take_messages(jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
    let messages = jar
        .get(FLASH_COOKIE)
        .map(|cookie| decode(cookie.value()))
        .unwrap_or_default();

    let mut removal = Cookie::from(FLASH_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), messages)
}

/// Queue a message for the next rendered page.
pub fn push_message(jar: CookieJar, message: FlashMessage) -> CookieJar {
    let mut messages = jar
        .get(FLASH_COOKIE)
        .map(|cookie| decode(cookie.value()))
        .unwrap_or_default();
    messages.push(message);

    let mut cookie = Cookie::new(FLASH_COOKIE, encode(&messages));
    cookie.set_path("/");
    cookie.set_http_only(true);
    jar.add(cookie)
}

fn encode(messages: &[FlashMessage]) -> String {
    let serialized =
        serde_json::to_vec(messages).expect("serializing flash messages should succeed");
    URL_SAFE_NO_PAD.encode(serialized)
}

fn decode(raw: &str) -> Vec<FlashMessage> {
    URL_SAFE_NO_PAD
        .decode(raw)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}
