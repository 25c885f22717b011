use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::Duration;

use super::identity::LoginWidgetAuth;
use crate::core::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Parses a Telegram initData query string into decoded key/value pairs
///
/// Pairs without `=` or with undecodable values are skipped.
pub fn parse_init_data(init_data: &str) -> HashMap<String, String> {
    init_data
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let decoded = urlencoding::decode(value).ok()?;
            Some((key.to_string(), decoded.into_owned()))
        })
        .collect()
}

/// Extracts `user.id` from initData WITHOUT checking the signature
///
/// This is what the Mini-App runtime exposes as `initDataUnsafe.user.id`.
pub fn extract_user_id(init_data: &str) -> AppResult<i64> {
    let params = parse_init_data(init_data);
    user_id_from_params(&params)
}

/// Verifies Telegram Web App initData and returns the user id
///
/// Telegram signs the data with HMAC-SHA256; the key is
/// `HMAC_SHA256(key = "WebAppData", msg = bot_token)`, the message is every
/// parameter except `hash`, sorted by key and joined as `key=value` lines.
///
/// # Errors
/// Missing or mismatching hash, stale `auth_date`, missing user.
pub fn verify_init_data(init_data: &str, bot_token: &str, max_age: Duration) -> AppResult<i64> {
    verify_init_data_at(init_data, bot_token, max_age, chrono::Utc::now().timestamp())
}

pub(crate) fn verify_init_data_at(init_data: &str, bot_token: &str, max_age: Duration, now: i64) -> AppResult<i64> {
    let params = parse_init_data(init_data);

    let received_hash = params
        .get("hash")
        .ok_or_else(|| AppError::Validation("Missing hash parameter".to_string()))?;

    let mut check_pairs: Vec<String> = params
        .iter()
        .filter(|(key, _)| key.as_str() != "hash")
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    check_pairs.sort();
    let data_check_string = check_pairs.join("\n");

    let secret_key = hmac_sha256(b"WebAppData", bot_token.as_bytes())?;
    verify_hash(&secret_key, &data_check_string, received_hash)?;

    if let Some(auth_date) = params.get("auth_date").and_then(|v| v.parse::<i64>().ok()) {
        check_age(auth_date, max_age, now)?;
    }

    user_id_from_params(&params)
}

/// Verifies a Login Widget auth object and returns the user id
///
/// Unlike initData, the widget uses `SHA256(bot_token)` directly as the key.
pub fn verify_login_widget(auth: &LoginWidgetAuth, bot_token: &str, max_age: Duration) -> AppResult<i64> {
    verify_login_widget_at(auth, bot_token, max_age, chrono::Utc::now().timestamp())
}

pub(crate) fn verify_login_widget_at(
    auth: &LoginWidgetAuth,
    bot_token: &str,
    max_age: Duration,
    now: i64,
) -> AppResult<i64> {
    let secret_key = Sha256::digest(bot_token.as_bytes());
    verify_hash(&secret_key, &auth.data_check_string(), &auth.hash)?;
    check_age(auth.auth_date, max_age, now)?;
    Ok(auth.id)
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> AppResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| AppError::Validation(format!("HMAC key: {}", e)))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn verify_hash(secret_key: &[u8], data_check_string: &str, received_hex: &str) -> AppResult<()> {
    let received =
        hex::decode(received_hex).map_err(|_| AppError::Validation("Hash is not valid hex".to_string()))?;
    let mut mac =
        HmacSha256::new_from_slice(secret_key).map_err(|e| AppError::Validation(format!("HMAC key: {}", e)))?;
    mac.update(data_check_string.as_bytes());
    mac.verify_slice(&received)
        .map_err(|_| AppError::Validation("Invalid hash - data may be tampered".to_string()))
}

fn check_age(auth_date: i64, max_age: Duration, now: i64) -> AppResult<()> {
    let age_seconds = now.saturating_sub(auth_date);
    if age_seconds > i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX) {
        return Err(AppError::Validation(format!("Auth data is too old ({} seconds)", age_seconds)));
    }
    Ok(())
}

fn user_id_from_params(params: &HashMap<String, String>) -> AppResult<i64> {
    let user_json = params
        .get("user")
        .ok_or_else(|| AppError::Validation("Missing user parameter".to_string()))?;

    let user: serde_json::Value = serde_json::from_str(user_json)?;

    user.get("id")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| AppError::Validation("Missing user id in user JSON".to_string()))
}
