//! Test tokens
//!
//! HS256 tokens signed with a throwaway secret. The client never verifies
//! signatures, so any secret works.

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

pub const TEST_TOKEN_SECRET: &[u8] = b"policy-desk-test-secret";

/// Signs `payload` as-is
pub fn mint_token(payload: &Value) -> String {
    encode(
        &Header::default(),
        payload,
        &EncodingKey::from_secret(TEST_TOKEN_SECRET),
    )
    .expect("test token encodes")
}

/// Token whose payload carries a numeric `id`
pub fn token_for_user(id: i64) -> String {
    mint_token(&json!({
        "id": id,
        "email": format!("user{}@example.com", id),
        "iat": 1_717_236_000,
    }))
}

/// Token with a payload that has no `id`
pub fn token_without_id() -> String {
    mint_token(&json!({ "email": "anonymous@example.com" }))
}
