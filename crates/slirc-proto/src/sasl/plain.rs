//! PLAIN SASL mechanism (RFC 4616).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Encode credentials for the PLAIN mechanism with an empty authzid.
///
/// The payload is `NUL authcid NUL password`, base64-encoded.
pub fn encode_plain(username: &str, password: &str) -> String {
    encode_plain_with_authzid("", username, password)
}

/// Encode credentials for the PLAIN mechanism with an explicit authzid.
///
/// The payload is `authzid NUL authcid NUL password`, base64-encoded. IRC
/// bots conventionally pass the account name as both identities.
pub fn encode_plain_with_authzid(authzid: &str, authcid: &str, password: &str) -> String {
    let payload = [authzid.as_bytes(), authcid.as_bytes(), password.as_bytes()].join(&0u8);
    BASE64.encode(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_plain() {
        let encoded = encode_plain("testuser", "testpass");
        let decoded = BASE64.decode(&encoded).unwrap();
        assert_eq!(decoded, b"\0testuser\0testpass");
    }

    #[test]
    fn test_encode_plain_with_authzid() {
        let encoded = encode_plain_with_authzid("bot", "bot", "secret");
        let decoded = BASE64.decode(&encoded).unwrap();
        assert_eq!(decoded, b"bot\0bot\0secret");
        assert_eq!(encoded, "Ym90AGJvdABzZWNyZXQ=");
    }
}
