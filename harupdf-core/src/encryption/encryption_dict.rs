//! The `/Encrypt` dictionary of the standard security handler

use crate::encryption::{EncryptMode, SecurityKeys, StandardSecurityHandler};
use crate::objects::{Dictionary, Object};

/// Builds the dictionary referenced from the trailer's `/Encrypt`.
///
/// Its strings are written in clear; it is never passed through the cipher.
pub fn encryption_dictionary(handler: &StandardSecurityHandler, keys: &SecurityKeys) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set_name("Filter", "Standard");
    dict.set("V", handler.mode().version());
    dict.set("R", handler.mode().revision());
    if handler.mode() == EncryptMode::R3 {
        dict.set("Length", (handler.key_len() * 8) as i64);
    }
    dict.set("O", Object::hex(keys.owner_key.clone()));
    dict.set("U", Object::hex(keys.user_key.clone()));
    dict.set("P", handler.permissions().p_value() as i64);
    dict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryption::Permissions;

    #[test]
    fn test_r2_dictionary() {
        let handler = StandardSecurityHandler::new(b"owner", b"").unwrap();
        let keys = handler.compute_keys(&[0u8; 16]);
        let dict = encryption_dictionary(&handler, &keys);

        assert_eq!(dict.get("Filter").and_then(Object::as_name), Some("Standard"));
        assert_eq!(dict.get("V"), Some(&Object::Integer(1)));
        assert_eq!(dict.get("R"), Some(&Object::Integer(2)));
        assert_eq!(dict.get("Length"), None);
        assert_eq!(dict.get("P"), Some(&Object::Integer(-4)));
        assert_eq!(dict.get("O").and_then(Object::as_bytes).map(<[u8]>::len), Some(32));
    }

    #[test]
    fn test_r3_dictionary_carries_length() {
        let mut handler = StandardSecurityHandler::new(b"owner", b"user").unwrap();
        handler.set_mode(EncryptMode::R3, 16).unwrap();
        handler.set_permissions(Permissions::PRINT);
        let keys = handler.compute_keys(&[0u8; 16]);
        let dict = encryption_dictionary(&handler, &keys);

        assert_eq!(dict.get("V"), Some(&Object::Integer(2)));
        assert_eq!(dict.get("R"), Some(&Object::Integer(3)));
        assert_eq!(dict.get("Length"), Some(&Object::Integer(128)));
        assert_eq!(dict.get("P"), Some(&Object::Integer(-60)));
    }
}
