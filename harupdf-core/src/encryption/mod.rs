//! RC4 encryption with the standard security handler (revisions 2 and 3).

mod encryption_dict;
mod permissions;
mod rc4;
mod standard_security;

pub use encryption_dict::encryption_dictionary;
pub use permissions::Permissions;
pub use rc4::{rc4, Rc4};
pub use standard_security::{object_key, EncryptMode, SecurityKeys, StandardSecurityHandler};

use crate::error::Result;
use crate::objects::{Object, ObjectId};

/// Applies the file key to the strings and streams of serialized objects.
pub struct ObjectEncryptor {
    encryption_key: Vec<u8>,
}

impl ObjectEncryptor {
    pub fn new(keys: &SecurityKeys) -> Self {
        Self {
            encryption_key: keys.encryption_key.clone(),
        }
    }

    /// Encrypts every string and stream payload inside the object numbered `id`.
    ///
    /// Encrypted literal strings become hex strings.
    pub fn encrypt_object(&self, id: ObjectId, object: &mut Object) -> Result<()> {
        let key = object_key(&self.encryption_key, id);
        encrypt_in_place(&key, object)
    }
}

fn encrypt_in_place(key: &[u8], object: &mut Object) -> Result<()> {
    match object {
        Object::String(bytes) | Object::HexString(bytes) => {
            let encrypted = rc4(key, bytes);
            *object = Object::HexString(encrypted);
        }
        Object::Array(items) => {
            for item in items.iter_mut() {
                encrypt_in_place(key, item)?;
            }
        }
        Object::Dictionary(dict) => {
            let keys: Vec<String> = dict.keys().cloned().collect();
            for name in keys {
                if let Some(value) = dict.get_mut(&name) {
                    encrypt_in_place(key, value)?;
                }
            }
        }
        Object::Stream(stream) => {
            stream.transform_data(|data| rc4(key, data))?;
            let names: Vec<String> = stream.dictionary().keys().cloned().collect();
            for name in names {
                if let Some(value) = stream.dictionary_mut().get_mut(&name) {
                    encrypt_in_place(key, value)?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Dictionary, Stream};

    fn encryptor() -> (ObjectEncryptor, SecurityKeys) {
        let handler = StandardSecurityHandler::new(b"owner", b"user").unwrap();
        let keys = handler.compute_keys(&[3u8; 16]);
        (ObjectEncryptor::new(&keys), keys)
    }

    #[test]
    fn test_strings_become_encrypted_hex() {
        let (encryptor, keys) = encryptor();
        let id = ObjectId::new(7, 0);
        let mut object = Object::String(b"Title".to_vec());
        encryptor.encrypt_object(id, &mut object).unwrap();

        let expected = rc4(&object_key(&keys.encryption_key, id), b"Title");
        assert_eq!(object, Object::HexString(expected));
    }

    #[test]
    fn test_stream_payload_and_nested_strings() {
        let (encryptor, keys) = encryptor();
        let id = ObjectId::new(12, 0);

        let mut dict = Dictionary::new();
        dict.set("Note", "abc");
        dict.set_name("Name", "Untouched");
        let data = b"q 1 0 0 1 0 0 cm Q".to_vec();
        let mut object = Object::Stream(Stream::with_dictionary(dict, data));
        encryptor.encrypt_object(id, &mut object).unwrap();

        let key = object_key(&keys.encryption_key, id);
        let Object::Stream(stream) = &object else {
            panic!("expected stream");
        };
        assert_eq!(rc4(&key, stream.data()), b"q 1 0 0 1 0 0 cm Q");
        assert_eq!(
            stream.dictionary().get("Name").and_then(Object::as_name),
            Some("Untouched")
        );
        assert_eq!(
            stream.dictionary().get("Note"),
            Some(&Object::HexString(rc4(&key, b"abc")))
        );
        assert_eq!(stream.dictionary().get("Length"), Some(&Object::Integer(18)));
    }
}
