//! Standard security handler, revisions 2 and 3 (RC4)

use crate::encryption::rc4::rc4;
use crate::encryption::Permissions;
use crate::error::{PdfError, Result};
use crate::objects::ObjectId;

/// Padding used in password processing
pub(crate) const PADDING: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

const MD5_KEY_LEN: usize = 16;

/// Security handler revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EncryptMode {
    /// Revision 2, 40-bit key.
    R2,
    /// Revision 3, 40 to 128-bit key.
    R3,
}

impl EncryptMode {
    pub fn revision(self) -> i64 {
        match self {
            EncryptMode::R2 => 2,
            EncryptMode::R3 => 3,
        }
    }

    pub fn version(self) -> i64 {
        match self {
            EncryptMode::R2 => 1,
            EncryptMode::R3 => 2,
        }
    }
}

/// Passwords, permissions and key parameters of an encrypted document.
#[derive(Debug, Clone)]
pub struct StandardSecurityHandler {
    owner_password: Vec<u8>,
    user_password: Vec<u8>,
    permissions: Permissions,
    mode: EncryptMode,
    key_len: usize,
}

/// Keys derived for one serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityKeys {
    /// `/O` entry.
    pub owner_key: Vec<u8>,
    /// `/U` entry.
    pub user_key: Vec<u8>,
    /// File encryption key (`key_len` bytes).
    pub encryption_key: Vec<u8>,
}

impl StandardSecurityHandler {
    /// Defaults: revision 2, 40-bit key, every permission granted.
    pub fn new(owner_password: &[u8], user_password: &[u8]) -> Result<Self> {
        if owner_password.is_empty() || owner_password == user_password {
            return Err(PdfError::EncryptInvalidPassword);
        }

        Ok(Self {
            owner_password: owner_password.to_vec(),
            user_password: user_password.to_vec(),
            permissions: Permissions::default(),
            mode: EncryptMode::R2,
            key_len: 5,
        })
    }

    pub fn set_permissions(&mut self, permissions: Permissions) {
        self.permissions = permissions;
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// R2 always uses a 5 byte key; R3 accepts 5 to 16 bytes.
    pub fn set_mode(&mut self, mode: EncryptMode, key_len: usize) -> Result<()> {
        let key_len = match mode {
            EncryptMode::R2 => 5,
            EncryptMode::R3 => {
                if !(5..=MD5_KEY_LEN).contains(&key_len) {
                    return Err(PdfError::InvalidEncryptKeyLen(key_len));
                }
                key_len
            }
        };
        self.mode = mode;
        self.key_len = key_len;
        Ok(())
    }

    pub fn mode(&self) -> EncryptMode {
        self.mode
    }

    pub fn key_len(&self) -> usize {
        self.key_len
    }

    fn pad_password(password: &[u8]) -> [u8; 32] {
        let mut padded = [0u8; 32];
        let len = password.len().min(32);
        padded[..len].copy_from_slice(&password[..len]);
        padded[len..].copy_from_slice(&PADDING[..32 - len]);
        padded
    }

    /// Repeated MD5 over the first `key_len` bytes of the digest (R3 only).
    fn strengthen(&self, mut digest: [u8; 16]) -> [u8; 16] {
        if self.mode == EncryptMode::R3 {
            for _ in 0..50 {
                digest = md5::compute(&digest[..self.key_len]).0;
            }
        }
        digest
    }

    /// Nineteen extra RC4 passes with the key XORed by the pass number (R3 only).
    fn rc4_rounds(&self, key: &[u8], mut data: Vec<u8>) -> Vec<u8> {
        if self.mode == EncryptMode::R3 {
            for round in 1..=19u8 {
                let round_key: Vec<u8> = key.iter().map(|b| b ^ round).collect();
                data = rc4(&round_key, &data);
            }
        }
        data
    }

    fn compute_owner_key(&self) -> Vec<u8> {
        let owner_pad = Self::pad_password(&self.owner_password);
        let user_pad = Self::pad_password(&self.user_password);

        let digest = self.strengthen(md5::compute(owner_pad).0);
        let key = &digest[..self.key_len];

        let first = rc4(key, &user_pad);
        self.rc4_rounds(key, first)
    }

    fn compute_encryption_key(&self, owner_key: &[u8], file_id: &[u8]) -> Vec<u8> {
        let mut data = Vec::with_capacity(32 + owner_key.len() + 4 + file_id.len());
        data.extend_from_slice(&Self::pad_password(&self.user_password));
        data.extend_from_slice(owner_key);
        data.extend_from_slice(&self.permissions.p_value().to_le_bytes());
        data.extend_from_slice(file_id);

        let digest = self.strengthen(md5::compute(&data).0);
        digest[..self.key_len].to_vec()
    }

    fn compute_user_key(&self, encryption_key: &[u8], file_id: &[u8]) -> Vec<u8> {
        match self.mode {
            EncryptMode::R2 => rc4(encryption_key, &PADDING),
            EncryptMode::R3 => {
                let mut data = PADDING.to_vec();
                data.extend_from_slice(file_id);
                let digest = md5::compute(&data);

                let first = rc4(encryption_key, &digest.0);
                let mut user_key = self.rc4_rounds(encryption_key, first);
                user_key.resize(32, 0);
                user_key
            }
        }
    }

    /// Derives `/O`, `/U` and the file key for the given first `/ID` element.
    pub fn compute_keys(&self, file_id: &[u8]) -> SecurityKeys {
        let owner_key = self.compute_owner_key();
        let encryption_key = self.compute_encryption_key(&owner_key, file_id);
        let user_key = self.compute_user_key(&encryption_key, file_id);

        SecurityKeys {
            owner_key,
            user_key,
            encryption_key,
        }
    }
}

/// Per-object RC4 key: MD5 of the file key, 3 low bytes of the object
/// number and 2 low bytes of the generation, truncated to `n + 5` bytes.
pub fn object_key(encryption_key: &[u8], id: ObjectId) -> Vec<u8> {
    let mut data = encryption_key.to_vec();
    data.extend_from_slice(&id.number().to_le_bytes()[..3]);
    data.extend_from_slice(&id.generation().to_le_bytes());

    let digest = md5::compute(&data);
    let len = (encryption_key.len() + 5).min(MD5_KEY_LEN);
    digest.0[..len].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE_ID: [u8; 16] = [7u8; 16];

    #[test]
    fn test_rejects_empty_or_equal_owner() {
        assert!(matches!(
            StandardSecurityHandler::new(b"", b"user"),
            Err(PdfError::EncryptInvalidPassword)
        ));
        assert!(matches!(
            StandardSecurityHandler::new(b"same", b"same"),
            Err(PdfError::EncryptInvalidPassword)
        ));
        assert!(StandardSecurityHandler::new(b"owner", b"").is_ok());
    }

    #[test]
    fn test_defaults() {
        let handler = StandardSecurityHandler::new(b"owner", b"user").unwrap();
        assert_eq!(handler.mode(), EncryptMode::R2);
        assert_eq!(handler.key_len(), 5);
        assert_eq!(handler.permissions(), Permissions::all());
    }

    #[test]
    fn test_mode_key_lengths() {
        let mut handler = StandardSecurityHandler::new(b"owner", b"user").unwrap();

        handler.set_mode(EncryptMode::R2, 16).unwrap();
        assert_eq!(handler.key_len(), 5);

        handler.set_mode(EncryptMode::R3, 16).unwrap();
        assert_eq!(handler.key_len(), 16);

        assert!(matches!(
            handler.set_mode(EncryptMode::R3, 4),
            Err(PdfError::InvalidEncryptKeyLen(4))
        ));
        assert!(matches!(
            handler.set_mode(EncryptMode::R3, 17),
            Err(PdfError::InvalidEncryptKeyLen(17))
        ));
        assert_eq!(handler.mode(), EncryptMode::R3);
        assert_eq!(handler.key_len(), 16);
    }

    #[test]
    fn test_r2_user_key_decrypts_to_padding() {
        let handler = StandardSecurityHandler::new(b"owner", b"user").unwrap();
        let keys = handler.compute_keys(&FILE_ID);

        assert_eq!(keys.owner_key.len(), 32);
        assert_eq!(keys.user_key.len(), 32);
        assert_eq!(keys.encryption_key.len(), 5);
        assert_eq!(rc4(&keys.encryption_key, &keys.user_key), PADDING.to_vec());
    }

    #[test]
    fn test_r3_user_key_layout() {
        let mut handler = StandardSecurityHandler::new(b"owner", b"user").unwrap();
        handler.set_mode(EncryptMode::R3, 16).unwrap();
        let keys = handler.compute_keys(&FILE_ID);

        assert_eq!(keys.encryption_key.len(), 16);
        assert_eq!(keys.user_key.len(), 32);
        assert!(keys.user_key[16..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_keys_depend_on_permissions() {
        let mut handler = StandardSecurityHandler::new(b"owner", b"user").unwrap();
        let all = handler.compute_keys(&FILE_ID);
        handler.set_permissions(Permissions::PRINT);
        let print_only = handler.compute_keys(&FILE_ID);

        assert_eq!(all.owner_key, print_only.owner_key);
        assert_ne!(all.encryption_key, print_only.encryption_key);
    }

    #[test]
    fn test_object_key_length() {
        let key5 = object_key(&[1, 2, 3, 4, 5], ObjectId::new(4, 0));
        assert_eq!(key5.len(), 10);

        let key16 = object_key(&[9u8; 16], ObjectId::new(4, 0));
        assert_eq!(key16.len(), 16);

        assert_ne!(
            object_key(&[1, 2, 3, 4, 5], ObjectId::new(4, 0)),
            object_key(&[1, 2, 3, 4, 5], ObjectId::new(5, 0))
        );
    }
}
