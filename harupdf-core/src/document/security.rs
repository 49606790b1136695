use tracing::debug;

use crate::document::{Document, Security};
use crate::encryption::{EncryptMode, Permissions, StandardSecurityHandler};
use crate::error::{PdfError, Result};

impl Document {
    /// Enables RC4 encryption with revision 2, a 40-bit key and every
    /// permission granted.
    ///
    /// The owner password must be non-empty and differ from the user
    /// password. Setting a password again replaces the previous one and
    /// resets permissions and mode.
    pub fn set_password(&mut self, owner: &str, user: &str) -> Result<()> {
        let handler = StandardSecurityHandler::new(owner.as_bytes(), user.as_bytes())?;
        let id = match &self.security {
            Some(security) => security.id,
            None => self.registry.allocate(),
        };
        debug!(user_password = !user.is_empty(), "encryption enabled");
        self.security = Some(Security { handler, id });
        Ok(())
    }

    pub fn set_permission(&mut self, permissions: Permissions) -> Result<()> {
        let security = self.security.as_mut().ok_or(PdfError::EncryptDictNotFound)?;
        security.handler.set_permissions(permissions);
        Ok(())
    }

    /// R2 always uses a 5-byte key; R3 takes `key_len` of 5 to 16 bytes.
    pub fn set_encryption_mode(&mut self, mode: EncryptMode, key_len: usize) -> Result<()> {
        let security = self.security.as_mut().ok_or(PdfError::EncryptDictNotFound)?;
        security.handler.set_mode(mode, key_len)?;
        debug!(?mode, key_len = security.handler.key_len(), "encryption mode set");
        Ok(())
    }

    pub fn is_encrypted(&self) -> bool {
        self.security.is_some()
    }
}
