//! Document access permissions written to the `/P` entry

use bitflags::bitflags;

/// Bits that must always be set in `/P` for the standard handler.
const PERMISSION_PAD: u32 = 0xFFFF_FFC0;

bitflags! {
    /// What a reader holding only the user password may do.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        const PRINT = 4;
        const EDIT_ALL = 8;
        const COPY = 16;
        const EDIT = 32;
    }
}

impl Permissions {
    /// Value of the `/P` entry: the granted bits plus the mandatory pad.
    pub fn p_value(self) -> i32 {
        (self.bits() | PERMISSION_PAD) as i32
    }

    pub fn can_print(self) -> bool {
        self.contains(Permissions::PRINT)
    }

    pub fn can_copy(self) -> bool {
        self.contains(Permissions::COPY)
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grants_everything() {
        let perms = Permissions::default();
        assert!(perms.can_print());
        assert!(perms.can_copy());
        assert_eq!(perms.p_value(), -4);
    }

    #[test]
    fn test_p_value_pads_high_bits() {
        assert_eq!(Permissions::empty().p_value(), 0xFFFF_FFC0u32 as i32);
        assert_eq!(Permissions::PRINT.p_value(), -60);
        assert_eq!(
            (Permissions::PRINT | Permissions::COPY).p_value() as u32,
            0xFFFF_FFD4
        );
    }
}
