use crate::objects::ObjectId;

/// Hands out object numbers for one document.
///
/// Numbers start at 1 and are never reused. Callers allocate only once the
/// entity that owns the number has been fully built, so a failed load never
/// consumes a number.
#[derive(Debug, Clone)]
pub struct ObjectRegistry {
    next: u32,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next, 0);
        self.next += 1;
        id
    }

    /// Number of object numbers handed out so far.
    pub fn count(&self) -> u32 {
        self.next - 1
    }

    /// The number the next allocation would return.
    pub fn peek(&self) -> u32 {
        self.next
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_allocation() {
        let mut registry = ObjectRegistry::new();
        assert_eq!(registry.count(), 0);

        let first = registry.allocate();
        let second = registry.allocate();
        assert_eq!(first, ObjectId::new(1, 0));
        assert_eq!(second, ObjectId::new(2, 0));
        assert_eq!(registry.count(), 2);
        assert_eq!(registry.peek(), 3);
    }
}
