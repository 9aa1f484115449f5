//! Sender identity per tag.

use shared_crypto::Wallet;
use shared_types::Tag;
use std::collections::HashMap;

/// Maps tags to the wallet their notifications come from.
#[derive(Debug, Clone)]
pub struct TagSenderRegistry {
    default: Wallet,
    per_tag: HashMap<Tag, Wallet>,
}

impl TagSenderRegistry {
    pub fn new(default: Wallet) -> Self {
        Self {
            default,
            per_tag: HashMap::new(),
        }
    }

    /// Use `wallet` for `tag`.
    pub fn with_sender(mut self, tag: Tag, wallet: Wallet) -> Self {
        self.per_tag.insert(tag, wallet);
        self
    }

    pub fn insert(&mut self, tag: Tag, wallet: Wallet) {
        self.per_tag.insert(tag, wallet);
    }

    pub fn default_sender(&self) -> &Wallet {
        &self.default
    }

    pub fn sender_for(&self, tag: Tag) -> &Wallet {
        self.per_tag.get(&tag).unwrap_or(&self.default)
    }

    /// Sender for a raw label. Unknown labels use the default identity.
    pub fn resolve(&self, label: &str) -> &Wallet {
        match Tag::from_label(label) {
            Some(tag) => self.sender_for(tag),
            None => &self.default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_to_default() {
        let default = Wallet::random();
        let pets = Wallet::random();
        let registry = TagSenderRegistry::new(default.clone()).with_sender(Tag::Pets, pets.clone());

        assert_eq!(registry.resolve("Pets").address(), pets.address());
        assert_eq!(registry.resolve("Food").address(), default.address());
        assert_eq!(registry.resolve("Unknown").address(), default.address());
    }
}
