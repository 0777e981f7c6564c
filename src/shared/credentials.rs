use std::sync::RwLock;

/// Memory-only holder for the signed-in user's id token.
///
/// Admin sessions must not survive a restart, so the token lives here and
/// nowhere else: no disk, no keyring. The auth adapter writes it on sign-in
/// and clears it on sign-out; the remote-store adapters attach it to requests
/// when present.
#[derive(Debug, Default)]
pub struct IdTokenStore {
    token: RwLock<Option<String>>,
}

impl IdTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: String) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_lifecycle() {
        let store = IdTokenStore::new();
        assert_eq!(store.get(), None);

        store.set("tok-1".to_string());
        assert_eq!(store.get(), Some("tok-1".to_string()));

        store.set("tok-2".to_string());
        assert_eq!(store.get(), Some("tok-2".to_string()));

        store.clear();
        assert_eq!(store.get(), None);
    }
}
