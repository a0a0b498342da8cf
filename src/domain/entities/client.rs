use std::fmt;

/// Identity used to bucket admission and ledger state.
/// Derived from the caller's network address, best effort only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    pub fn new(key: impl Into<String>) -> Self {
        ClientKey(key.into())
    }

    pub fn unknown() -> Self {
        ClientKey("unknown".to_string())
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClientKey {
    fn from(value: &str) -> Self {
        ClientKey::new(value)
    }
}

impl From<String> for ClientKey {
    fn from(value: String) -> Self {
        ClientKey(value)
    }
}
