//! Outbound request parameters and their canonical signing string.
//!
//! The service verifies every request by recomputing an HMAC over a canonical
//! string built from the parameters *in the order they were sent*, so the order
//! of a [`ParameterSet`] is part of the wire contract. Business operations insert
//! their fields following [`FIELD_ORDER`], then the account identifier, then the
//! signature.

/// Field carrying the caller's account identifier.
pub const ACCOUNT_ID_FIELD: &str = "api_id";

/// Field carrying the request signature. Always appended last.
pub const SIGNATURE_FIELD: &str = "hash";

/// Legacy field accepted by older integrations. Never signed and never sent.
pub const SITE_URL_FIELD: &str = "siteurl";

/// Legacy name of the signature field. Never signed and never sent.
pub const LEGACY_SIGNATURE_FIELD: &str = "signature";

/// Fields excluded from the canonical string regardless of position.
pub const UNSIGNED_FIELDS: [&str; 3] = [SIGNATURE_FIELD, LEGACY_SIGNATURE_FIELD, SITE_URL_FIELD];

/// Fields stripped before a request is encoded. The server signs whatever it
/// receives apart from [`SIGNATURE_FIELD`], so nothing left out of the
/// canonical string may reach the wire.
pub const TRANSPORT_ONLY_FIELDS: [&str; 2] = [LEGACY_SIGNATURE_FIELD, SITE_URL_FIELD];

/// Declared order of business fields.
pub const FIELD_ORDER: [&str; 5] = ["index", "code", "token", "country", "ip"];

/// An ordered mapping of unique string keys to string values.
///
/// Inserting an existing key replaces its value in place, keeping its original
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts `key` with `value`, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Inserts `key` only when `value` is present and not blank.
    pub fn insert_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.insert(key, value);
        }
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Builds the canonical signing string: every `key` immediately followed by its
/// `value`, in order, with no delimiter and no escaping. Fields listed in
/// [`UNSIGNED_FIELDS`] are skipped.
#[must_use]
pub fn canonicalize(params: &ParameterSet) -> String {
    params
        .iter()
        .filter(|(k, _)| !UNSIGNED_FIELDS.contains(k))
        .fold(String::new(), |mut acc, (k, v)| {
            acc.push_str(k);
            acc.push_str(v);
            acc
        })
}
