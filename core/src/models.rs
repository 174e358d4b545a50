use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::error::{PretalxError, Result};

/// Event-scoped collections exposed under `/api/events/{event}/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Submissions,
    Talks,
    Speakers,
    Reviews,
    Rooms,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Submissions,
        Resource::Talks,
        Resource::Speakers,
        Resource::Reviews,
        Resource::Rooms,
    ];

    /// Path segment used for this collection
    pub fn segment(&self) -> &'static str {
        match self {
            Resource::Submissions => "submissions",
            Resource::Talks => "talks",
            Resource::Speakers => "speakers",
            Resource::Reviews => "reviews",
            Resource::Rooms => "rooms",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// How a client authenticates against the API
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Exchanged for a token via `POST /api/auth/`
    Password { username: String, password: String },
    /// Pre-obtained API token, used as is
    Token(String),
}

impl Credentials {
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn token(token: impl Into<String>) -> Self {
        Credentials::Token(token.into())
    }

    /// Pick credentials from optional parts.
    ///
    /// A complete username/password pair wins over a token. Empty strings
    /// count as missing.
    pub fn resolve(
        username: Option<String>,
        password: Option<String>,
        token: Option<String>,
    ) -> Result<Self> {
        let present = |s: Option<String>| s.filter(|s| !s.is_empty());

        match (present(username), present(password), present(token)) {
            (Some(username), Some(password), _) => Ok(Credentials::Password { username, password }),
            (_, _, Some(token)) => Ok(Credentials::Token(token)),
            _ => Err(PretalxError::MissingAuthParameter),
        }
    }

    /// Reject credentials with empty fields
    pub fn validate(&self) -> Result<()> {
        let complete = match self {
            Credentials::Password { username, password } => {
                !username.is_empty() && !password.is_empty()
            }
            Credentials::Token(token) => !token.is_empty(),
        };
        if complete {
            Ok(())
        } else {
            Err(PretalxError::MissingAuthParameter)
        }
    }
}

// Secrets stay out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
        }
    }
}

/// Scalar query-string value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ParamValue::Str(s) => serializer.serialize_str(s),
            ParamValue::Int(i) => serializer.serialize_i64(*i),
            ParamValue::Float(x) => serializer.serialize_f64(*x),
            ParamValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Ordered query parameters, passed through verbatim to the query string.
///
/// Keys may repeat; pairs are emitted in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// Serialized as a sequence of pairs so it can be handed to a query encoder
impl Serialize for QueryParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.pairs.len()))?;
        for (key, value) in &self.pairs {
            seq.serialize_element(&(key, value))?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn resolve_prefers_password_pair_over_token() {
        let creds = Credentials::resolve(some("alice"), some("secret"), some("tok")).unwrap();
        assert_eq!(creds, Credentials::password("alice", "secret"));
    }

    #[test]
    fn resolve_falls_back_to_token_when_pair_incomplete() {
        let creds = Credentials::resolve(some("alice"), None, some("tok")).unwrap();
        assert_eq!(creds, Credentials::token("tok"));

        let creds = Credentials::resolve(None, some("secret"), some("tok")).unwrap();
        assert_eq!(creds, Credentials::token("tok"));
    }

    #[test]
    fn resolve_without_anything_is_missing_auth() {
        assert!(matches!(
            Credentials::resolve(None, None, None),
            Err(PretalxError::MissingAuthParameter)
        ));
        assert!(matches!(
            Credentials::resolve(some("alice"), None, None),
            Err(PretalxError::MissingAuthParameter)
        ));
    }

    #[test]
    fn resolve_treats_empty_strings_as_missing() {
        assert!(matches!(
            Credentials::resolve(some(""), some(""), some("")),
            Err(PretalxError::MissingAuthParameter)
        ));
        let creds = Credentials::resolve(some("alice"), some(""), some("tok")).unwrap();
        assert_eq!(creds, Credentials::token("tok"));
    }

    #[test]
    fn validate_rejects_empty_token() {
        assert!(Credentials::token("").validate().is_err());
        assert!(Credentials::password("alice", "").validate().is_err());
        assert!(Credentials::token("abc").validate().is_ok());
    }

    #[test]
    fn debug_redacts_secrets() {
        let out = format!("{:?}", Credentials::password("alice", "hunter2"));
        assert!(out.contains("alice"));
        assert!(!out.contains("hunter2"));

        let out = format!("{:?}", Credentials::token("abc123"));
        assert!(!out.contains("abc123"));
    }

    #[test]
    fn query_params_keep_order_and_duplicates() {
        let params = QueryParams::new()
            .with("state", "confirmed")
            .with("limit", 10)
            .with("state", "accepted")
            .with("is_featured", true);

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                ["state", "confirmed"],
                ["limit", 10],
                ["state", "accepted"],
                ["is_featured", true]
            ])
        );
    }

    #[test]
    fn resource_segments() {
        let segments: Vec<_> = Resource::ALL.iter().map(|r| r.segment()).collect();
        assert_eq!(
            segments,
            ["submissions", "talks", "speakers", "reviews", "rooms"]
        );
        assert_eq!(Resource::Talks.to_string(), "talks");
    }
}
