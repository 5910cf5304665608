//! Stream identifiers.
//!
//! A `StreamKey` names one renderable source. The string form matches what
//! UI code passes around: `"local"`, `"videosource"`, or the remote uid in
//! decimal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Identifier for a renderable video source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StreamKey {
    /// The local camera capture.
    Local,
    /// The secondary video source (screen share).
    VideoSource,
    /// A remote participant, by uid.
    Remote(u32),
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKey::Local => f.write_str("local"),
            StreamKey::VideoSource => f.write_str("videosource"),
            StreamKey::Remote(uid) => write!(f, "{uid}"),
        }
    }
}

impl FromStr for StreamKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "local" => Ok(StreamKey::Local),
            "videosource" => Ok(StreamKey::VideoSource),
            other => other
                .parse::<u32>()
                .map(StreamKey::Remote)
                .map_err(|_| ModelError::InvalidStreamKey(s.to_string())),
        }
    }
}

impl TryFrom<String> for StreamKey {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StreamKey> for String {
    fn from(key: StreamKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_matches_legacy_lookup_strings() {
        assert_eq!(StreamKey::Local.to_string(), "local");
        assert_eq!(StreamKey::VideoSource.to_string(), "videosource");
        assert_eq!(StreamKey::Remote(77).to_string(), "77");
    }

    #[test]
    fn parse_accepts_all_forms() {
        assert_eq!("local".parse::<StreamKey>().unwrap(), StreamKey::Local);
        assert_eq!(" videosource ".parse::<StreamKey>().unwrap(), StreamKey::VideoSource);
        assert_eq!("4294967295".parse::<StreamKey>().unwrap(), StreamKey::Remote(u32::MAX));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            "remote".parse::<StreamKey>(),
            Err(ModelError::InvalidStreamKey("remote".to_string()))
        );
        assert!("-1".parse::<StreamKey>().is_err());
        assert!("4294967296".parse::<StreamKey>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&vec![StreamKey::Local, StreamKey::Remote(9)]).unwrap();
        assert_eq!(json, r#"["local","9"]"#);
        let parsed: Vec<StreamKey> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![StreamKey::Local, StreamKey::Remote(9)]);
    }

    proptest! {
        #[test]
        fn remote_keys_survive_string_form(uid in any::<u32>()) {
            let key = StreamKey::Remote(uid);
            prop_assert_eq!(key.to_string().parse::<StreamKey>().unwrap(), key);
            let json = serde_json::to_string(&key).unwrap();
            prop_assert_eq!(serde_json::from_str::<StreamKey>(&json).unwrap(), key);
        }
    }
}
