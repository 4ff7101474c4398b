// src/push/context.rs

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Metadata describing the push being optimized.
///
/// Extra keys in a parameters document are ignored, so a full decision
/// parameters file can be fed in directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushContext {
    pub project: String,

    pub head_repository: String,

    /// Push time in epoch seconds.
    #[serde(rename = "pushdate", alias = "push_date")]
    pub push_date: i64,

    /// Monotonic push counter; accepts `2` or `"2"` on input.
    #[serde(deserialize_with = "deserialize_pushlog_id")]
    pub pushlog_id: u64,
}

impl PushContext {
    pub fn new(
        project: impl Into<String>,
        head_repository: impl Into<String>,
        push_date: i64,
        pushlog_id: u64,
    ) -> Self {
        Self {
            project: project.into(),
            head_repository: head_repository.into(),
            push_date,
            pushlog_id,
        }
    }
}

impl fmt::Display for PushContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} ({})", self.project, self.pushlog_id, self.head_repository)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

fn deserialize_pushlog_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse::<u64>().map_err(|e| {
            serde::de::Error::custom(format!("invalid pushlog_id '{s}': {e}"))
        }),
    }
}
