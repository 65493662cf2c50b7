// ABOUTME: Notification policy forwarded to notification collaborators.
// ABOUTME: Channels and webhook; carried through configuration untouched.

use nonempty::NonEmpty;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationPolicy {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(
        default = "default_channels",
        deserialize_with = "deserialize_channels"
    )]
    pub channels: NonEmpty<String>,

    #[serde(default)]
    pub webhook: Option<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_channels() -> NonEmpty<String> {
    NonEmpty::new("slack".to_string())
}

fn deserialize_channels<'de, D>(deserializer: D) -> Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let channels: Vec<String> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(channels)
        .ok_or_else(|| serde::de::Error::custom("at least one notification channel is required"))
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            channels: default_channels(),
            webhook: None,
        }
    }
}
