//! Transfer configuration

use rfota_hid_pxi_protocol::OtaTarget;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default pause between `OtaInitNew` set-feature and get-feature.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// OTA transfer configuration
///
/// Durations are (de)serialized as integer milliseconds. Missing fields take
/// their defaults.
///
/// ```json
/// { "verbose": true, "settle_delay": 10, "ack_timeout": 2000, "ota_target": "main-firmware" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtaConfig {
    /// Log every raw request and response buffer as hex
    pub verbose: bool,

    /// Pause after the `OtaInitNew` request before reading the response
    #[serde(with = "duration_ms")]
    pub settle_delay: Duration,

    /// Read timeout applied to acknowledgment reads; `None` keeps the
    /// transport's own behaviour
    #[serde(with = "duration_ms::option")]
    pub ack_timeout: Option<Duration>,

    /// Image slot the transfer writes
    pub ota_target: OtaTarget,
}

impl Default for OtaConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            settle_delay: DEFAULT_SETTLE_DELAY,
            ack_timeout: None,
            ota_target: OtaTarget::MainFirmware,
        }
    }
}

impl OtaConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    fn millis(duration: &Duration) -> u64 {
        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        millis(duration).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            duration.as_ref().map(millis).serialize(serializer)
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let ms = Option::<u64>::deserialize(deserializer)?;
            Ok(ms.map(Duration::from_millis))
        }
    }
}
