//! Subscriber configuration

use crate::command::SubscriberProfile;
use orders_shared::config::{process_env, read_var};
use orders_shared::{defaults, ConfigError};
use std::time::Duration;

/// What the runtime does when the broker connection drops while subscribed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconnectPolicy {
    /// Stop with an error and leave restarts to the process supervisor
    #[default]
    FailFast,
    /// Reconnect with exponential backoff
    Backoff { initial: Duration, max: Duration },
}

impl ReconnectPolicy {
    pub fn backoff() -> Self {
        ReconnectPolicy::Backoff {
            initial: Duration::from_millis(defaults::RECONNECT_DELAY_MS),
            max: Duration::from_millis(defaults::MAX_RECONNECT_DELAY_MS),
        }
    }
}

/// Configuration for a subscriber process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberConfig {
    /// Name used in every log line from this subscriber
    pub subscriber_id: String,
    /// Which vocabulary this process answers to
    pub profile: SubscriberProfile,
    /// Broker connection URL
    pub redis_url: String,
    /// Topic to subscribe to
    pub topic: String,
    /// Behaviour on broker disconnect
    pub reconnect: ReconnectPolicy,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            subscriber_id: "subscriber-1".into(),
            profile: SubscriberProfile::default(),
            redis_url: defaults::REDIS_URL.into(),
            topic: defaults::TOPIC.into(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl SubscriberConfig {
    /// Build the config from `SUBSCRIBER_ID`, `SUBSCRIBER_PROFILE`,
    /// `REDIS_URL`, `ORDERS_TOPIC` and `SUBSCRIBER_RECONNECT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = Self::default();

        let profile = read_var(&lookup, "SUBSCRIBER_PROFILE", base.profile.as_str())?;
        let profile = profile.parse::<SubscriberProfile>().map_err(|reason| ConfigError::Invalid {
            var: "SUBSCRIBER_PROFILE",
            value: profile.clone(),
            reason,
        })?;

        let reconnect = read_var(&lookup, "SUBSCRIBER_RECONNECT", "fail-fast")?;
        let reconnect = match reconnect.as_str() {
            "fail-fast" => ReconnectPolicy::FailFast,
            "backoff" => ReconnectPolicy::backoff(),
            _ => {
                return Err(ConfigError::Invalid {
                    var: "SUBSCRIBER_RECONNECT",
                    value: reconnect,
                    reason: "expected fail-fast or backoff".into(),
                })
            }
        };

        Ok(Self {
            subscriber_id: read_var(&lookup, "SUBSCRIBER_ID", &base.subscriber_id)?,
            profile,
            redis_url: read_var(&lookup, "REDIS_URL", &base.redis_url)?,
            topic: read_var(&lookup, "ORDERS_TOPIC", &base.topic)?,
            reconnect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_from_empty_env() {
        let config = SubscriberConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SubscriberConfig::default());
        assert_eq!(config.reconnect, ReconnectPolicy::FailFast);
    }

    #[test]
    fn test_env_overrides() {
        let config = SubscriberConfig::from_lookup(lookup(&[
            ("SUBSCRIBER_ID", "subscriber-2"),
            ("SUBSCRIBER_PROFILE", "calculator"),
            ("ORDERS_TOPIC", "commands"),
            ("SUBSCRIBER_RECONNECT", "backoff"),
        ]))
        .unwrap();

        assert_eq!(config.subscriber_id, "subscriber-2");
        assert_eq!(config.profile, SubscriberProfile::Calculator);
        assert_eq!(config.topic, "commands");
        assert_eq!(config.reconnect, ReconnectPolicy::backoff());
    }

    #[test]
    fn test_invalid_values() {
        let bad_profile = SubscriberConfig::from_lookup(lookup(&[("SUBSCRIBER_PROFILE", "juggler")]));
        assert!(matches!(
            bad_profile,
            Err(ConfigError::Invalid { var: "SUBSCRIBER_PROFILE", .. })
        ));

        let bad_policy = SubscriberConfig::from_lookup(lookup(&[("SUBSCRIBER_RECONNECT", "sometimes")]));
        assert!(matches!(
            bad_policy,
            Err(ConfigError::Invalid { var: "SUBSCRIBER_RECONNECT", .. })
        ));

        let blank_id = SubscriberConfig::from_lookup(lookup(&[("SUBSCRIBER_ID", " ")]));
        assert_eq!(blank_id, Err(ConfigError::Empty { var: "SUBSCRIBER_ID" }));
    }
}
