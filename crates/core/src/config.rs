use crate::error::ConfigError;

pub const DEFAULT_TOPIC: &str = "audit-events";
pub const DEFAULT_GROUP: &str = "check-audit";

/// Everything needed to join the audit topic's consumer group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumerConfig {
    pub brokers: Vec<String>,
    pub topic: String,
    pub group: String,
}

impl ConsumerConfig {
    /// Build a config from a comma separated broker list using the default
    /// topic and group.
    pub fn from_broker_list(raw: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            brokers: parse_broker_list(raw)?,
            topic: DEFAULT_TOPIC.to_string(),
            group: DEFAULT_GROUP.to_string(),
        })
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brokers.is_empty() {
            return Err(ConfigError::MissingBrokers);
        }
        if self.topic.trim().is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        if self.group.trim().is_empty() {
            return Err(ConfigError::EmptyGroup);
        }
        Ok(())
    }
}

/// Split `host:port,host:port` into addresses. Blank entries are dropped; a
/// list with nothing left is treated as missing.
pub fn parse_broker_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let brokers: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect();

    if brokers.is_empty() {
        return Err(ConfigError::MissingBrokers);
    }
    Ok(brokers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_brokers() {
        let brokers = parse_broker_list("kafka-1:9092, kafka-2:9092 ,,kafka-3:9092").unwrap();
        assert_eq!(brokers, ["kafka-1:9092", "kafka-2:9092", "kafka-3:9092"]);
    }

    #[test]
    fn empty_or_blank_list_is_missing() {
        assert_eq!(parse_broker_list(""), Err(ConfigError::MissingBrokers));
        assert_eq!(parse_broker_list(" , ,"), Err(ConfigError::MissingBrokers));
        assert_eq!(
            ConsumerConfig::from_broker_list(""),
            Err(ConfigError::MissingBrokers)
        );
    }

    #[test]
    fn defaults_to_audit_topic_and_group() {
        let config = ConsumerConfig::from_broker_list("localhost:9092").unwrap();
        assert_eq!(config.topic, "audit-events");
        assert_eq!(config.group, "check-audit");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_must_not_be_blank() {
        let config = ConsumerConfig::from_broker_list("localhost:9092").unwrap();

        assert_eq!(
            config.clone().with_topic(" ").validate(),
            Err(ConfigError::EmptyTopic)
        );
        assert_eq!(
            config.with_group("").validate(),
            Err(ConfigError::EmptyGroup)
        );
    }
}
