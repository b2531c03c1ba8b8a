use crate::state::SessionLimits;
use earn_catalog::{Catalog, OrderSummary, RewardStats};
use earn_core::{CoreError, CoreResult, Timings};
use earn_order::ExperienceConfig;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub timings: Timings,
    #[serde(default)]
    pub order: OrderSummary,
    #[serde(default)]
    pub rewards: RewardStats,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_event_buffer() -> usize { 100 }
fn default_max_sessions() -> usize { 10_000 }
fn default_session_idle_secs() -> u64 { 1_800 }

impl ServerConfig {
    pub fn validate(&self) -> CoreResult<()> {
        for (name, value) in [
            ("server.event_buffer", self.event_buffer as u64),
            ("server.max_sessions", self.max_sessions as u64),
            ("server.session_idle_secs", self.session_idle_secs),
        ] {
            if value == 0 {
                return Err(CoreError::InvalidConfig(format!("{} must be greater than zero", name)));
            }
        }
        Ok(())
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            max_sessions: self.max_sessions,
            idle_ttl: Duration::from_secs(self.session_idle_secs),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `EARN__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("EARN").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Validated inbound configuration for new experiences
    pub fn experience(&self) -> anyhow::Result<ExperienceConfig> {
        self.server.validate()?;
        self.timings.validate()?;
        self.order.validate()?;

        Ok(ExperienceConfig {
            order: self.order.clone(),
            catalog: Catalog::post_purchase(),
            rewards: self.rewards,
            timings: self.timings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_missing_sections_fall_back_to_deployment_defaults() {
        let config = parse("[server]\nport = 3000\n");

        assert_eq!(config.server.event_buffer, 100);
        assert_eq!(config.server.max_sessions, 10_000);
        assert_eq!(config.server.session_limits().idle_ttl, Duration::from_secs(1_800));
        assert_eq!(config.timings, Timings::default());
        assert_eq!(config.order.order_number, "AX7829");
        assert_eq!(config.rewards.points, 375);
    }

    #[test]
    fn test_partial_timings_override() {
        let config = parse("[server]\nport = 3000\n[timings]\naccept_delay_ms = 50\n");

        assert_eq!(config.timings.accept_delay_ms, 50);
        assert_eq!(config.timings.reminder_ack_ms, 3_000);
    }

    #[test]
    fn test_experience_rejects_zero_windows() {
        let config = parse("[server]\nport = 3000\n[timings]\ncelebration_ms = 0\n");
        assert!(config.experience().is_err());
    }

    #[test]
    fn test_zero_server_limits_are_rejected() {
        for toml in [
            "[server]\nport = 3000\nevent_buffer = 0\n",
            "[server]\nport = 3000\nmax_sessions = 0\n",
            "[server]\nport = 3000\nsession_idle_secs = 0\n",
        ] {
            let config = parse(toml);
            assert!(matches!(config.server.validate(), Err(CoreError::InvalidConfig(_))));
            assert!(config.experience().is_err());
        }
    }

    #[test]
    fn test_experience_uses_post_purchase_catalog() {
        let config = parse("[server]\nport = 3000\n");
        let experience = config.experience().unwrap();
        assert_eq!(experience.catalog.len(), 4);
    }
}
