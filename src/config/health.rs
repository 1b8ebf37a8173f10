// ABOUTME: Health polling configuration for scaleover cutovers.
// ABOUTME: Poll interval and the fraction of instances that must be running.

use serde::Deserialize;
use std::time::Duration;

use crate::deploy::HealthMonitor;

#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(default = "default_min_healthy_ratio")]
    pub min_healthy_ratio: f64,
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_min_healthy_ratio() -> f64 {
    1.0
}

impl Default for HealthConfig {
    fn default() -> Self {
        HealthConfig {
            poll_interval: default_poll_interval(),
            min_healthy_ratio: default_min_healthy_ratio(),
        }
    }
}

impl HealthConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval.is_zero() {
            return Err("health.poll_interval must be greater than zero".to_string());
        }
        if !(self.min_healthy_ratio > 0.0 && self.min_healthy_ratio <= 1.0) {
            return Err(format!(
                "health.min_healthy_ratio must be in (0, 1], got {}",
                self.min_healthy_ratio
            ));
        }
        Ok(())
    }

    pub fn monitor(&self) -> HealthMonitor {
        HealthMonitor::new(self.poll_interval).min_healthy_ratio(self.min_healthy_ratio)
    }
}
