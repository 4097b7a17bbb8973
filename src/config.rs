//! System configuration

use crate::pricing::DEFAULT_MARKED_TOPPING;
use std::str::FromStr;
use std::time::Duration;

/// A configuration value that could not be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Order system configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    /// Request queue capacity of the store actor (env: ORDERS_STORE_BUFFER)
    pub store_buffer: usize,
    /// Request queue capacity of the order actor (env: ORDERS_REQUEST_BUFFER)
    pub order_buffer: usize,
    /// Topping label that triggers the pricing discount (env: ORDERS_MARKED_TOPPING)
    pub marked_topping: String,
    /// Upper bound on one notification attempt (env: ORDERS_NOTIFY_TIMEOUT_MS)
    pub notify_timeout: Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            store_buffer: 32,
            order_buffer: 32,
            marked_topping: DEFAULT_MARKED_TOPPING.to_string(),
            notify_timeout: Duration::from_secs(2),
        }
    }
}

impl SystemConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary source of variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout_ms: u64 = positive(&lookup, "ORDERS_NOTIFY_TIMEOUT_MS")?
            .unwrap_or(defaults.notify_timeout.as_millis() as u64);

        Ok(Self {
            store_buffer: positive(&lookup, "ORDERS_STORE_BUFFER")?.unwrap_or(defaults.store_buffer),
            order_buffer: positive(&lookup, "ORDERS_REQUEST_BUFFER")?.unwrap_or(defaults.order_buffer),
            marked_topping: lookup("ORDERS_MARKED_TOPPING")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.marked_topping),
            notify_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// Parses a strictly positive number; unset means `None`.
fn positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr + Default + PartialEq,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(Some(value)),
        _ => Err(ConfigError::Invalid { name, value: raw }),
    }
}
