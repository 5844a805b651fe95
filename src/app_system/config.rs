use std::env;

use thiserror::Error;
use url::Url;

pub const PAGE_SIZE_VAR: &str = "ORDER_DESK_PAGE_SIZE";
pub const ACTOR_BUFFER_VAR: &str = "ORDER_DESK_ACTOR_BUFFER";
pub const WHATSAPP_BASE_VAR: &str = "ORDER_DESK_WHATSAPP_BASE";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidCount { var: &'static str, value: String },
    #[error("{var} must be an absolute URL, got '{value}'")]
    InvalidUrl { var: &'static str, value: String },
}

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct DeskConfig {
    pub page_size: usize,
    pub actor_buffer: usize,
    pub whatsapp_base: Url,
}

impl DeskConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Unset variables fall back to defaults; set-but-invalid ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let page_size = count(&lookup, PAGE_SIZE_VAR, 10)?;
        let actor_buffer = count(&lookup, ACTOR_BUFFER_VAR, 32)?;
        let base = lookup(WHATSAPP_BASE_VAR).unwrap_or_else(|| "https://wa.me".to_string());
        let whatsapp_base = Url::parse(&base)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or(ConfigError::InvalidUrl {
                var: WHATSAPP_BASE_VAR,
                value: base,
            })?;

        Ok(Self {
            page_size,
            actor_buffer,
            whatsapp_base,
        })
    }
}

fn count(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: usize,
) -> Result<usize, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidCount { var, value }),
    }
}
