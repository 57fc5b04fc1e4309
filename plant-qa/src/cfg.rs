//! Runtime knobs loaded from environment variables.

use std::time::Duration;

use crate::error::ProxyError;

/// Deadlines and logging knobs for the proxy. All fields have defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxySettings {
    /// Hard bound on one upstream generation call, retries included.
    pub deadline: Duration,
    /// Bound on subject enrichment before falling back to the general prompt.
    pub resolver_deadline: Duration,
    /// How much of the prompt to put in the entry log line.
    pub preview_chars: usize,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(45),
            resolver_deadline: Duration::from_secs(5),
            preview_chars: 120,
        }
    }
}

impl ProxySettings {
    /// Reads `PROXY_DEADLINE_SECS` and `RESOLVER_DEADLINE_SECS` through `vars`.
    ///
    /// # Errors
    /// [`ProxyError::ServerConfiguration`] for a non-numeric or zero value.
    pub fn from_vars<F>(vars: &F) -> Result<Self, ProxyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            deadline: secs(vars, "PROXY_DEADLINE_SECS")?.unwrap_or(defaults.deadline),
            resolver_deadline: secs(vars, "RESOLVER_DEADLINE_SECS")?
                .unwrap_or(defaults.resolver_deadline),
            ..defaults
        })
    }
}

fn secs<F>(vars: &F, name: &str) -> Result<Option<Duration>, ProxyError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = vars(name).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(Duration::from_secs(n))),
        _ => Err(ProxyError::ServerConfiguration(format!(
            "{name} must be a positive whole number of seconds, got {raw:?}"
        ))),
    }
}
