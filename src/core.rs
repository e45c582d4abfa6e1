use std::time::Duration;

use thiserror::Error;

use crate::env::{self, EnvError, EnvVar};
use crate::replacement::TableError;

/// Represents errors that can occur while preparing or serializing a document
///
/// Substitution, traversal and scheduling are total; only the edges that
/// touch bytes, configuration or the compiled-in table can fail.
#[derive(Error, Debug)]
pub enum RetextError {
    /// The input bytes could not be parsed into a DOM
    #[error("文档解析失败: {0}")]
    Parse(#[source] std::io::Error),

    /// The DOM could not be serialized back into bytes
    #[error("文档序列化失败: {0}")]
    Serialize(#[source] std::io::Error),

    /// The replacement table is malformed
    #[error(transparent)]
    Table(#[from] TableError),

    /// An environment variable holds an invalid value
    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Default delay between two mutation drains
pub const DEFAULT_DRAIN_INTERVAL: Duration = Duration::from_millis(250);

/// Runtime options for a document session
///
/// The replacement table and the supported-language allowlist are compiled
/// in; only timing is configurable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetextOptions {
    /// Minimum delay between two drains of the mutation queue
    pub drain_interval: Duration,
    /// Give up on the preferred-language query after this long (`None` waits forever)
    pub locale_timeout: Option<Duration>,
}

impl Default for RetextOptions {
    fn default() -> Self {
        RetextOptions {
            drain_interval: DEFAULT_DRAIN_INTERVAL,
            locale_timeout: None,
        }
    }
}

impl RetextOptions {
    /// Reads `RETEXT_DRAIN_INTERVAL_MS` and `RETEXT_LOCALE_TIMEOUT_MS`
    pub fn from_env() -> Result<RetextOptions, RetextError> {
        Ok(RetextOptions {
            drain_interval: env::scheduler::DrainInterval::get()?,
            locale_timeout: env::locale::QueryTimeout::get_optional()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RetextOptions::default();
        assert_eq!(options.drain_interval, Duration::from_millis(250));
        assert_eq!(options.locale_timeout, None);
    }

    #[test]
    fn test_options_from_env() {
        std::env::set_var("RETEXT_DRAIN_INTERVAL_MS", "40");
        std::env::set_var("RETEXT_LOCALE_TIMEOUT_MS", "1500");
        let options = RetextOptions::from_env().unwrap();
        assert_eq!(options.drain_interval, Duration::from_millis(40));
        assert_eq!(options.locale_timeout, Some(Duration::from_millis(1500)));

        std::env::set_var("RETEXT_DRAIN_INTERVAL_MS", "0");
        assert!(matches!(RetextOptions::from_env(), Err(RetextError::Env(_))));

        std::env::remove_var("RETEXT_DRAIN_INTERVAL_MS");
        std::env::remove_var("RETEXT_LOCALE_TIMEOUT_MS");
        assert_eq!(RetextOptions::from_env().unwrap(), RetextOptions::default());
    }

    #[test]
    fn test_error_display_is_transparent_for_env() {
        let error = RetextError::from(EnvError {
            variable: "RETEXT_DRAIN_INTERVAL_MS".to_string(),
            message: "Duration must be greater than 0".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "Environment variable 'RETEXT_DRAIN_INTERVAL_MS': Duration must be greater than 0"
        );
    }
}
