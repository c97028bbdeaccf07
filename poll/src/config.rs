use log::warn;
use once_cell::sync::OnceCell;
use serde_derive::Deserialize;
use std::sync::Mutex;

static INSTANCE: OnceCell<Mutex<RuntimeConfig>> = OnceCell::new();

pub fn instance() -> &'static Mutex<RuntimeConfig> {
    INSTANCE.get_or_init(|| Mutex::new(RuntimeConfig::new()))
}

/// Bounds enforced by the schema validator.
///
/// All replicas of a deployment must run with identical limits, otherwise
/// they diverge on which commands they accept.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SchemaLimits {
    #[serde(default = "default_question_max")]
    pub question_max: usize,
    #[serde(default = "default_options_min")]
    pub options_min: usize,
    #[serde(default = "default_options_max")]
    pub options_max: usize,
    #[serde(default = "default_option_max")]
    pub option_max: usize,
    #[serde(default = "default_poll_id_max")]
    pub poll_id_max: usize,
}

fn default_question_max() -> usize {
    256
}
fn default_options_min() -> usize {
    2
}
fn default_options_max() -> usize {
    10
}
fn default_option_max() -> usize {
    128
}
fn default_poll_id_max() -> usize {
    64
}

impl Default for SchemaLimits {
    fn default() -> Self {
        SchemaLimits {
            question_max: default_question_max(),
            options_min: default_options_min(),
            options_max: default_options_max(),
            option_max: default_option_max(),
            poll_id_max: default_poll_id_max(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub limits: SchemaLimits,
}

impl RuntimeConfig {
    pub fn new() -> Self {
        RuntimeConfig {
            limits: SchemaLimits::default(),
        }
    }

    pub fn from_toml(path: &str) -> Option<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "Something went wrong reading the runtime config file, {:?}",
                    e
                );
                return Some(RuntimeConfig::new());
            }
        };
        let config: RuntimeConfig = match toml::from_str(&contents) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "Something went wrong reading the runtime config file, {:?}",
                    e
                );
                return Some(RuntimeConfig::new());
            }
        };
        instance()
            .lock()
            .unwrap()
            .limits
            .clone_from(&config.limits);
        Some(config)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let limits = SchemaLimits::default();
        assert_eq!(limits.question_max, 256);
        assert_eq!(limits.options_min, 2);
        assert_eq!(limits.options_max, 10);
        assert_eq!(limits.option_max, 128);
        assert_eq!(limits.poll_id_max, 64);
    }

    #[test]
    fn test_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nquestion_max = 100").unwrap();
        let config = RuntimeConfig::from_toml(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.limits.question_max, 100);
        assert_eq!(config.limits.options_max, 10);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = RuntimeConfig::from_toml("/nonexistent/poll.toml").unwrap();
        assert_eq!(config.limits, SchemaLimits::default());
    }
}
