mod shell_config;

pub use shell_config::{ConfigError, DEFAULT_CONFIG_FILE, ShellConfig};
