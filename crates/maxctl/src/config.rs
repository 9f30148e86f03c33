use std::path::PathBuf;

use crate::cli::GlobalArgs;

pub const CONFIG_DIR_NAME: &str = ".maxctl";
pub const ENV_CONFIG_DIR: &str = "MAXCTL_CONFIG_DIR";

/// Output settings fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    pub color: bool,
    pub debug: bool,
}

impl OutputConfig {
    /// `terminal_colors` is whether the attached terminal supports styling.
    pub fn from_args(args: &GlobalArgs, terminal_colors: bool) -> Self {
        Self {
            json: args.json,
            quiet: args.quiet,
            color: terminal_colors && !args.no_color && !args.json,
            debug: args.debug,
        }
    }

    pub fn log_directive(&self) -> &'static str {
        if self.debug { "maxctl=debug" } else { "maxctl=warn" }
    }
}

/// `--config-dir`, then `$MAXCTL_CONFIG_DIR`, then `$HOME/.maxctl`.
pub fn config_dir<F>(args: &GlobalArgs, env: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = &args.config_dir {
        return dir.clone();
    }
    if let Some(dir) = env(ENV_CONFIG_DIR).filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }
    env("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(CONFIG_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_disables_color() {
        let args = GlobalArgs {
            json: true,
            ..GlobalArgs::default()
        };
        let config = OutputConfig::from_args(&args, true);
        assert!(config.json);
        assert!(!config.color);
    }

    #[test]
    fn no_color_flag_wins_over_terminal() {
        let args = GlobalArgs {
            no_color: true,
            ..GlobalArgs::default()
        };
        assert!(!OutputConfig::from_args(&args, true).color);
        assert!(OutputConfig::from_args(&GlobalArgs::default(), true).color);
        assert!(!OutputConfig::from_args(&GlobalArgs::default(), false).color);
    }

    #[test]
    fn debug_raises_log_level() {
        let args = GlobalArgs {
            debug: true,
            ..GlobalArgs::default()
        };
        assert_eq!(OutputConfig::from_args(&args, false).log_directive(), "maxctl=debug");
        assert_eq!(OutputConfig::default().log_directive(), "maxctl=warn");
    }

    #[test]
    fn config_dir_resolution_order() {
        let env = |name: &str| match name {
            "HOME" => Some("/home/ops".to_string()),
            _ => None,
        };
        assert_eq!(
            config_dir(&GlobalArgs::default(), env),
            PathBuf::from("/home/ops/.maxctl")
        );

        let env_override = |name: &str| match name {
            "MAXCTL_CONFIG_DIR" => Some("/etc/maxctl".to_string()),
            "HOME" => Some("/home/ops".to_string()),
            _ => None,
        };
        assert_eq!(
            config_dir(&GlobalArgs::default(), env_override),
            PathBuf::from("/etc/maxctl")
        );

        let args = GlobalArgs {
            config_dir: Some(PathBuf::from("/tmp/cfg")),
            ..GlobalArgs::default()
        };
        assert_eq!(config_dir(&args, env_override), PathBuf::from("/tmp/cfg"));
    }
}
