// # switchconfd - switchconf daemon
//
// This is a thin integration layer over switchconf-core. All document and
// module-state logic lives in the core crate.
//
// The switchconfd binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Loading the optional JSON profile
// 3. Building the engine
// 4. Rendering the requested sections to stdout
//
// ## Configuration
//
// - `SWITCHCONF_PROFILE`: Path to a JSON profile (optional, stock defaults otherwise)
// - `SWITCHCONF_SECTIONS`: Comma-separated section keys to render (default: all registered)
// - `SWITCHCONF_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export SWITCHCONF_PROFILE=/etc/switchconf/profile.json
// export SWITCHCONF_SECTIONS=acl.conf,modules.conf
//
// switchconfd > rendered.xml
// ```

use anyhow::{Context, Result};
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use switchconf_core::{ConfigEngine, SwitchConfig};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum SwitchconfExitCode {
    /// Every requested section rendered
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// A section failed to render
    RuntimeError = 2,
}

impl From<SwitchconfExitCode> for ExitCode {
    fn from(code: SwitchconfExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Daemon configuration
struct Config {
    profile: Option<PathBuf>,
    sections: Vec<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self {
            profile: env::var("SWITCHCONF_PROFILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            sections: env::var("SWITCHCONF_SECTIONS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            log_level: env::var("SWITCHCONF_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.profile
            && !path.is_file()
        {
            anyhow::bail!(
                "SWITCHCONF_PROFILE does not point to a file: {}",
                path.display()
            );
        }

        for section in &self.sections {
            if !section.ends_with(".conf") {
                anyhow::bail!(
                    "SWITCHCONF_SECTIONS entry '{}' is not a section key. \
                    Keys look like acl.conf or modules.conf",
                    section
                );
            }
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "SWITCHCONF_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Load the profile, or the stock defaults when none is configured
    fn load_profile(&self) -> Result<SwitchConfig> {
        match self.profile {
            Some(ref path) => SwitchConfig::from_json_file(path)
                .with_context(|| format!("Failed to load profile {}", path.display())),
            None => Ok(SwitchConfig::default()),
        }
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return SwitchconfExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so stdout carries only documents
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SwitchconfExitCode::ConfigError.into();
    }

    info!("Starting switchconfd");

    let profile = match config.load_profile() {
        Ok(profile) => profile,
        Err(e) => {
            error!("{:#}", e);
            return SwitchconfExitCode::ConfigError.into();
        }
    };

    // Events are for monitoring only; failures are counted from lookup results
    let (engine, _event_rx) = match ConfigEngine::new(profile) {
        Ok(pair) => pair,
        Err(e) => {
            error!("Invalid profile: {}", e);
            return SwitchconfExitCode::ConfigError.into();
        }
    };

    let sections = if config.sections.is_empty() {
        engine.registry().keys()
    } else {
        config.sections.clone()
    };

    let stdout = std::io::stdout();
    let failed = match render_sections(&engine, &sections, &mut stdout.lock()) {
        Ok(failed) => failed,
        Err(e) => {
            error!("Render error: {:#}", e);
            return SwitchconfExitCode::RuntimeError.into();
        }
    };

    if failed > 0 {
        error!("{} section(s) failed to render", failed);
        return SwitchconfExitCode::RuntimeError.into();
    }

    info!("Rendered {} section(s)", sections.len());
    SwitchconfExitCode::CleanShutdown.into()
}

/// Render each section and write it to `out`, one document per line
///
/// Sections that fail to render are logged and skipped, so one broken
/// section does not hide the others.
///
/// # Returns
///
/// The number of sections that failed to render
fn render_sections(
    engine: &ConfigEngine,
    sections: &[String],
    out: &mut impl Write,
) -> Result<usize> {
    let mut failed = 0;

    for key in sections {
        if !engine.registry().has_provider(key) {
            warn!("No provider registered for {}, rendering empty envelope", key);
        }

        match engine.config_lookup(key, key) {
            Ok(xml) => writeln!(out, "{}", xml).context("Failed to write document")?,
            Err(e) => {
                warn!("{} failed: {}", key, e);
                failed += 1;
            }
        }
    }

    out.flush().context("Failed to flush output")?;
    Ok(failed)
}
