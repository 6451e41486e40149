use std::env;
use std::process::ExitCode;
use superset_settings::audit::{Severity, audit, has_critical};
use superset_settings::config::{EnvSource, Settings};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Names an overlay file when `--config` is not given.
const CONFIG_PATH_VAR: &str = "SUPERSET_SETTINGS_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug)]
struct Args {
    config_path: Option<String>,
    format: OutputFormat,
    check: bool,
    fingerprint: bool,
}

fn parse_args(env: &EnvSource) -> Result<Args, String> {
    let mut args = Args {
        config_path: env.get(CONFIG_PATH_VAR).map(str::to_string),
        format: OutputFormat::Json,
        check: false,
        fingerprint: false,
    };

    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            args.config_path = Some(path.to_string());
        } else if let Some(format) = arg.strip_prefix("--format=") {
            args.format = match format {
                "json" => OutputFormat::Json,
                "yaml" => OutputFormat::Yaml,
                other => return Err(format!("unknown format: {}", other)),
            };
        } else if arg == "--check" {
            args.check = true;
        } else if arg == "--fingerprint" {
            args.fingerprint = true;
        } else {
            return Err(format!("unknown argument: {}", arg));
        }
    }

    Ok(args)
}

fn init_tracing(directives: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Publish the variables third-party clients discover credentials through.
fn bootstrap(settings: &Settings) {
    for (key, value) in settings.process_env_exports() {
        // Single-threaded at this point: no other thread reads the environment.
        unsafe {
            env::set_var(key, &value);
        }
        info!(key = %key, value = %value, "exported process variable");
    }
}

fn main() -> ExitCode {
    // Load .env file if it exists (ignore error if not found)
    dotenvy::dotenv().ok();

    let env = EnvSource::from_process();

    let args = match parse_args(&env) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "usage: superset-settings [--config=PATH] [--format=json|yaml] [--check] [--fingerprint]"
            );
            return ExitCode::from(1);
        }
    };

    let assembled = match args.config_path.as_deref() {
        Some(path) => Settings::load(path, &env),
        None => Settings::assemble(&env),
    };

    let settings = match assembled {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to assemble settings: {}", e);
            return ExitCode::from(1);
        }
    };

    init_tracing(&settings.logging.filter_directives());
    info!(
        config = args.config_path.as_deref().unwrap_or("<defaults>"),
        redis = %settings.redis.url(settings.task_queue.broker_db),
        feature_flags = settings.feature_flags.len(),
        smtp_transport = ?settings.smtp.transport(),
        "settings assembled"
    );

    bootstrap(&settings);

    let findings = audit(&settings);
    for finding in &findings {
        match finding.severity {
            Severity::Critical => error!(key = finding.key, "{}", finding.message),
            Severity::Warning => warn!(key = finding.key, "{}", finding.message),
        }
    }

    let output = if args.fingerprint {
        settings.fingerprint()
    } else {
        match args.format {
            OutputFormat::Json => settings.to_json(),
            OutputFormat::Yaml => settings.to_yaml(),
        }
    };

    match output {
        Ok(text) => println!("{}", text),
        Err(e) => {
            error!(error = %e, "failed to render settings");
            return ExitCode::from(1);
        }
    }

    if args.check && has_critical(&findings) {
        error!(
            critical = findings
                .iter()
                .filter(|f| f.severity == Severity::Critical)
                .count(),
            "settings are not safe for production"
        );
        return ExitCode::from(2);
    }

    ExitCode::SUCCESS
}
