// # rulesyncd - Pangolin rule synchronizer daemon
//
// Thin integration layer only: reads configuration from environment
// variables, initializes logging and the runtime, wires the components
// together and starts the chosen driver. All synchronization logic
// lives in rulesync-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Required
// - `API_KEY`: Pangolin API bearer token
// - `RESOURCE_ID`: resource the managed rule is scoped under
// - `RULE_ID`: identifier of the managed rule (integer)
//
// ### Optional
// - `PANGOLIN_HOST`: API host (default https://api.pangolin.example:3004)
// - `IP_SERVICE_URL`: IP echo endpoint (default https://api.ipify.org)
// - `TARGET_DOMAIN`: hostname to track; a non-default value switches the
//   polling loop from the echo service to DNS resolution
//   (default my.dyn.dns.com)
// - `LOOP_SECONDS`: polling interval (default 60)
// - `RULE_PRIORITY`: rule priority re-sent on update (default 100)
// - `RULE_ACTION`: ACCEPT or DROP (default ACCEPT)
// - `RULE_MATCH`: IP, CIDR or PATH (default IP; invalid value is fatal)
// - `RULE_ENABLED`: true/false (default true)
// - `RULESYNC_LOG_LEVEL`: trace/debug/info/warn/error (default info)
//
// ### Listener mode
// - `EXPOSE_TRIGGER_WEBSITE`: true switches from polling to the inbound
//   trigger listener (default false)
// - `TRIGGER_WEBSITE_DOMAIN`: Host a trigger request must carry
//   (default trigger.my.dyn.dns.com)
// - `TRIGGER_WEBSITE_PATH`: path a trigger request must carry
//   (default /update)
// - `TRIGGER_WEBSITE_PORT`: listen port (default 8080)
//
// ## Example
//
// ```bash
// export API_KEY=your_token
// export RESOURCE_ID=res_abc123
// export RULE_ID=42
// export RULE_MATCH=IP
//
// rulesyncd
// ```

use anyhow::Result;
use rulesync_core::{
    IpSource, MatchType, RuleAction, RuleSpec, RuleTarget, SyncEngine, TriggerConfig,
    TriggerListener,
};
use rulesync_ip_dns::DnsIpSource;
use rulesync_ip_http::HttpIpSource;
use rulesync_store_pangolin::PangolinRuleStore;
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_PANGOLIN_HOST: &str = "https://api.pangolin.example:3004";
const DEFAULT_IP_SERVICE_URL: &str = "https://api.ipify.org";
const DEFAULT_TARGET_DOMAIN: &str = "my.dyn.dns.com";
const DEFAULT_LOOP_SECONDS: u64 = 60;
const DEFAULT_TRIGGER_DOMAIN: &str = "trigger.my.dyn.dns.com";
const DEFAULT_TRIGGER_PATH: &str = "/update";
const DEFAULT_TRIGGER_PORT: u16 = 8080;

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration, immutable after startup
#[derive(Debug)]
struct Config {
    api_key: String,
    resource_id: String,
    rule_id: i64,
    pangolin_host: String,
    ip_service_url: String,
    target_domain: String,
    loop_seconds: u64,
    rule: RuleSpec,
    expose_trigger_website: bool,
    trigger: TriggerConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from the process environment
    fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an injectable variable lookup
    ///
    /// Tests supply a map here instead of mutating the process
    /// environment.
    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => anyhow::bail!("{} is required. Set it via: export {}=...", key, key),
            }
        };
        let or_default = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };
        // Python-compatible boolean parsing: "true" (any case) is true,
        // everything else is false.
        let bool_flag = |key: &str, default: bool| -> bool {
            lookup(key)
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(default)
        };

        let rule_id: i64 = required("RULE_ID")?
            .parse()
            .map_err(|_| anyhow::anyhow!("RULE_ID must be an integer"))?;

        let loop_seconds: u64 = or_default("LOOP_SECONDS", &DEFAULT_LOOP_SECONDS.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("LOOP_SECONDS must be a positive integer"))?;

        let priority: i64 = or_default("RULE_PRIORITY", "100")
            .parse()
            .map_err(|_| anyhow::anyhow!("RULE_PRIORITY must be an integer"))?;

        // Uppercased before parsing, so rule_match=cidr is accepted
        let action: RuleAction = or_default("RULE_ACTION", "ACCEPT").to_uppercase().parse()?;
        let match_type: MatchType = or_default("RULE_MATCH", "IP").to_uppercase().parse()?;

        let trigger_port: u16 = or_default("TRIGGER_WEBSITE_PORT", &DEFAULT_TRIGGER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("TRIGGER_WEBSITE_PORT must be a port number"))?;

        Ok(Self {
            api_key: required("API_KEY")?,
            resource_id: required("RESOURCE_ID")?,
            rule_id,
            pangolin_host: or_default("PANGOLIN_HOST", DEFAULT_PANGOLIN_HOST),
            ip_service_url: or_default("IP_SERVICE_URL", DEFAULT_IP_SERVICE_URL),
            target_domain: or_default("TARGET_DOMAIN", DEFAULT_TARGET_DOMAIN),
            loop_seconds,
            rule: RuleSpec {
                action,
                match_type,
                priority,
                enabled: bool_flag("RULE_ENABLED", true),
            },
            expose_trigger_website: bool_flag("EXPOSE_TRIGGER_WEBSITE", false),
            trigger: TriggerConfig {
                domain: or_default("TRIGGER_WEBSITE_DOMAIN", DEFAULT_TRIGGER_DOMAIN),
                path: or_default("TRIGGER_WEBSITE_PATH", DEFAULT_TRIGGER_PATH),
                port: trigger_port,
            },
            log_level: or_default("RULESYNC_LOG_LEVEL", "info"),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.loop_seconds == 0 {
            anyhow::bail!("LOOP_SECONDS must be greater than 0");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!(
                "RULESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        }

        if self.expose_trigger_website {
            self.trigger.validate()?;
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    // Load and validate configuration before anything else; a bad
    // RULE_MATCH or missing credential must never enter a loop.
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    })
    .into()
}

/// Wire the components together and run the chosen driver
async fn run_daemon(config: Config) -> Result<()> {
    info!("Starting rulesyncd");
    info!(
        "Managing rule {} on resource {} ({} / {})",
        config.rule_id, config.resource_id, config.rule.action, config.rule.match_type
    );

    let store = PangolinRuleStore::new(
        &config.pangolin_host,
        &config.api_key,
        RuleTarget::new(&config.resource_id, config.rule_id),
        config.rule,
    )?;

    if config.expose_trigger_website {
        let listener = TriggerListener::new(Box::new(store), config.trigger)?;
        listener.run().await?;
    } else {
        // A non-default TARGET_DOMAIN means the operator wants to track
        // that hostname; otherwise track this machine's external IP.
        let ip_source: Box<dyn IpSource> = if config.target_domain != DEFAULT_TARGET_DOMAIN {
            info!("Tracking resolved address of {}", config.target_domain);
            Box::new(DnsIpSource::new(&config.target_domain)?)
        } else {
            info!("Tracking external IP via {}", config.ip_service_url);
            Box::new(HttpIpSource::new(&config.ip_service_url)?)
        };

        let engine = SyncEngine::new(
            ip_source,
            Box::new(store),
            Duration::from_secs(config.loop_seconds),
        );
        engine.run().await?;
    }

    Ok(())
}
