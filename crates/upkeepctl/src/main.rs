// # upkeepctl - Upkeep Admin CLI
//
// Thin front end over `upkeep-core`: it reads configuration from the
// environment, connects a JSON-RPC broadcaster, runs one command and prints
// the result as JSON. All version dispatch lives in the library.
//
// ## Configuration
//
// - `UPKEEP_RPC_URL`: Node JSON-RPC endpoint (http or https)
// - `UPKEEP_FROM_ADDRESS`: Sending account, unlocked on the node
// - `UPKEEP_REGISTRY_ADDRESS`: Registry contract
// - `UPKEEP_REGISTRAR_ADDRESS`: Registrar contract (optional, read from the
//   registry's config when unset)
// - `UPKEEP_LINK_TOKEN_ADDRESS`: Funding token
// - `UPKEEP_CRON_FACTORY_ADDRESS`: Cron upkeep factory (optional, needed by
//   `register-cron`)
// - `UPKEEP_LOG_LEVEL`: trace, debug, info, warn or error (default: warn)
//
// ## Example
//
// ```bash
// export UPKEEP_RPC_URL=http://127.0.0.1:8545
// export UPKEEP_FROM_ADDRESS=0x...
// export UPKEEP_REGISTRY_ADDRESS=0x...
// export UPKEEP_LINK_TOKEN_ADDRESS=0x...
//
// upkeepctl upkeep 42
// upkeepctl pause 42
// upkeepctl register "my job" 0xTarget 500000 5000000000000000000
// upkeepctl --help
// ```

mod command;

use anyhow::{Context, Result};
use clap::Parser;
use command::{Cli, Command};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use upkeep_core::{AdminConfig, Address, RpcConfig, StaticSigner, UpkeepAdmin};
use upkeep_rpc::JsonRpcBroadcaster;

/// Exit codes
///
/// These codes follow systemd conventions:
/// - 0: Success
/// - 1: Configuration or usage error
/// - 2: Runtime error (RPC, contract or version failure)
#[derive(Debug, Clone, Copy)]
enum CtlExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    rpc_url: String,
    from: Address,
    registry: Address,
    registrar: Option<Address>,
    link_token: Address,
    cron_factory: Option<Address>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            rpc_url: required("UPKEEP_RPC_URL")?,
            from: required_address("UPKEEP_FROM_ADDRESS")?,
            registry: required_address("UPKEEP_REGISTRY_ADDRESS")?,
            registrar: optional_address("UPKEEP_REGISTRAR_ADDRESS")?,
            link_token: required_address("UPKEEP_LINK_TOKEN_ADDRESS")?,
            cron_factory: optional_address("UPKEEP_CRON_FACTORY_ADDRESS")?,
            log_level: env::var("UPKEEP_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.from.is_zero() {
            anyhow::bail!("UPKEEP_FROM_ADDRESS cannot be the zero address");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "UPKEEP_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.rpc_config().validate()?;
        self.admin_config().validate()?;
        Ok(())
    }

    fn rpc_config(&self) -> RpcConfig {
        RpcConfig::new(self.rpc_url.clone())
    }

    fn admin_config(&self) -> AdminConfig {
        let mut config = AdminConfig::new(self.registry, self.link_token);
        if let Some(registrar) = self.registrar {
            config = config.with_registrar(registrar);
        }
        if let Some(factory) = self.cron_factory {
            config = config.with_cron_factory(factory);
        }
        config
    }
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => anyhow::bail!("{} is required. Set it via: export {}=...", name, name),
    }
}

fn address(name: &str, value: &str) -> Result<Address> {
    command::parse_address(value)
        .map_err(anyhow::Error::msg)
        .with_context(|| name.to_string())
}

fn required_address(name: &str) -> Result<Address> {
    address(name, &required(name)?)
}

fn optional_address(name: &str) -> Result<Option<Address>> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(Some(address(name, value.trim())?)),
        _ => Ok(None),
    }
}

fn main() -> ExitCode {
    let command = match Cli::try_parse() {
        Ok(cli) => cli.command,
        // --help and --version also arrive here, on stdout
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                CtlExitCode::ConfigError.into()
            } else {
                CtlExitCode::Success.into()
            };
        }
    };

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // Results go to stdout; logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CtlExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        tokio::select! {
            result = run(config, command) => result,
            _ = tokio::signal::ctrl_c() => Err(anyhow::anyhow!(
                "Interrupted; a submitted transaction may still be mined"
            )),
        }
    });

    match result {
        Ok(output) => {
            println!("{}", output);
            CtlExitCode::Success.into()
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            CtlExitCode::RuntimeError.into()
        }
    }
}

/// Connect and run one command, returning its JSON output
async fn run(config: Config, command: Command) -> Result<String> {
    let broadcaster = JsonRpcBroadcaster::new(config.rpc_config())?;
    let admin = UpkeepAdmin::connect(
        Box::new(broadcaster),
        Box::new(StaticSigner::new(config.from)),
        config.admin_config(),
    )
    .await
    .context("Failed to connect to registry")?;

    info!(
        "Connected: registry generation {}, registrar {:?}",
        admin.registry_generation(),
        admin.registrar_address()
    );

    let value = command.execute(&admin).await?;
    Ok(serde_json::to_string_pretty(&value)?)
}
