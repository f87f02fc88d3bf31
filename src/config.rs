use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Document AI processor id
    #[arg(long, env = "PROCESSOR_ID")]
    pub processor_id: Option<String>,

    /// Path to the service credential file
    #[arg(long, env = "CREDENTIALS_PATH")]
    pub credentials_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Identity of the external extraction processor.
///
/// Read once at startup and immutable thereafter; the client borrows it
/// during construction and keeps no reference to mutable state.
#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    pub project_id: String,
    pub location: String,
    pub processor_id: String,
    pub credentials_path: String,
    /// MIME type uploads are treated as. Fixed per deployment; the
    /// service does no content sniffing.
    pub mime_type: String,
    /// Override for the service base URL (self-hosted or emulated
    /// deployments). Derived from `location` when unset.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults (processor identity values mirror the reference
        //    deployment; override per environment)
        builder = builder
            .set_default("server.port", 8080)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("extraction.project_id", "")?
            .set_default("extraction.location", "us")?
            .set_default("extraction.processor_id", "")?
            .set_default("extraction.credentials_path", "service_account.json")?
            .set_default("extraction.mime_type", "image/png")?;

        // 2. Config file: explicit path first, ./config.yaml fallback
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::new(path, FileFormat::Yaml));
        } else {
            builder = builder.add_source(File::new("config.yaml", FileFormat::Yaml).required(false));
        }

        // 3. Environment variables (prefixed with DLS_)
        // E.g. DLS_EXTRACTION__PROJECT_ID=my-project
        builder = builder.add_source(
            Environment::with_prefix("DLS")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI overrides (clap also resolves PORT/PROCESSOR_ID envs)
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(processor_id) = cli.processor_id {
            builder = builder.set_override("extraction.processor_id", processor_id)?;
        }
        if let Some(credentials_path) = cli.credentials_path {
            builder = builder.set_override("extraction.credentials_path", credentials_path)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}
