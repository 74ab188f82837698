// seaport-config/src/lib.rs

use std::env;
use std::path::Path;
use thiserror::Error;

pub mod logging;
pub mod serde_helpers;
pub mod types;

pub use logging::init_tracing;
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution
#[derive(Default)]
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "SEAPORT_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<SeaportConfig, ConfigError> {
		let file_path = self.file_path.as_deref().ok_or_else(|| {
			ConfigError::FileNotFound("No configuration file specified".to_string())
		})?;

		let mut config = self.load_from_file(file_path).await?;

		self.apply_env_overrides(&mut config)?;
		validate_config(&config)?;

		tracing::info!(
			chain_id = config.network.chain_id,
			seaport = %config.contracts.seaport,
			"Loaded configuration from {}",
			file_path
		);
		Ok(config)
	}

	/// Parses a TOML document without touching the environment.
	pub fn from_toml(contents: &str) -> Result<SeaportConfig, ConfigError> {
		let config: SeaportConfig =
			toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
		validate_config(&config)?;
		Ok(config)
	}

	/// Synchronous variant used by the validation binary: substitutes
	/// `${VAR}` references and validates, but applies no overrides.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SeaportConfig, ConfigError> {
		let path = path.as_ref();
		if !path.exists() {
			return Err(ConfigError::FileNotFound(path.display().to_string()));
		}
		let content = std::fs::read_to_string(path)?;
		Self::from_toml(&substitute_env_vars(&content)?)
	}

	async fn load_from_file(&self, file_path: &str) -> Result<SeaportConfig, ConfigError> {
		if !Path::new(file_path).exists() {
			return Err(ConfigError::FileNotFound(file_path.to_string()));
		}
		let content = tokio::fs::read_to_string(file_path).await?;

		let substituted_content = substitute_env_vars(&content)?;

		toml::from_str(&substituted_content).map_err(|e| ConfigError::ParseError(e.to_string()))
	}

	fn apply_env_overrides(&self, config: &mut SeaportConfig) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			config.logging.level = log_level;
		}

		if let Ok(chain_id) = env::var(format!("{}CHAIN_ID", self.env_prefix)) {
			let chain_id: u64 = chain_id
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid chain id: {}", e)))?;
			config.network.chain_id = chain_id;
			// The delivery backend signs for the same chain.
			if let Some(table) = config.delivery.as_table_mut() {
				table.insert("chain_id".to_string(), toml::Value::Integer(chain_id as i64));
			}
		}

		if let Ok(rpc_url) = env::var(format!("{}RPC_URL", self.env_prefix)) {
			let table = config.delivery.as_table_mut().ok_or_else(|| {
				ConfigError::ValidationError("[delivery] must be a table".to_string())
			})?;
			table.insert("rpc_url".to_string(), toml::Value::String(rpc_url));
		}

		if let Ok(confirmations) = env::var(format!("{}CONFIRMATIONS", self.env_prefix)) {
			config.network.confirmations = confirmations.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid confirmations: {}", e))
			})?;
		}

		Ok(())
	}
}

/// Replaces every `${VAR_NAME}` with the value of that environment variable.
fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
	let mut result = content.to_string();

	let re = regex::Regex::new(r"\$\{([^}]+)\}")
		.map_err(|e| ConfigError::ParseError(e.to_string()))?;

	for cap in re.captures_iter(content) {
		let full_match = &cap[0];
		let var_name = &cap[1];

		let env_value =
			env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

		result = result.replace(full_match, &env_value);
	}

	Ok(result)
}

fn validate_config(config: &SeaportConfig) -> Result<(), ConfigError> {
	if config.network.chain_id == 0 {
		return Err(ConfigError::ValidationError(
			"network.chain_id must be non-zero".to_string(),
		));
	}

	if config.contracts.seaport.is_zero() {
		return Err(ConfigError::ValidationError(
			"contracts.seaport must not be the zero address".to_string(),
		));
	}

	if let Some((key, _)) = config
		.contracts
		.conduits
		.iter()
		.find(|(_, conduit)| conduit.is_zero())
	{
		return Err(ConfigError::ValidationError(format!(
			"conduit {} maps to the zero address",
			key
		)));
	}

	if !config.account.is_table() {
		return Err(ConfigError::ValidationError(
			"[account] must be a table".to_string(),
		));
	}

	if !config.delivery.is_table() {
		return Err(ConfigError::ValidationError(
			"[delivery] must be a table".to_string(),
		));
	}

	Ok(())
}
