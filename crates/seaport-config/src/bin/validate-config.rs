//! Configuration validation utility
//!
//! Usage: cargo run --bin validate-config config/example.toml

use std::env;
use std::process;

use anyhow::Context;
use seaport_config::{ConfigLoader, SeaportConfig};

fn load(path: &str) -> anyhow::Result<SeaportConfig> {
	ConfigLoader::from_file(path).with_context(|| format!("Failed to load {}", path))
}

fn main() {
	let args: Vec<String> = env::args().collect();

	if args.len() != 2 {
		eprintln!("Usage: {} <config-file>", args[0]);
		process::exit(1);
	}

	let config_path = &args[1];

	println!("Validating configuration file: {}", config_path);

	match load(config_path) {
		Ok(config) => {
			println!("✅ Configuration is valid!");
			println!("Chain id: {}", config.network.chain_id);
			println!("Seaport: {}", config.contracts.seaport);
			println!("Conduits configured: {}", config.contracts.conduits.len());
			println!("Approval strategy: {:?}", config.approvals.strategy);
			match config.contracts.proxy_registry {
				Some(registry) => println!("Proxy registry: {}", registry),
				None => println!("Proxy registry: none"),
			}
		}
		Err(e) => {
			eprintln!("❌ Configuration validation failed:");
			eprintln!("{:#}", e);
			process::exit(1);
		}
	}
}
