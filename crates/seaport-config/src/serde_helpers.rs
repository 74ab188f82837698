//! Serde helpers for configuration deserialization

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::str::FromStr;

/// Deserializes a conduit table whose keys are 0x-prefixed conduit keys.
pub fn deserialize_conduit_map<'de, D>(deserializer: D) -> Result<HashMap<B256, Address>, D::Error>
where
	D: Deserializer<'de>,
{
	let map = HashMap::<String, String>::deserialize(deserializer)?;

	map.into_iter()
		.map(|(k, v)| {
			let key = B256::from_str(&k)
				.map_err(|_| serde::de::Error::custom(format!("Invalid conduit key: {}", k)))?;
			let conduit = Address::from_str(&v)
				.map_err(|_| serde::de::Error::custom(format!("Invalid conduit address: {}", v)))?;
			Ok((key, conduit))
		})
		.collect()
}

/// Serializes conduit keys back to hex string keys.
pub fn serialize_conduit_map<S>(
	map: &HashMap<B256, Address>,
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let string_map: HashMap<String, String> =
		map.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();

	string_map.serialize(serializer)
}
