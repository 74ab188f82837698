//! Operator selection policy for approvals.

use serde::{Deserialize, Serialize};

/// Which operator approvals target when the account has a legacy proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStrategy {
	/// Use the proxy only when it already covers every requirement and the
	/// settlement operator does not.
	#[default]
	PreferExisting,
	/// Always approve the settlement operator.
	NeverProxy,
	/// Always approve the proxy when one is registered.
	AlwaysProxy,
}
