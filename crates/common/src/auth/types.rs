//! Tenant token claim structures.

use serde::{Deserialize, Serialize};

/// Index visibility rules embedded in a tenant token.
///
/// Either a plain list of index uids (unrestricted access to each) or a map
/// from index uid (`"*"` acts as a wildcard) to a restriction object such
/// as `{"filter": "user_id = 1"}`. A `null` restriction means unrestricted
/// access to that index. The untagged representation keeps the list/map
/// distinction intact on the wire; the signer treats the rules as opaque
/// JSON beyond that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchRules {
    /// Unrestricted access to each listed index
    List(Vec<String>),
    /// Per-index (or wildcard) restriction objects
    Map(serde_json::Map<String, serde_json::Value>),
}

impl SearchRules {
    /// Rules granting unrestricted access to every index.
    pub fn any_index() -> Self {
        let mut map = serde_json::Map::new();
        map.insert("*".to_string(), serde_json::Value::Null);
        Self::Map(map)
    }
}

/// Claim set signed into a tenant token.
///
/// `exp` is the only time-based claim; no issued-at claim is written because
/// only the expiry matters to the verifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantTokenClaims {
    /// The search visibility rules, embedded as structured JSON
    pub search_rules: SearchRules,

    /// Uid of the API key the token derives from
    pub api_key_uid: String,

    /// Expiry as a Unix timestamp in seconds, if the token expires at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}
