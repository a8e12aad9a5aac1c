//! Property maps and the key filter applied to fetched host properties

use std::collections::BTreeMap;

/// String-keyed property set of one host.
pub type PropertyMap = BTreeMap<String, String>;

/// Keys copied into every query result whether or not they were requested.
pub const FIXED_KEYS: [&str; 2] = ["os.name", "user.name"];

pub fn missing_property_placeholder(key: &str) -> String {
    format!("The property with key {key} does not exist in the system application")
}

/// Selects `requested_keys` from `remote`, substituting the placeholder for absent
/// keys, then adds the fixed keys. Fixed keys missing on the remote host get the
/// same placeholder as requested ones.
pub fn filter_properties(remote: &PropertyMap, requested_keys: &[String]) -> PropertyMap {
    requested_keys
        .iter()
        .map(String::as_str)
        .chain(FIXED_KEYS)
        .map(|key| {
            let value = remote
                .get(key)
                .cloned()
                .unwrap_or_else(|| missing_property_placeholder(key));
            (key.to_string(), value)
        })
        .collect()
}
