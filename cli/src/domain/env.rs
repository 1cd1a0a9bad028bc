//! Environment forwarded to the remote command.

use std::collections::BTreeMap;

/// Prefix marking a local variable for forwarding.
pub const REMOTE_ENV_PREFIX: &str = "REMOTE_ENV_";

/// Variables passed to the remote command, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteEnv {
    vars: BTreeMap<String, String>,
}

impl RemoteEnv {
    /// Collect every variable whose name starts with `prefix`, with the prefix
    /// stripped. Names that are empty after stripping are ignored.
    pub fn collect<I, K, V>(vars: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .filter_map(|(name, value)| {
                let stripped = name.as_ref().strip_prefix(prefix)?;
                (!stripped.is_empty()).then(|| (stripped.to_string(), value.into()))
            })
            .collect();
        Self { vars }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// `NAME=value` assignments in name order, ready for `env`.
    #[must_use]
    pub fn assignments(&self) -> Vec<String> {
        self.vars
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect()
    }
}
