use std::path::PathBuf;

/// Path to an external scenario catalog; the bundled one is used when unset.
pub const CATALOG_ENV: &str = "TRIAGE_CATALOG";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let catalog_path = lookup(CATALOG_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self { catalog_path }
    }
}
