//! Workflow environment provided by Alfred.

use std::collections::HashMap;
use std::path::PathBuf;

const CACHE_DIR_VAR: &str = "alfred_workflow_cache";
const DATA_DIR_VAR: &str = "alfred_workflow_data";
const DEBUG_VAR: &str = "alfred_debug";

/// Variables Alfred sets before running a script filter.
///
/// Outside Alfred every field is empty and callers fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlfredEnv {
    pub cache_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub debug: bool,
}

impl AlfredEnv {
    /// Read the variables from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars().collect())
    }

    /// Read the variables from a map
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        let get = |name: &str| vars.get(name).filter(|v| !v.is_empty()).cloned();

        Self {
            cache_dir: get(CACHE_DIR_VAR).map(PathBuf::from),
            data_dir: get(DATA_DIR_VAR).map(PathBuf::from),
            debug: get(DEBUG_VAR).is_some_and(|v| v == "1"),
        }
    }

    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir.clone()
    }

    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vars() {
        let vars = HashMap::from([
            (CACHE_DIR_VAR.to_string(), "/tmp/cache".to_string()),
            (DATA_DIR_VAR.to_string(), "".to_string()),
            (DEBUG_VAR.to_string(), "1".to_string()),
        ]);

        let env = AlfredEnv::from_vars(vars);
        assert_eq!(env.cache_dir(), Some(PathBuf::from("/tmp/cache")));
        assert_eq!(env.data_dir(), None);
        assert!(env.debug);
    }

    #[test]
    fn test_outside_alfred() {
        let env = AlfredEnv::from_vars(HashMap::new());
        assert_eq!(env, AlfredEnv::default());
        assert_eq!(env.cache_dir(), None);
        assert!(!env.debug);
    }
}
