//! Runtime settings resolved from the command line and environment.

use std::path::{Path, PathBuf};

use crate::dictionary::{WordFrequency, DEFAULT_ALLOW_LIST};
use crate::error::McpSpellcheckError;

/// Environment variables checked for a GitHub token, in order, when no
/// explicit token or variable name is given.
pub const TOKEN_ENV_VARS: &[&str] = &["GITHUB_PERSONAL_ACCESS_TOKEN", "GITHUB_TOKEN"];

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub token: Option<String>,
    pub default_owner: Option<String>,
    pub allow_list: Vec<String>,
    pub dictionary_files: Vec<PathBuf>,
}

impl Config {
    /// Build the full allow-list: built-in words, then `extra_words`, then the
    /// contents of `allow_list_file`.
    pub fn build_allow_list(
        extra_words: &[String],
        allow_list_file: Option<&Path>,
    ) -> Result<Vec<String>, McpSpellcheckError> {
        let mut words: Vec<String> = DEFAULT_ALLOW_LIST.iter().map(|w| w.to_string()).collect();
        words.extend(extra_words.iter().cloned());
        if let Some(path) = allow_list_file {
            let text = std::fs::read_to_string(path).map_err(|source| {
                McpSpellcheckError::Dictionary {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            words.extend(parse_allow_list(&text));
        }
        Ok(words)
    }

    /// The embedded English word list plus any `--dictionary` files.
    pub fn load_dictionary(&self) -> Result<WordFrequency, McpSpellcheckError> {
        let mut dictionary = WordFrequency::english();
        for path in &self.dictionary_files {
            dictionary.load_file(path)?;
        }
        Ok(dictionary)
    }
}

/// One word per line; blank lines and `#` comments are skipped.
fn parse_allow_list(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
}

/// Resolve a GitHub token: explicit value > `token_env` > [`TOKEN_ENV_VARS`].
///
/// `lookup` reads an environment variable; empty values count as unset.
pub fn resolve_token<F>(explicit: Option<String>, token_env: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(t) = explicit.filter(|t| !t.is_empty()) {
        return Some(t);
    }
    let names: Vec<&str> = match token_env {
        Some(name) => vec![name],
        None => TOKEN_ENV_VARS.to_vec(),
    };
    names.into_iter().find_map(|name| match lookup(name) {
        Some(t) if !t.is_empty() => {
            tracing::info!(env = name, "Read GitHub token from environment variable");
            Some(t)
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_resolve_token_explicit_wins() {
        let lookup = env(&[("GITHUB_TOKEN", "from-env")]);
        assert_eq!(
            resolve_token(Some("explicit".to_string()), None, lookup).as_deref(),
            Some("explicit")
        );
    }

    #[test]
    fn test_resolve_token_custom_env() {
        let lookup = env(&[("MY_TOKEN", "custom"), ("GITHUB_TOKEN", "default")]);
        assert_eq!(
            resolve_token(None, Some("MY_TOKEN"), lookup).as_deref(),
            Some("custom")
        );
    }

    #[test]
    fn test_resolve_token_custom_env_does_not_fall_back() {
        let lookup = env(&[("GITHUB_TOKEN", "default")]);
        assert_eq!(resolve_token(None, Some("MY_TOKEN"), lookup), None);
    }

    #[test]
    fn test_resolve_token_default_order() {
        let lookup = env(&[
            ("GITHUB_PERSONAL_ACCESS_TOKEN", "pat"),
            ("GITHUB_TOKEN", "plain"),
        ]);
        assert_eq!(resolve_token(None, None, lookup).as_deref(), Some("pat"));

        let lookup = env(&[("GITHUB_PERSONAL_ACCESS_TOKEN", ""), ("GITHUB_TOKEN", "plain")]);
        assert_eq!(resolve_token(None, None, lookup).as_deref(), Some("plain"));
    }

    #[test]
    fn test_resolve_token_none() {
        assert_eq!(resolve_token(Some(String::new()), None, env(&[])), None);
    }

    #[test]
    fn test_build_allow_list_defaults() {
        let words = Config::build_allow_list(&[], None).unwrap();
        assert_eq!(words.len(), DEFAULT_ALLOW_LIST.len());
        assert!(words.iter().any(|w| w == "haystack"));
    }

    #[test]
    fn test_build_allow_list_with_extras_and_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# project names").unwrap();
        writeln!(file, "rmcp").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  octocrab  ").unwrap();

        let words =
            Config::build_allow_list(&["ferris".to_string()], Some(file.path())).unwrap();
        assert_eq!(&words[DEFAULT_ALLOW_LIST.len()..], ["ferris", "rmcp", "octocrab"]);
    }

    #[test]
    fn test_build_allow_list_missing_file() {
        let err = Config::build_allow_list(&[], Some(Path::new("/no/such/allow.txt"))).unwrap_err();
        assert!(matches!(err, McpSpellcheckError::Dictionary { .. }));
    }

    #[test]
    fn test_load_dictionary_merges_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rustacean 3").unwrap();
        let config = Config {
            dictionary_files: vec![file.path().to_path_buf()],
            ..Default::default()
        };
        let dictionary = config.load_dictionary().unwrap();
        assert!(dictionary.contains("rustacean"));
        assert!(dictionary.contains("the"));
    }
}
