//! The reasoning engine and the external matcher agree on a handful of
//! spellings: which functor marks a computation clause, and which
//! functor a query goal carries on the matcher's side.  These live in
//! a `CompilerConfig`, which may be loaded from a JSON document.
//!
//! The variable sigil and the wildcard marker are part of the wire
//! format itself, and are not configurable.
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Renames query goals from the reasoning engine's functor to the
/// matcher's.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FunctorRename {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Functor of computation clauses, `(tag operator input output)`.
    pub computation_tag: String,
    /// Schedule clauses with fewer distinct variables first.
    pub sort_by_variable_count: bool,
    /// Applied to queries before encoding them, if present.
    pub query_functor: Option<FunctorRename>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            computation_tag: "CPU".into(),
            sort_by_variable_count: true,
            query_functor: Some(FunctorRename {
                from: "goal".into(),
                to: "ev".into(),
            }),
        }
    }
}

impl CompilerConfig {
    /// Parses a JSON configuration document.  Missing fields take
    /// their default value.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the document does not deserialize, or if the
    /// computation tag is empty.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `Err` if the computation tag is empty: no atom could
    /// ever match it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.computation_tag.is_empty() {
            return Err(ConfigError::EmptyComputationTag);
        }

        Ok(())
    }
}

#[test]
fn test_default_config() {
    let config = CompilerConfig::default();

    assert_eq!(config.computation_tag, "CPU");
    assert!(config.sort_by_variable_count);
    assert_eq!(
        config.query_functor,
        Some(FunctorRename {
            from: "goal".into(),
            to: "ev".into()
        })
    );
}

#[test]
fn test_from_json_partial() {
    let config =
        CompilerConfig::from_json(r#"{ "computation_tag": "Compute" }"#).expect("ok");

    assert_eq!(config.computation_tag, "Compute");
    assert!(config.sort_by_variable_count);
    assert!(config.query_functor.is_some());
}

#[test]
fn test_from_json_no_rename() {
    let config = CompilerConfig::from_json(
        r#"{ "sort_by_variable_count": false, "query_functor": null }"#,
    )
    .expect("ok");

    assert!(!config.sort_by_variable_count);
    assert_eq!(config.query_functor, None);
}

#[test]
fn test_from_json_rejects_empty_tag() {
    assert!(matches!(
        CompilerConfig::from_json(r#"{ "computation_tag": "" }"#),
        Err(ConfigError::EmptyComputationTag)
    ));
    assert!(matches!(
        CompilerConfig::from_json("{ not json"),
        Err(ConfigError::Json(_))
    ));
}
