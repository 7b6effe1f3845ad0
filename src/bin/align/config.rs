//! Configuration for the `align` binary.
//!
//! Precedence: CLI flags > environment variables > config file > defaults.

use anyhow::{Context, Result};
use qkv_attention::nn::{AttentionConfig, Scaling};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default query sentence (French). Its 14 tokens include the final ".".
pub const DEFAULT_QUERY_SENTENCE: &str =
    "L' accord sur la zone économique européenne a été signé en août 1992 .";
/// Default key/value sentence (English).
pub const DEFAULT_KEY_SENTENCE: &str =
    "The agreement on the European Economic Area was signed in August 1992 .";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignConfig {
    /// The language whose words act as queries.
    #[serde(default = "default_query_side")]
    pub query: SideConfig,

    /// The language whose words act as keys and values.
    #[serde(default = "default_key_side")]
    pub key: SideConfig,

    #[serde(default)]
    pub attention: AttentionConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// One sentence plus the word vectors used to embed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideConfig {
    pub embeddings: PathBuf,
    pub sentence: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where to write the grayscale image; no image is written when unset.
    #[serde(default)]
    pub pgm: Option<PathBuf>,

    /// Pixels per weight in the image.
    #[serde(default = "default_cell_size")]
    pub cell_size: usize,

    /// Print the heat-map to stdout.
    #[serde(default = "default_true")]
    pub heatmap: bool,
}

fn default_query_side() -> SideConfig {
    SideConfig {
        embeddings: PathBuf::from("data/embeddings_fr.vec"),
        sentence: DEFAULT_QUERY_SENTENCE.to_string(),
    }
}

fn default_key_side() -> SideConfig {
    SideConfig {
        embeddings: PathBuf::from("data/embeddings_en.vec"),
        sentence: DEFAULT_KEY_SENTENCE.to_string(),
    }
}

fn default_cell_size() -> usize {
    16
}

fn default_true() -> bool {
    true
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            query: default_query_side(),
            key: default_key_side(),
            attention: AttentionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pgm: None,
            cell_size: default_cell_size(),
            heatmap: true,
        }
    }
}

impl AlignConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AlignConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        if let Scaling::Factor(f) = config.attention.scaling {
            anyhow::ensure!(
                f.is_finite(),
                "Scaling factor must be finite in {}: {}",
                path.display(),
                f
            );
        }
        Ok(config)
    }

    /// Loads the file (or defaults when no path is given), then applies environment overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies `QKV_*` overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("QKV_QUERY_EMBEDDINGS") {
            self.query.embeddings = PathBuf::from(path);
        }

        if let Some(path) = lookup("QKV_KEY_EMBEDDINGS") {
            self.key.embeddings = PathBuf::from(path);
        }

        if let Some(scaling) = lookup("QKV_SCALING") {
            self.attention.scaling = parse_scaling(&scaling)?;
        }

        Ok(())
    }
}

/// Parses the textual scaling names accepted in config files and the environment.
pub fn parse_scaling(value: &str) -> Result<Scaling> {
    match value.trim().to_lowercase().as_str() {
        "inverse-sqrt-dim" | "sqrt" => Ok(Scaling::InverseSqrtDim),
        "none" => Ok(Scaling::None),
        other => match other.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Scaling::Factor(f)),
            Ok(_) => anyhow::bail!("Scaling factor must be finite: {}", value),
            Err(_) => anyhow::bail!("Invalid scaling: {}", value),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AlignConfig::default();
        assert_eq!(config.attention.scaling, Scaling::InverseSqrtDim);
        assert_eq!(config.query.sentence.split_whitespace().count(), 14);
        assert!(config.output.pgm.is_none());
        assert!(config.output.heatmap);
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[key]\nembeddings = \"en.vec\"\nsentence = \"hello world\"\n\n[attention]\nscaling = \"none\"\n\n[output]\npgm = \"out.pgm\""
        )
        .unwrap();

        let config = AlignConfig::from_file(file.path()).unwrap();
        assert_eq!(config.key.embeddings, PathBuf::from("en.vec"));
        assert_eq!(config.key.sentence, "hello world");
        assert_eq!(config.query.sentence, DEFAULT_QUERY_SENTENCE);
        assert_eq!(config.attention.scaling, Scaling::None);
        assert_eq!(config.output.pgm, Some(PathBuf::from("out.pgm")));
        assert_eq!(config.output.cell_size, 16);
    }

    #[test]
    fn test_from_file_rejects_non_finite_factor() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[attention]\nscaling = {{ factor = inf }}").unwrap();

        assert!(AlignConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_rejects_non_finite_factor() {
        let mut config = AlignConfig::default();
        let result = config.apply_env(|key| (key == "QKV_SCALING").then(|| "nan".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_missing() {
        assert!(AlignConfig::from_file("no_such_align.toml").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("QKV_QUERY_EMBEDDINGS", "/tmp/fr.vec"),
            ("QKV_SCALING", "none"),
        ]
        .into_iter()
        .collect();

        let mut config = AlignConfig::default();
        config
            .apply_env(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.query.embeddings, PathBuf::from("/tmp/fr.vec"));
        assert_eq!(config.key.embeddings, PathBuf::from("data/embeddings_en.vec"));
        assert_eq!(config.attention.scaling, Scaling::None);
    }

    #[test]
    fn test_parse_scaling() {
        assert_eq!(parse_scaling("SQRT").unwrap(), Scaling::InverseSqrtDim);
        assert_eq!(parse_scaling("0.25").unwrap(), Scaling::Factor(0.25));
        assert!(parse_scaling("loud").is_err());
        for value in ["inf", "-inf", "NaN", "1e400"] {
            assert!(parse_scaling(value).is_err(), "{value} accepted");
        }
    }
}
