use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub openai: Option<OpenAiConfig>,
    pub training: Option<TrainingConfig>,
    pub parsing: Option<ParsingFileConfig>,
    pub web: Option<WebConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Model used to synthesize training prompts.
    pub model: Option<String>,
    /// Fine-tuned model served by the web front end.
    pub fine_tuned_model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub prompts_per_poem: Option<usize>,
    pub validation_ratio: Option<f64>,
    pub delay_ms: Option<u64>,
    pub training_file: Option<String>,
    pub validation_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingFileConfig {
    pub header_word_threshold: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebConfig {
    pub bind: Option<String>,
}

/// Platform config directory path: `<config_dir>/poemforge/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("poemforge").join("config.toml"))
}

/// Load config by cascading CWD `.poemforge.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".poemforge.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        openai: Some(OpenAiConfig {
            api_key: overlay
                .openai
                .as_ref()
                .and_then(|o| o.api_key.clone())
                .or_else(|| base.openai.as_ref().and_then(|o| o.api_key.clone())),
            base_url: overlay
                .openai
                .as_ref()
                .and_then(|o| o.base_url.clone())
                .or_else(|| base.openai.as_ref().and_then(|o| o.base_url.clone())),
            model: overlay
                .openai
                .as_ref()
                .and_then(|o| o.model.clone())
                .or_else(|| base.openai.as_ref().and_then(|o| o.model.clone())),
            fine_tuned_model: overlay
                .openai
                .as_ref()
                .and_then(|o| o.fine_tuned_model.clone())
                .or_else(|| {
                    base.openai
                        .as_ref()
                        .and_then(|o| o.fine_tuned_model.clone())
                }),
        }),
        training: Some(TrainingConfig {
            prompts_per_poem: overlay
                .training
                .as_ref()
                .and_then(|t| t.prompts_per_poem)
                .or_else(|| base.training.as_ref().and_then(|t| t.prompts_per_poem)),
            validation_ratio: overlay
                .training
                .as_ref()
                .and_then(|t| t.validation_ratio)
                .or_else(|| base.training.as_ref().and_then(|t| t.validation_ratio)),
            delay_ms: overlay
                .training
                .as_ref()
                .and_then(|t| t.delay_ms)
                .or_else(|| base.training.as_ref().and_then(|t| t.delay_ms)),
            training_file: overlay
                .training
                .as_ref()
                .and_then(|t| t.training_file.clone())
                .or_else(|| base.training.as_ref().and_then(|t| t.training_file.clone())),
            validation_file: overlay
                .training
                .as_ref()
                .and_then(|t| t.validation_file.clone())
                .or_else(|| {
                    base.training
                        .as_ref()
                        .and_then(|t| t.validation_file.clone())
                }),
        }),
        parsing: Some(ParsingFileConfig {
            header_word_threshold: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.header_word_threshold)
                .or_else(|| base.parsing.as_ref().and_then(|p| p.header_word_threshold)),
        }),
        web: Some(WebConfig {
            bind: overlay
                .web
                .as_ref()
                .and_then(|w| w.bind.clone())
                .or_else(|| base.web.as_ref().and_then(|w| w.bind.clone())),
        }),
    }
}

impl ConfigFile {
    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai.as_ref()?.api_key.as_deref()
    }

    pub fn openai_base_url(&self) -> Option<&str> {
        self.openai.as_ref()?.base_url.as_deref()
    }

    pub fn openai_model(&self) -> Option<&str> {
        self.openai.as_ref()?.model.as_deref()
    }

    pub fn fine_tuned_model(&self) -> Option<&str> {
        self.openai.as_ref()?.fine_tuned_model.as_deref()
    }

    pub fn training(&self) -> TrainingConfig {
        self.training.clone().unwrap_or_default()
    }

    pub fn header_word_threshold(&self) -> Option<usize> {
        self.parsing.as_ref()?.header_word_threshold
    }

    pub fn web_bind(&self) -> Option<&str> {
        self.web.as_ref()?.bind.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_deserializes() {
        let toml_str = "[training]\nprompts_per_poem = 3\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.training().prompts_per_poem, Some(3));
        assert!(parsed.openai.is_none());
        assert_eq!(parsed.openai_model(), None);
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            openai: Some(OpenAiConfig {
                model: Some("base-model".to_string()),
                api_key: Some("base-key".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            openai: Some(OpenAiConfig {
                model: Some("overlay-model".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.openai_model(), Some("overlay-model"));
        assert_eq!(merged.openai_api_key(), Some("base-key"));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            web: Some(WebConfig {
                bind: Some("0.0.0.0:8080".to_string()),
            }),
            parsing: Some(ParsingFileConfig {
                header_word_threshold: Some(7),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.web_bind(), Some("0.0.0.0:8080"));
        assert_eq!(merged.header_word_threshold(), Some(7));
    }

    #[test]
    fn load_from_path_reads_file_and_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[web]\nbind = \"127.0.0.1:9000\"\n").unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "this is [not toml").unwrap();

        let config = load_from_path(&good).unwrap();
        assert_eq!(config.web_bind(), Some("127.0.0.1:9000"));
        assert!(load_from_path(&bad).is_none());
        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());
    }
}
