use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SITE_TITLE: &str = "Prompts with Friends";
pub const DEFAULT_SITE_DESCRIPTION: &str =
    "Store your OpenAI keys, write prompts together and run them with your team.";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub og: OgConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Development mode disables response caching.
    #[serde(default = "default_dev")]
    pub dev: bool,
}

fn default_dev() -> bool { cfg!(debug_assertions) }

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_SITE_TITLE.to_string(),
            description: DEFAULT_SITE_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OgConfig {
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub font_weight: u16,
    /// Outline every text box in the rendered cards.
    pub debug: bool,
}

impl Default for OgConfig {
    fn default() -> Self {
        Self {
            fonts_dir: PathBuf::from("fonts"),
            font_family: "Montserrat".to_string(),
            font_weight: 600,
            debug: false,
        }
    }
}
