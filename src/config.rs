use anyhow::Error;
use serde::Deserialize;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ConfigInner {
    /// Pad listing the upcoming episodes, the first pad link is today's show.
    #[serde(default = "default_index_url")]
    pub pad_index_url: String,
    #[serde(default = "default_host_prefix")]
    pub pad_host_prefix: String,
    /// Seconds, applies to each request.
    pub pad_fetch_timeout: Option<u64>,
}

fn default_index_url() -> String {
    "https://pad.ccc-p.org/Radio".into()
}

fn default_host_prefix() -> String {
    "https://pad.ccc-p.org/".into()
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            pad_index_url: default_index_url(),
            pad_host_prefix: default_host_prefix(),
            pad_fetch_timeout: None,
        }
    }
}

impl ConfigInner {
    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars).map_err(Into::into)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.pad_fetch_timeout.map(Duration::from_secs)
    }
}

#[derive(Default, Debug, Clone)]
pub struct Config(Arc<ConfigInner>);

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init_config() -> Result<Self, Error> {
        let fname = Path::new("config.env");
        let config_dir = dirs::config_dir().unwrap_or_else(|| "./".into());
        let default_fname = config_dir.join("padcatch_rust").join("config.env");

        let env_file = if fname.exists() {
            fname
        } else {
            default_fname.as_path()
        };

        dotenvy::dotenv().ok();

        if env_file.exists() {
            dotenvy::from_path(env_file).ok();
        }

        let conf: ConfigInner = envy::from_env()?;

        Ok(Self(Arc::new(conf)))
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self(Arc::new(inner))
    }
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
