use anyhow::Error;
use clap::Parser;
use log::{debug, LevelFilter};
use std::fs::OpenOptions;
use std::io::{stdout, Write};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::episode::EpisodeRecord;
use crate::pad_connection::PadConnection;
use crate::pad_error::PadError;
use crate::pad_source::PadSource;

/// Turn a radio show pad into a podcast feed entry.
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PadcatchOpts {
    /// Yaml file the entry is appended to, an empty value prints to stdout
    #[arg(short = 'o', long = "output", default_value = "../content.yaml")]
    pub output: String,
    /// Pad of the episode, defaults to the first pad linked from the index pad
    #[arg(short = 'l', long = "link")]
    pub pad_url: Option<String>,
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
    /// Timeout in seconds for each request
    #[arg(short = 't', long = "timeout")]
    pub timeout: Option<u64>,
}

impl PadcatchOpts {
    pub async fn process_args() -> Result<(), Error> {
        let opts = Self::parse();
        init_logger(opts.verbose);

        let config = Config::init_config()?;
        let timeout = opts
            .timeout
            .map(Duration::from_secs)
            .or_else(|| config.fetch_timeout());
        let conn = PadConnection::new(timeout)?;

        match opts.run(&config, &conn).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let kind = e.kind();
                Err(Error::new(e).context(format!("{} error", kind)))
            }
        }
    }

    pub async fn run<S>(self, config: &Config, source: &S) -> Result<(), PadError>
    where
        S: PadSource + Sync + ?Sized,
    {
        let record = self.episode_record(config, source).await?;
        let yaml = record.to_yaml()?;
        write_output(&self.output, &yaml)
    }

    pub async fn episode_record<S>(
        &self,
        config: &Config,
        source: &S,
    ) -> Result<EpisodeRecord, PadError>
    where
        S: PadSource + Sync + ?Sized,
    {
        let pad_url = match self.pad_url.as_ref() {
            Some(pad_url) => {
                if !pad_url.starts_with(&config.pad_host_prefix) {
                    return Err(PadError::ForeignPadUrl {
                        url: pad_url.clone(),
                        prefix: config.pad_host_prefix.clone(),
                    });
                }
                pad_url.clone()
            }
            None => source
                .first_link(&config.pad_index_url, &config.pad_host_prefix)
                .await?
                .ok_or_else(|| PadError::NoEpisodeLink(config.pad_index_url.clone()))?,
        };
        debug!("pad url: {}", pad_url);

        let sections = source.pad_sections(&pad_url).await?;
        EpisodeRecord::assemble(&pad_url, &sections, source).await
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Append `yaml` to an existing file at `output`, or print it when `output` is empty.
pub fn write_output(output: &str, yaml: &str) -> Result<(), PadError> {
    if output.is_empty() {
        return stdout()
            .lock()
            .write_all(yaml.as_bytes())
            .map_err(|source| PadError::Output {
                path: "<stdout>".into(),
                source,
            });
    }
    let path = Path::new(output);
    let output_error = |source: std::io::Error| {
        debug!("{}", yaml);
        PadError::Output {
            path: path.to_path_buf(),
            source,
        }
    };
    let mut f = OpenOptions::new()
        .read(true)
        .append(true)
        .open(path)
        .map_err(output_error)?;
    f.write_all(yaml.as_bytes()).map_err(output_error)?;
    f.sync_all().map_err(output_error)
}
