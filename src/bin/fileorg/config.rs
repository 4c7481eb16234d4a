use super::{OverflowArg, PlacementArg};
use clap::ValueEnum;
use fileorg::storage::SimOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Simulation overrides from the `[simulation]` table or a named profile.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub block_size: Option<usize>,
    pub num_buckets: Option<usize>,
    pub select_count: Option<usize>,
    pub delete_count: Option<usize>,
    pub ordered_placement: Option<PlacementArg>,
    pub hash_overflow: Option<OverflowArg>,
}

impl Profile {
    pub fn apply(&self, mut opts: SimOptions) -> SimOptions {
        if let Some(block_size) = self.block_size {
            opts = opts.block_size(block_size);
        }
        if let Some(num_buckets) = self.num_buckets {
            opts = opts.num_buckets(num_buckets);
        }
        if let Some(count) = self.select_count {
            opts = opts.select_count(count);
        }
        if let Some(count) = self.delete_count {
            opts = opts.delete_count(count);
        }
        if let Some(placement) = self.ordered_placement {
            opts = opts.ordered_placement(placement.into());
        }
        if let Some(overflow) = self.hash_overflow {
            opts = opts.hash_overflow(overflow.into());
        }
        opts
    }
}

#[derive(Debug, Default)]
pub struct CliConfig {
    path: Option<PathBuf>,
    data: RawConfig,
    base: Profile,
    profiles: HashMap<String, Profile>,
}

impl CliConfig {
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit.or_else(default_config_path);
        let data = match path.as_ref() {
            Some(config_path) if config_path.exists() => read_file(config_path)?,
            _ => RawConfig::default(),
        };
        let base = convert_profile("simulation", &data.simulation)?;
        let profiles = parse_profiles(&data)?;
        Ok(Self {
            path,
            data,
            base,
            profiles,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn default_dataset(&self) -> Option<&PathBuf> {
        self.data.dataset.default_path.as_ref()
    }

    pub fn id_column(&self) -> Option<&str> {
        self.data.dataset.id_column.as_deref()
    }

    /// Layers `[simulation]` and then the selected profile over `opts`.
    ///
    /// An explicit `profile` must exist; otherwise `default_profile` is used if set.
    pub fn resolve(
        &self,
        profile: Option<&str>,
        opts: SimOptions,
    ) -> Result<SimOptions, ConfigError> {
        let opts = self.base.apply(opts);
        let selected = match profile {
            Some(name) => Some(self.profiles.get(name).ok_or_else(|| {
                ConfigError::ProfileNotFound {
                    name: name.to_string(),
                }
            })?),
            None => self
                .data
                .default_profile
                .as_deref()
                .and_then(|name| self.profiles.get(name)),
        };
        Ok(match selected {
            Some(profile) => profile.apply(opts),
            None => opts,
        })
    }

    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn read_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_profiles(data: &RawConfig) -> Result<HashMap<String, Profile>, ConfigError> {
    let mut profiles = HashMap::new();
    for (name, raw) in &data.profiles {
        profiles.insert(name.clone(), convert_profile(name, raw)?);
    }
    if let Some(default_name) = data.default_profile.as_ref() {
        if !profiles.contains_key(default_name) {
            return Err(ConfigError::ProfileNotFound {
                name: default_name.clone(),
            });
        }
    }
    Ok(profiles)
}

fn convert_profile(name: &str, raw: &RawSimulation) -> Result<Profile, ConfigError> {
    let ordered_placement = match raw.ordered_placement.as_deref() {
        Some(value) => Some(PlacementArg::from_str(value, true).map_err(|_| {
            ConfigError::InvalidValue {
                profile: name.to_string(),
                key: "ordered_placement",
                value: value.to_string(),
            }
        })?),
        None => None,
    };
    let hash_overflow = match raw.hash_overflow.as_deref() {
        Some(value) => Some(OverflowArg::from_str(value, true).map_err(|_| {
            ConfigError::InvalidValue {
                profile: name.to_string(),
                key: "hash_overflow",
                value: value.to_string(),
            }
        })?),
        None => None,
    };
    Ok(Profile {
        block_size: raw.block_size,
        num_buckets: raw.num_buckets,
        select_count: raw.select_count,
        delete_count: raw.delete_count,
        ordered_placement,
        hash_overflow,
    })
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawConfig {
    #[serde(default)]
    dataset: DatasetSection,
    #[serde(default)]
    simulation: RawSimulation,
    #[serde(default)]
    profiles: HashMap<String, RawSimulation>,
    #[serde(default)]
    default_profile: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct DatasetSection {
    #[serde(rename = "default")]
    default_path: Option<PathBuf>,
    id_column: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawSimulation {
    block_size: Option<usize>,
    num_buckets: Option<usize>,
    select_count: Option<usize>,
    delete_count: Option<usize>,
    ordered_placement: Option<String>,
    hash_overflow: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },
    #[error("'{profile}' {key} value '{value}' is invalid")]
    InvalidValue {
        profile: String,
        key: &'static str,
        value: String,
    },
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("fileorg").join("config.toml"))
}
