/*
    Multiprop, synchronized parallel orbit propagation
    Copyright (C) 2024 The multiprop developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::time::{Epoch, TimeScale};
use serde::de::DeserializeOwned;
use serde::Serialize;
use snafu::prelude::*;
use std::fmt::Debug;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// The propagation configuration documents
pub mod config;
pub use self::config::*;

/// The force model descriptors of a configuration
pub mod forces;
pub use self::forces::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("failed to read configuration file {}: {source}", path.display()))]
    ReadError { path: PathBuf, source: io::Error },

    #[snafu(display("failed to parse JSON configuration: {source}"))]
    JsonError { source: serde_json::Error },

    #[snafu(display("failed to parse YAML configuration: {source}"))]
    YamlError { source: serde_yaml::Error },

    #[snafu(display("{field}: cannot parse `{value}` as a UTC epoch: {details}"))]
    InvalidEpoch {
        field: &'static str,
        value: String,
        details: String,
    },

    #[snafu(display("{field}: expected 6 Cartesian components but got {len}"))]
    StateVectorLength { field: &'static str, len: usize },

    #[snafu(display("{field}: value must be finite"))]
    NonFinite { field: &'static str },

    #[snafu(display("{field}: value must be strictly positive but got {value}"))]
    NonPositive { field: &'static str, value: f64 },

    #[snafu(display("{field}: {value} s is below the nanosecond time resolution"))]
    BelowTimeResolution { field: &'static str, value: f64 },

    #[snafu(display("MinTimeStep ({min} s) is greater than MaxTimeStep ({max} s)"))]
    InvertedStepBounds { min: f64, max: f64 },

    #[snafu(display("invalid force model: {reason}"))]
    InvalidForceModel { reason: String },

    #[snafu(display("configuration #{index}: {source}"))]
    Object {
        index: usize,
        #[snafu(source(from(ConfigError, Box::new)))]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// The name of the configuration field at fault, if the error concerns a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidEpoch { field, .. }
            | Self::StateVectorLength { field, .. }
            | Self::NonFinite { field }
            | Self::NonPositive { field, .. }
            | Self::BelowTimeResolution { field, .. } => Some(field),
            Self::InvertedStepBounds { .. } => Some("MinTimeStep"),
            Self::InvalidForceModel { .. } => Some("Forces"),
            Self::Object { source, .. } => source.field(),
            _ => None,
        }
    }

    /// The index of the offending configuration of a batch, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Object { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl PartialEq for ConfigError {
    /// No two configuration errors match
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

fn open<P: AsRef<Path>>(path: P) -> Result<BufReader<File>, ConfigError> {
    let file = File::open(&path).context(ReadSnafu {
        path: path.as_ref().to_path_buf(),
    })?;
    Ok(BufReader::new(file))
}

fn is_yaml<P: AsRef<Path>>(path: P) -> bool {
    matches!(
        path.as_ref().extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

pub trait ConfigRepr: Debug + Sized + Serialize + DeserializeOwned {
    /// Builds the configuration representation from the path to a JSON file, or a YAML file if its extension is `yaml` or `yml`
    fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let reader = open(&path)?;
        if is_yaml(&path) {
            serde_yaml::from_reader(reader).context(YamlSnafu)
        } else {
            serde_json::from_reader(reader).context(JsonSnafu)
        }
    }

    /// Builds a sequence of "Selves" from the provided path, which holds either a single document or a sequence of them
    fn load_many<P>(path: P) -> Result<Vec<Self>, ConfigError>
    where
        P: AsRef<Path>,
    {
        let reader = open(&path)?;
        if is_yaml(&path) {
            let value: serde_yaml::Value = serde_yaml::from_reader(reader).context(YamlSnafu)?;
            if value.is_sequence() {
                serde_yaml::from_value(value).context(YamlSnafu)
            } else {
                Ok(vec![serde_yaml::from_value(value).context(YamlSnafu)?])
            }
        } else {
            let value: serde_json::Value = serde_json::from_reader(reader).context(JsonSnafu)?;
            if value.is_array() {
                serde_json::from_value(value).context(JsonSnafu)
            } else {
                Ok(vec![serde_json::from_value(value).context(JsonSnafu)?])
            }
        }
    }

    /// Builds a sequence of "Selves" from the provided string of a yaml
    fn loads_many(data: &str) -> Result<Vec<Self>, ConfigError> {
        debug!("Loading YAML:\n{data}");
        serde_yaml::from_str(data).context(YamlSnafu)
    }

    /// Builds "Self" from the provided JSON text
    fn loads_json(data: &str) -> Result<Self, ConfigError> {
        debug!("Loading JSON:\n{data}");
        serde_json::from_str(data).context(JsonSnafu)
    }

    /// Builds a sequence of "Selves" from the provided JSON text of an array
    fn loads_json_many(data: &str) -> Result<Vec<Self>, ConfigError> {
        debug!("Loading JSON:\n{data}");
        serde_json::from_str(data).context(JsonSnafu)
    }
}

/// Objects which may be built from their intermediate configuration representation
pub trait Configurable
where
    Self: Sized,
{
    /// The intermediate representation needs to be serializable and deserializable
    type IntermediateRepr: ConfigRepr;

    /// Builds this object from the configuration stored in the provided file
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_config(Self::IntermediateRepr::load(path)?)
    }

    /// Creates a new instance of `self` from the configuration.
    fn from_config(cfg: Self::IntermediateRepr) -> Result<Self, ConfigError>;

    /// Converts self into the intermediate representation which is serializable.
    fn to_config(&self) -> Result<Self::IntermediateRepr, ConfigError>;
}

/// Parses an ISO-8601-like date time string as a UTC epoch, e.g. `2019-05-01T00:00:00Z` or `2019-05-01T00:00:00.123`.
///
/// Any time scale other than UTC is rejected. The `field` names the configuration entry in the error.
pub fn parse_utc_epoch(field: &'static str, value: &str) -> Result<Epoch, ConfigError> {
    let trimmed = value.trim();
    let stripped = trimmed
        .strip_suffix('Z')
        .or_else(|| trimmed.strip_suffix(" UTC"))
        .unwrap_or(trimmed);
    let epoch = Epoch::from_gregorian_str(stripped).map_err(|e| ConfigError::InvalidEpoch {
        field,
        value: value.to_string(),
        details: e.to_string(),
    })?;
    ensure!(
        epoch.time_scale == TimeScale::UTC,
        InvalidEpochSnafu {
            field,
            value,
            details: format!("expected a UTC epoch, got the {} time scale", epoch.time_scale),
        }
    );
    Ok(epoch)
}

#[cfg(test)]
mod ut_io {
    use super::*;

    #[test]
    fn utc_epochs() {
        let expected = Epoch::from_gregorian_utc_hms(2019, 5, 1, 0, 0, 0);
        for repr in [
            "2019-05-01T00:00:00Z",
            "2019-05-01T00:00:00",
            " 2019-05-01T00:00:00 ",
            "2019-05-01T00:00:00 UTC",
        ] {
            let epoch = parse_utc_epoch("Start", repr).unwrap();
            assert_eq!(epoch, expected, "{repr}");
            assert_eq!(epoch.time_scale, TimeScale::UTC);
        }

        let with_frac = parse_utc_epoch("Start", "2019-05-01T12:30:15.500000000Z").unwrap();
        assert_eq!(
            with_frac,
            Epoch::from_gregorian_utc(2019, 5, 1, 12, 30, 15, 500_000_000)
        );

        let err = parse_utc_epoch("Start", "yesterday").unwrap_err();
        assert_eq!(err.field(), Some("Start"));

        for repr in ["2019-05-01T00:00:00 TAI", "2019-05-01T00:00:00 GPST"] {
            let err = parse_utc_epoch("PropagationEnd", repr).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEpoch { .. }), "{repr}: {err}");
            assert_eq!(err.field(), Some("PropagationEnd"));
        }
    }
}
