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

use super::{ConfigRepr, ForceModelConfig};
use crate::propagators::IntegratorMethod;
use serde::{Deserialize, Serialize};

/// The configuration of the propagation of one object.
///
/// Field names follow the JSON documents, e.g. `{"Propagation": {"Start": ..., "InitialState": [...]}, ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PropagationConfig {
    pub propagation: PropagationSettings,
    pub integration: IntegrationSettings,
    pub space_object: SpaceObjectSettings,
    /// Force models applied on top of the two body gravity of the Earth, in order
    #[serde(default)]
    pub forces: Vec<ForceModelConfig>,
}

impl ConfigRepr for PropagationConfig {}

/// Initial conditions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PropagationSettings {
    /// Epoch of the initial state, as a UTC date time string
    pub start: String,
    /// EME2000 position (m) and velocity (m/s)
    pub initial_state: Vec<f64>,
}

/// Adaptive integrator settings, in seconds for the steps
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IntegrationSettings {
    pub min_time_step: f64,
    pub max_time_step: f64,
    pub abs_tolerance: f64,
    pub rel_tolerance: f64,
    #[serde(default)]
    pub method: IntegratorMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_step: Option<f64>,
}

/// Physical properties of the object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpaceObjectSettings {
    /// in kg
    pub mass: f64,
    /// Cross section used for drag and SRP, in m^2
    #[serde(default = "default_area")]
    pub area: f64,
    #[serde(default = "default_cd")]
    pub cd: f64,
    #[serde(default = "default_cr")]
    pub cr: f64,
}

fn default_area() -> f64 {
    1.0
}

fn default_cd() -> f64 {
    2.2
}

fn default_cr() -> f64 {
    1.5
}
