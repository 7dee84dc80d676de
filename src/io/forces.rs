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

use super::{ConfigError, InvalidForceModelSnafu};
use crate::cosmic::Bodies;
use crate::dynamics::MAX_ZONAL_DEGREE;
use serde::{Deserialize, Serialize};
use snafu::ensure;
use std::fmt;

/// A force model descriptor, tagged by its `Model` name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Model")]
pub enum ForceModelConfig {
    /// Zonal harmonics of the Earth gravity field (EGM96), from J2 up to the degree
    #[serde(rename_all = "PascalCase")]
    Harmonics { degree: usize },
    /// Drag in an exponential atmosphere
    #[serde(rename_all = "PascalCase")]
    ExponentialDrag {
        /// Density at the reference altitude, in kg/m^3
        #[serde(default = "default_rho0")]
        rho0: f64,
        /// Reference altitude, in m
        #[serde(default = "default_h0", rename = "H0")]
        h0: f64,
        /// Scale height, in m
        #[serde(default = "default_hscale", rename = "HScale")]
        hscale: f64,
    },
    /// Drag in an atmosphere of constant density (kg/m^3)
    #[serde(rename_all = "PascalCase")]
    ConstantDrag { rho: f64 },
    /// Cannonball solar radiation pressure
    #[serde(rename_all = "PascalCase")]
    SolarPressure {
        #[serde(default = "default_shadow")]
        shadow: bool,
    },
    /// Point mass gravity of the Sun and/or the Moon
    #[serde(rename_all = "PascalCase")]
    ThirdBody { bodies: Vec<Bodies> },
}

fn default_rho0() -> f64 {
    3.614e-13
}

fn default_h0() -> f64 {
    700_000.0
}

fn default_hscale() -> f64 {
    88_667.0
}

fn default_shadow() -> bool {
    true
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    ensure!(
        value.is_finite() && value > 0.0,
        InvalidForceModelSnafu {
            reason: format!("{name} must be finite and strictly positive, got {value}"),
        }
    );
    Ok(())
}

impl ForceModelConfig {
    /// Checks the parameters of this descriptor
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Harmonics { degree } => ensure!(
                (2..=MAX_ZONAL_DEGREE).contains(degree),
                InvalidForceModelSnafu {
                    reason: format!(
                        "harmonics degree must be within 2 and {MAX_ZONAL_DEGREE}, got {degree}"
                    ),
                }
            ),
            Self::ExponentialDrag { rho0, h0, hscale } => {
                positive("Rho0", *rho0)?;
                positive("HScale", *hscale)?;
                ensure!(
                    h0.is_finite(),
                    InvalidForceModelSnafu {
                        reason: "H0 must be finite",
                    }
                );
            }
            Self::ConstantDrag { rho } => positive("Rho", *rho)?,
            Self::SolarPressure { .. } => {}
            Self::ThirdBody { bodies } => ensure!(
                !bodies.is_empty(),
                InvalidForceModelSnafu {
                    reason: "third body model without any body",
                }
            ),
        }
        Ok(())
    }
}

impl fmt::Display for ForceModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Harmonics { degree } => write!(f, "Harmonics (degree {degree})"),
            Self::ExponentialDrag { rho0, h0, hscale } => write!(
                f,
                "ExponentialDrag (rho0 = {rho0:e} kg/m^3, h0 = {h0} m, H = {hscale} m)"
            ),
            Self::ConstantDrag { rho } => write!(f, "ConstantDrag (rho = {rho:e} kg/m^3)"),
            Self::SolarPressure { shadow } => write!(f, "SolarPressure (shadow: {shadow})"),
            Self::ThirdBody { bodies } => write!(f, "ThirdBody ({bodies:?})"),
        }
    }
}
