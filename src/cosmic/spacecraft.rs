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

use super::{Orbit, State};
use crate::linalg::{Const, OVector};
use crate::time::Epoch;
use crate::utils::rss_orbit_errors;
use std::fmt;

/// The Solar Radiation Pressure configuration for a spacecraft
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SrpConfig {
    /// solar radiation pressure area
    pub area_m2: f64,
    /// coefficient of reflectivity, must be between 0.0 (translucent) and 2.0 (all radiation absorbed and twice the force is transmitted back)
    pub cr: f64,
}

impl Default for SrpConfig {
    fn default() -> Self {
        Self {
            area_m2: 1.0,
            cr: 1.5,
        }
    }
}

/// The drag configuration for a spacecraft
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragConfig {
    /// atmospheric drag area
    pub area_m2: f64,
    /// drag coefficient
    pub cd: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            area_m2: 1.0,
            cd: 2.2,
        }
    }
}

/// A spacecraft state: its orbit, its mass (in kg), and its SRP and drag configurations.
///
/// The mass is constant throughout a propagation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spacecraft {
    pub orbit: Orbit,
    pub mass_kg: f64,
    pub srp: SrpConfig,
    pub drag: DragConfig,
}

impl Spacecraft {
    pub fn new(orbit: Orbit, mass_kg: f64, srp: SrpConfig, drag: DragConfig) -> Self {
        Self {
            orbit,
            mass_kg,
            srp,
            drag,
        }
    }

    /// Initialize a spacecraft with the default SRP and drag configurations
    pub fn from_orbit(orbit: Orbit, mass_kg: f64) -> Self {
        Self::new(orbit, mass_kg, SrpConfig::default(), DragConfig::default())
    }

    /// Returns a copy of this spacecraft with the provided SRP configuration
    pub fn with_srp(self, area_m2: f64, cr: f64) -> Self {
        Self {
            srp: SrpConfig { area_m2, cr },
            ..self
        }
    }

    /// Returns a copy of this spacecraft with the provided drag configuration
    pub fn with_drag(self, area_m2: f64, cd: f64) -> Self {
        Self {
            drag: DragConfig { area_m2, cd },
            ..self
        }
    }

    /// Returns the root sum square error between this spacecraft and the other, in meters for the position and meters per second for the velocity.
    pub fn rss(&self, other: &Self) -> (f64, f64) {
        rss_orbit_errors(&self.orbit, &other.orbit)
    }
}

impl State for Spacecraft {
    type VecLength = Const<6>;

    fn to_vector(&self) -> OVector<f64, Const<6>> {
        self.orbit.to_cartesian_vec()
    }

    fn set(&mut self, epoch: Epoch, vector: &OVector<f64, Const<6>>) {
        self.orbit.set(epoch, vector);
    }

    fn epoch(&self) -> Epoch {
        self.orbit.epoch
    }

    fn set_epoch(&mut self, epoch: Epoch) {
        self.orbit.epoch = epoch
    }
}

impl fmt::Display for Spacecraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mass_prec = f.precision().unwrap_or(3);
        write!(f, "mass = {:.*} kg\t{}", mass_prec, self.mass_kg, self.orbit)
    }
}
