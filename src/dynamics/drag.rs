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

use super::{DynamicsError, ForceModel};
use crate::cosmic::Spacecraft;
use crate::linalg::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Density models available for the drag computation
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AtmDensity {
    /// Constant density in kg/m^3
    Constant(f64),
    /// Exponential decay of the density from a reference altitude: `rho0 * exp(-(h - h0) / scale_height)`
    Exponential {
        rho0_kg_m3: f64,
        h0_m: f64,
        scale_height_m: f64,
    },
}

impl AtmDensity {
    /// Harris-Priester style defaults at 700 km, good for a mean solar activity
    pub const fn exponential_700km() -> Self {
        Self::Exponential {
            rho0_kg_m3: 3.614e-13,
            h0_m: 700_000.0,
            scale_height_m: 88_667.0,
        }
    }

    /// Density at the provided altitude above the equatorial radius, in kg/m^3
    pub fn density(&self, altitude_m: f64) -> f64 {
        match *self {
            Self::Constant(rho) => rho,
            Self::Exponential {
                rho0_kg_m3,
                h0_m,
                scale_height_m,
            } => rho0_kg_m3 * (-(altitude_m - h0_m) / scale_height_m).exp(),
        }
    }
}

/// `Drag` implements the cannonball drag model: the atmosphere co-rotates with the central body
/// of the frame, and the force opposes the velocity relative to it.
///
/// Uses the spacecraft drag area and coefficient.
#[derive(Clone, Debug)]
pub struct Drag {
    /// Density computation method
    pub density: AtmDensity,
}

impl Drag {
    /// Common exponential drag model for the Earth
    pub fn earth_exp() -> Arc<Self> {
        Self::new(AtmDensity::exponential_700km())
    }

    /// Drag with the provided density model
    pub fn new(density: AtmDensity) -> Arc<Self> {
        Arc::new(Self { density })
    }
}

impl fmt::Display for Drag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Drag ({:?})", self.density)
    }
}

impl ForceModel for Drag {
    fn eom(&self, ctx: &Spacecraft) -> Result<Vector3<f64>, DynamicsError> {
        let osc = &ctx.orbit;
        let rho = self.density.density(osc.altitude_m());

        let omega = Vector3::new(0.0, 0.0, osc.frame.angular_velocity_rad_s);
        let velocity = osc.velocity() - omega.cross(&osc.radius());
        Ok(-0.5 * rho * ctx.drag.cd * ctx.drag.area_m2 * velocity.norm() * velocity)
    }
}

#[cfg(test)]
mod ut_drag {
    use super::*;
    use crate::cosmic::{Orbit, EARTH_ANGULAR_VELOCITY, EME2000};
    use crate::time::Epoch;

    #[test]
    fn exponential_density() {
        let atm = AtmDensity::exponential_700km();
        assert!((atm.density(700_000.0) - 3.614e-13).abs() < 1e-25);
        assert!(atm.density(400_000.0) > atm.density(700_000.0));
        assert_eq!(AtmDensity::Constant(1e-12).density(1e9), 1e-12);
    }

    #[test]
    fn drag_opposes_relative_velocity() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2024, 1, 1);
        let orbit = Orbit::cartesian(6_778_137.0, 0.0, 0.0, 0.0, 7_668.6, 0.0, epoch, EME2000);
        let sc = Spacecraft::from_orbit(orbit, 100.0).with_drag(2.0, 2.2);
        let force = Drag::earth_exp().eom(&sc).unwrap();
        assert!(force[1] < 0.0);
        assert!(force[0].abs() < 1e-20 && force[2].abs() < 1e-20);

        // Same expression, by hand, with the co-rotating atmosphere
        let v_rel = 7_668.6 - EARTH_ANGULAR_VELOCITY * 6_778_137.0;
        let rho = AtmDensity::exponential_700km().density(400_000.0);
        let expected = -0.5 * rho * 2.2 * 2.0 * v_rel * v_rel;
        assert!((force[1] - expected).abs() < 1e-9 * expected.abs());
    }
}
