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
use crate::cosmic::{Bodies, Spacecraft, AU, SOLAR_FLUX, SPEED_OF_LIGHT};
use crate::linalg::Vector3;
use std::fmt;
use std::sync::Arc;

/// Computation of solar radiation pressure is based on STK: http://help.agi.com/stk/index.htm#gator/eq-solar.htm .
///
/// The spacecraft is modeled as a sphere (cannonball) using its SRP area and reflectivity coefficient.
#[derive(Clone, Debug)]
pub struct SolarPressure {
    /// solar flux at 1 AU, in W/m^2
    pub phi: f64,
    /// set to false to ignore the eclipses by the central body
    pub shadow: bool,
}

impl SolarPressure {
    /// Solar radiation pressure with the cylindrical shadow of the Earth
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Solar radiation pressure which never turns off, even behind the Earth
    pub fn no_shadow() -> Arc<Self> {
        Arc::new(Self {
            shadow: false,
            ..Self::default()
        })
    }

    /// Returns 0.0 when the spacecraft is in the cylindrical shadow of the central body, 1.0 otherwise
    pub fn visibility(sc_m: &Vector3<f64>, sun_m: &Vector3<f64>, body_radius_m: f64) -> f64 {
        let sun_hat = sun_m.normalize();
        let proj = sc_m.dot(&sun_hat);
        if proj >= 0.0 || (sc_m - proj * sun_hat).norm() > body_radius_m {
            1.0
        } else {
            0.0
        }
    }
}

impl Default for SolarPressure {
    fn default() -> Self {
        Self {
            phi: SOLAR_FLUX,
            shadow: true,
        }
    }
}

impl fmt::Display for SolarPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SRP with φ = {} W/m^2 and {}",
            self.phi,
            if self.shadow {
                "cylindrical shadow"
            } else {
                "no shadow"
            }
        )
    }
}

impl ForceModel for SolarPressure {
    fn eom(&self, ctx: &Spacecraft) -> Result<Vector3<f64>, DynamicsError> {
        let osc = &ctx.orbit;
        let sun_m = Bodies::Sun.position_m(osc.epoch);

        let k = if self.shadow {
            Self::visibility(&osc.radius(), &sun_m, osc.frame.equatorial_radius_m)
        } else {
            1.0
        };
        if k == 0.0 {
            return Ok(Vector3::zeros());
        }

        // Sun to spacecraft
        let r_sun_sc = osc.radius() - sun_m;
        let r_sun_d = r_sun_sc.norm();
        let r_sun_unit = r_sun_sc / r_sun_d;

        // in N/m^2
        let flux_pressure = (k * self.phi / SPEED_OF_LIGHT) * (AU / r_sun_d).powi(2);

        Ok(ctx.srp.cr * ctx.srp.area_m2 * flux_pressure * r_sun_unit)
    }
}
