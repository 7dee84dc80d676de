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

use super::{MOON_MU, SUN_MU};
use crate::linalg::Vector3;
use crate::time::Epoch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Obliquity of the ecliptic at J2000, in degrees
const OBLIQUITY_J2000_DEG: f64 = 23.439_291_11;
const ARCSEC_TO_DEG: f64 = 1.0 / 3_600.0;
const SECONDS_PER_CENTURY: f64 = 36_525.0 * 86_400.0;

/// The third bodies whose gravity and light may perturb an Earth orbiter.
///
/// Positions come from the low precision series of Montenbruck & Gill (Satellite Orbits, 3.3.2),
/// good to roughly 0.1 to 1 percent, which is ample for perturbation modeling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bodies {
    Sun,
    Moon,
}

impl Bodies {
    /// Gravitational parameter of this body, in m^3/s^2
    pub fn mu_m3_s2(&self) -> f64 {
        match self {
            Self::Sun => SUN_MU,
            Self::Moon => MOON_MU,
        }
    }

    /// Geocentric position of this body in EME2000 at the provided epoch, in meters
    pub fn position_m(&self, epoch: Epoch) -> Vector3<f64> {
        let t = epoch.to_et_seconds() / SECONDS_PER_CENTURY;
        match self {
            Self::Sun => sun_position_m(t),
            Self::Moon => moon_position_m(t),
        }
    }
}

impl fmt::Display for Bodies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Rotates an ecliptic position into the equatorial frame
fn ecliptic_to_equatorial(lon_rad: f64, lat_rad: f64, dist_m: f64) -> Vector3<f64> {
    let eps = OBLIQUITY_J2000_DEG.to_radians();
    let x = dist_m * lat_rad.cos() * lon_rad.cos();
    let y = dist_m * lat_rad.cos() * lon_rad.sin();
    let z = dist_m * lat_rad.sin();
    Vector3::new(x, y * eps.cos() - z * eps.sin(), y * eps.sin() + z * eps.cos())
}

/// `t` is in Julian centuries past J2000
fn sun_position_m(t: f64) -> Vector3<f64> {
    let m = (357.525_6 + 35_999.049 * t).to_radians();
    let lon_deg = 282.940_0
        + m.to_degrees()
        + (6_892.0 * m.sin() + 72.0 * (2.0 * m).sin()) * ARCSEC_TO_DEG;
    let dist_m = (149.619 - 2.499 * m.cos() - 0.021 * (2.0 * m).cos()) * 1e9;
    ecliptic_to_equatorial(lon_deg.to_radians(), 0.0, dist_m)
}

/// `t` is in Julian centuries past J2000
fn moon_position_m(t: f64) -> Vector3<f64> {
    // Mean longitude, referred to the equinox of J2000
    let l0 = 218.316_17 + 481_267.880_88 * t - 1.397_2 * t;
    // Mean anomalies of the Moon and the Sun
    let l = (134.962_92 + 477_198.867_53 * t).to_radians();
    let lp = (357.525_43 + 35_999.049_44 * t).to_radians();
    // Mean distance of the Moon from its ascending node
    let f = (93.272_83 + 483_202.018_73 * t).to_radians();
    // Difference between the mean longitudes of the Moon and the Sun
    let d = (297.850_27 + 445_267.111_35 * t).to_radians();

    let lon_deg = l0
        + (22_640.0 * l.sin() + 769.0 * (2.0 * l).sin() - 4_586.0 * (l - 2.0 * d).sin()
            + 2_370.0 * (2.0 * d).sin()
            - 668.0 * lp.sin()
            - 412.0 * (2.0 * f).sin()
            - 212.0 * (2.0 * l - 2.0 * d).sin()
            - 206.0 * (l + lp - 2.0 * d).sin()
            + 192.0 * (l + 2.0 * d).sin()
            - 165.0 * (lp - 2.0 * d).sin()
            + 148.0 * (l - lp).sin()
            - 125.0 * d.sin()
            - 110.0 * (l + lp).sin()
            - 55.0 * (2.0 * f - 2.0 * d).sin())
            * ARCSEC_TO_DEG;

    let lat_arg = f + (lon_deg - l0).to_radians()
        + ((412.0 * (2.0 * f).sin() + 541.0 * lp.sin()) * ARCSEC_TO_DEG).to_radians();
    let lat_deg = (18_520.0 * lat_arg.sin() - 526.0 * (f - 2.0 * d).sin()
        + 44.0 * (l + f - 2.0 * d).sin()
        - 31.0 * (-l + f - 2.0 * d).sin()
        - 25.0 * (-2.0 * l + f).sin()
        - 23.0 * (lp + f - 2.0 * d).sin()
        + 21.0 * (-l + f).sin()
        + 11.0 * (-lp + f - 2.0 * d).sin())
        * ARCSEC_TO_DEG;

    let dist_km = 385_000.0
        - 20_905.0 * l.cos()
        - 3_699.0 * (2.0 * d - l).cos()
        - 2_956.0 * (2.0 * d).cos()
        - 570.0 * (2.0 * l).cos()
        + 246.0 * (2.0 * l - 2.0 * d).cos()
        - 205.0 * (lp - 2.0 * d).cos()
        - 171.0 * (l + 2.0 * d).cos()
        - 152.0 * (l + lp - 2.0 * d).cos();

    ecliptic_to_equatorial(lon_deg.to_radians(), lat_deg.to_radians(), dist_km * 1e3)
}
