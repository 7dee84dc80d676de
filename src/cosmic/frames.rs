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

use super::{EARTH_ANGULAR_VELOCITY, EGM96_EARTH_MU, WGS84_EARTH_EQUATORIAL_RADIUS};
use std::fmt;

/// An inertial frame centered on a celestial body, along with the physical constants of that body
/// which the dynamics need.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    pub name: &'static str,
    /// Gravitational parameter of the central body, in m^3/s^2
    pub mu_m3_s2: f64,
    /// Equatorial radius of the central body, in meters
    pub equatorial_radius_m: f64,
    /// Rotation rate of the central body about the Z axis of this frame, in rad/s
    pub angular_velocity_rad_s: f64,
}

/// Earth Mean Equator and Equinox of J2000, with the EGM96 gravitational parameter.
pub const EME2000: Frame = Frame {
    name: "EME2000",
    mu_m3_s2: EGM96_EARTH_MU,
    equatorial_radius_m: WGS84_EARTH_EQUATORIAL_RADIUS,
    angular_velocity_rad_s: EARTH_ANGULAR_VELOCITY,
};

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
