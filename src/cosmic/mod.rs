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

use crate::linalg::allocator::Allocator;
use crate::linalg::{DefaultAllocator, DimName, OVector};
use crate::time::{Epoch, Unit};
use std::fmt;

mod frames;
pub use self::frames::*;

mod orbit;
pub use self::orbit::*;

mod spacecraft;
pub use self::spacecraft::*;

/// Low precision analytical ephemerides of the Sun and the Moon.
pub mod bodies;
pub use self::bodies::Bodies;

/// A trait for the states which can be propagated.
///
/// The vector length is the number of components handed to the integrator.
pub trait State: Copy + PartialEq + fmt::Debug + fmt::Display + Send + Sync
where
    Self: Sized,
    DefaultAllocator: Allocator<Self::VecLength>,
{
    type VecLength: DimName;

    /// Return this state as a vector for the propagation
    fn to_vector(&self) -> OVector<f64, Self::VecLength>;

    /// Set this state from the provided epoch and propagation vector
    fn set(&mut self, epoch: Epoch, vector: &OVector<f64, Self::VecLength>);

    /// Reconstruct a new State from the provided delta time in seconds compared to the current state
    /// and with the provided vector.
    fn set_with_delta_seconds(mut self, delta_t_s: f64, vector: &OVector<f64, Self::VecLength>) -> Self {
        self.set(self.epoch() + delta_t_s * Unit::Second, vector);
        self
    }

    /// Retrieve the Epoch
    fn epoch(&self) -> Epoch;

    /// Set the Epoch
    fn set_epoch(&mut self, epoch: Epoch);

    /// Returns true if every component of the propagation vector is finite
    fn is_finite(&self) -> bool {
        self.to_vector().iter().all(|x| x.is_finite())
    }
}

/// Speed of light in meters per second
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Astronomical unit, in meters, according to the [IAU](https://www.iau.org/public/themes/measuring/).
pub const AU: f64 = 149_597_870_700.0;

/// Earth gravitational parameter of the EGM96 model, in m^3/s^2
pub const EGM96_EARTH_MU: f64 = 3.986_004_415e14;

/// Earth equatorial radius of the WGS84 ellipsoid, in meters
pub const WGS84_EARTH_EQUATORIAL_RADIUS: f64 = 6_378_137.0;

/// Earth mean angular velocity, in rad/s
pub const EARTH_ANGULAR_VELOCITY: f64 = 7.292_115e-5;

/// Sun gravitational parameter (DE430), in m^3/s^2
pub const SUN_MU: f64 = 1.327_124_400_18e20;

/// Moon gravitational parameter (DE430), in m^3/s^2
pub const MOON_MU: f64 = 4.902_800_066e12;

/// Solar flux at 1 AU, in W/m^2
pub const SOLAR_FLUX: f64 = 1_367.0;
