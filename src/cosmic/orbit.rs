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

use super::{Frame, State};
use crate::linalg::{Const, OVector, Vector3, Vector6};
use crate::time::{Duration, Epoch, Unit};
use std::f64::consts::PI;
use std::fmt;

/// A Cartesian orbit state (position and velocity) at a given epoch, expressed in an inertial frame.
///
/// All quantities are in SI units: meters and meters per second.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orbit {
    pub x_m: f64,
    pub y_m: f64,
    pub z_m: f64,
    pub vx_m_s: f64,
    pub vy_m_s: f64,
    pub vz_m_s: f64,
    pub epoch: Epoch,
    pub frame: Frame,
}

impl Orbit {
    /// Creates a new Orbit from the provided Cartesian position (m) and velocity (m/s) components.
    #[allow(clippy::too_many_arguments)]
    pub fn cartesian(
        x_m: f64,
        y_m: f64,
        z_m: f64,
        vx_m_s: f64,
        vy_m_s: f64,
        vz_m_s: f64,
        epoch: Epoch,
        frame: Frame,
    ) -> Self {
        Self {
            x_m,
            y_m,
            z_m,
            vx_m_s,
            vy_m_s,
            vz_m_s,
            epoch,
            frame,
        }
    }

    /// Returns the position vector in meters
    pub fn radius(&self) -> Vector3<f64> {
        Vector3::new(self.x_m, self.y_m, self.z_m)
    }

    /// Returns the velocity vector in meters per second
    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.vx_m_s, self.vy_m_s, self.vz_m_s)
    }

    /// Returns this state as a Cartesian Vector6 in [m, m, m, m/s, m/s, m/s]
    pub fn to_cartesian_vec(&self) -> Vector6<f64> {
        Vector6::new(
            self.x_m,
            self.y_m,
            self.z_m,
            self.vx_m_s,
            self.vy_m_s,
            self.vz_m_s,
        )
    }

    /// Returns the magnitude of the radius vector in meters
    pub fn rmag_m(&self) -> f64 {
        self.radius().norm()
    }

    /// Returns the magnitude of the velocity vector in m/s
    pub fn vmag_m_s(&self) -> f64 {
        self.velocity().norm()
    }

    /// Returns the altitude above the equatorial radius of the central body, in meters
    pub fn altitude_m(&self) -> f64 {
        self.rmag_m() - self.frame.equatorial_radius_m
    }

    /// Returns the specific mechanical energy in m^2/s^2
    pub fn energy_m2_s2(&self) -> f64 {
        self.vmag_m_s().powi(2) / 2.0 - self.frame.mu_m3_s2 / self.rmag_m()
    }

    /// Returns the semi-major axis in meters
    pub fn sma_m(&self) -> f64 {
        -self.frame.mu_m3_s2 / (2.0 * self.energy_m2_s2())
    }

    /// Returns the period of this (closed) orbit
    pub fn period(&self) -> Duration {
        2.0 * PI * (self.sma_m().powi(3) / self.frame.mu_m3_s2).sqrt() * Unit::Second
    }
}

impl State for Orbit {
    type VecLength = Const<6>;

    fn to_vector(&self) -> OVector<f64, Const<6>> {
        self.to_cartesian_vec()
    }

    fn set(&mut self, epoch: Epoch, vector: &OVector<f64, Const<6>>) {
        self.epoch = epoch;
        self.x_m = vector[0];
        self.y_m = vector[1];
        self.z_m = vector[2];
        self.vx_m_s = vector[3];
        self.vy_m_s = vector[4];
        self.vz_m_s = vector[5];
    }

    fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn set_epoch(&mut self, epoch: Epoch) {
        self.epoch = epoch
    }
}

impl fmt::Display for Orbit {
    // Prints as Cartesian in floating point with units
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let decimals = f.precision().unwrap_or(3);
        write!(
            f,
            "[{}] {}\tposition = [{:.*}, {:.*}, {:.*}] m\tvelocity = [{:.*}, {:.*}, {:.*}] m/s",
            self.frame,
            self.epoch,
            decimals,
            self.x_m,
            decimals,
            self.y_m,
            decimals,
            self.z_m,
            decimals,
            self.vx_m_s,
            decimals,
            self.vy_m_s,
            decimals,
            self.vz_m_s
        )
    }
}
