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

use super::{AccelModel, Dynamics, DynamicsError, NonFiniteStateSnafu, SingularRadiusSnafu};
use crate::cosmic::{Bodies, Orbit, State};
use crate::linalg::{Const, OVector, Vector3, Vector6};
use snafu::ensure;
use std::fmt;
use std::sync::Arc;

pub use super::harmonics::Harmonics;

/// Below this radius (in meters), the two body acceleration is considered singular.
const MIN_RADIUS_M: f64 = 1.0;

/// `OrbitalDynamics` provides the equations of motion for any celestial dynamic, without state transition matrix computation.
#[derive(Clone, Debug)]
pub struct OrbitalDynamics {
    pub accel_models: Vec<Arc<dyn AccelModel + Sync>>,
}

impl OrbitalDynamics {
    /// Initialize point mass dynamics given the bodies
    pub fn point_masses(bodies: Vec<Bodies>) -> Self {
        Self::new(vec![PointMasses::new(bodies)])
    }

    /// Initializes a OrbitalDynamics which does not simulate the gravity pull of other celestial objects but the primary one.
    pub fn two_body() -> Self {
        Self::new(vec![])
    }

    /// Initialize orbital dynamics with a list of acceleration models
    pub fn new(accel_models: Vec<Arc<dyn AccelModel + Sync>>) -> Self {
        Self { accel_models }
    }

    /// Initialize new orbital mechanics with the provided model.
    /// **Note:** Orbital dynamics _always_ include two body dynamics, these cannot be turned off.
    pub fn from_model(accel_model: Arc<dyn AccelModel + Sync>) -> Self {
        Self::new(vec![accel_model])
    }

    /// Add a model to the currently defined orbital dynamics
    pub fn add_model(&mut self, accel_model: Arc<dyn AccelModel + Sync>) {
        self.accel_models.push(accel_model);
    }

    /// Computes the full acceleration (two body and models) of the provided osculating orbit, in m/s^2.
    pub(crate) fn accel(&self, osc: &Orbit) -> Result<Vector3<f64>, DynamicsError> {
        ensure!(
            osc.is_finite(),
            NonFiniteStateSnafu { epoch: osc.epoch }
        );
        let rmag = osc.rmag_m();
        ensure!(rmag > MIN_RADIUS_M, SingularRadiusSnafu { epoch: osc.epoch });

        let mut accel = (-osc.frame.mu_m3_s2 / rmag.powi(3)) * osc.radius();
        for model in &self.accel_models {
            accel += model.eom(osc)?;
        }
        Ok(accel)
    }
}

impl fmt::Display for OrbitalDynamics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let models: Vec<String> = self.accel_models.iter().map(|x| format!("{x}")).collect();
        write!(f, "Orbital dynamics: {}", models.join("; "))
    }
}

impl Dynamics for OrbitalDynamics {
    type StateType = Orbit;

    fn eom(
        &self,
        delta_t_s: f64,
        state: &OVector<f64, Const<6>>,
        ctx: &Orbit,
    ) -> Result<OVector<f64, Const<6>>, DynamicsError> {
        let osc = ctx.set_with_delta_seconds(delta_t_s, state);
        let accel = self.accel(&osc)?;
        Ok(Vector6::from_iterator(
            osc.velocity().iter().chain(accel.iter()).cloned(),
        ))
    }
}

/// PointMasses model: the gravity pull of third bodies on a spacecraft orbiting the Earth
#[derive(Clone, Debug)]
pub struct PointMasses {
    pub bodies: Vec<Bodies>,
}

impl PointMasses {
    /// Initializes the multibody point mass dynamics with the provided list of bodies
    pub fn new(bodies: Vec<Bodies>) -> Arc<Self> {
        Arc::new(Self { bodies })
    }
}

impl fmt::Display for PointMasses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bodies: Vec<String> = self.bodies.iter().map(|b| format!("{b}")).collect();
        write!(f, "Point masses of {}", bodies.join(", "))
    }
}

impl AccelModel for PointMasses {
    fn eom(&self, osc: &Orbit) -> Result<Vector3<f64>, DynamicsError> {
        let mut d_x = Vector3::zeros();
        for body in &self.bodies {
            // Third body as seen from the primary body
            let r_ij = body.position_m(osc.epoch);
            let r_ij3 = r_ij.norm().powi(3);
            // Spacecraft as seen from the third body
            let r_j = osc.radius() - r_ij;
            let r_j3 = r_j.norm().powi(3);
            d_x += -body.mu_m3_s2() * (r_j / r_j3 + r_ij / r_ij3);
        }
        Ok(d_x)
    }
}
