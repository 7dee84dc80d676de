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

use super::{Dynamics, DynamicsError, ForceModel, OrbitalDynamics};
use crate::cosmic::{Spacecraft, State};
use crate::linalg::{Const, OVector, Vector6};
use std::fmt;
use std::sync::Arc;

/// A generic spacecraft dynamics: orbital dynamics and force models scaled by the (constant) spacecraft mass.
#[derive(Clone, Debug)]
pub struct SpacecraftDynamics {
    pub orbital_dyn: OrbitalDynamics,
    pub force_models: Vec<Arc<dyn ForceModel>>,
}

impl SpacecraftDynamics {
    /// Initialize a Spacecraft with a set of orbital dynamics and no force models.
    pub fn new(orbital_dyn: OrbitalDynamics) -> Self {
        Self {
            orbital_dyn,
            force_models: Vec::new(),
        }
    }

    /// Initialize a Spacecraft with a set of orbital dynamics and a single force model.
    pub fn from_model(orbital_dyn: OrbitalDynamics, force_model: Arc<dyn ForceModel>) -> Self {
        Self::from_models(orbital_dyn, vec![force_model])
    }

    /// Initialize a Spacecraft with a set of orbital dynamics and the provided force models, applied in order.
    pub fn from_models(orbital_dyn: OrbitalDynamics, force_models: Vec<Arc<dyn ForceModel>>) -> Self {
        Self {
            orbital_dyn,
            force_models,
        }
    }

    /// Add a model to the currently defined spacecraft dynamics
    pub fn add_model(&mut self, force_model: Arc<dyn ForceModel>) {
        self.force_models.push(force_model);
    }
}

impl fmt::Display for SpacecraftDynamics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let force_models: Vec<String> = self.force_models.iter().map(|x| format!("{x}")).collect();
        write!(
            f,
            "Spacecraft dynamics (force models: {})\t{}",
            force_models.join("; "),
            self.orbital_dyn
        )
    }
}

impl Dynamics for SpacecraftDynamics {
    type StateType = Spacecraft;

    fn eom(
        &self,
        delta_t_s: f64,
        state: &OVector<f64, Const<6>>,
        ctx: &Spacecraft,
    ) -> Result<OVector<f64, Const<6>>, DynamicsError> {
        let osc_sc = ctx.set_with_delta_seconds(delta_t_s, state);

        let mut accel = self.orbital_dyn.accel(&osc_sc.orbit)?;
        for model in &self.force_models {
            accel += model.eom(&osc_sc)? / osc_sc.mass_kg;
        }

        Ok(Vector6::from_iterator(
            osc_sc.orbit.velocity().iter().chain(accel.iter()).cloned(),
        ))
    }
}
