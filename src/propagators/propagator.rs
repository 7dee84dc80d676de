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

use super::error_ctrl::{ErrorCtrl, ScaledRms};
use super::{
    Dormand45, Fehlberg45, Fehlberg78, IntegrationDetails, IntegratorMethod, IntegratorOptions,
    PropInstance, Verner56, RK,
};
use crate::cosmic::State;
use crate::dynamics::Dynamics;
use crate::linalg::allocator::Allocator;
use crate::linalg::{DefaultAllocator, OVector};

/// A Propagator allows propagating a set of dynamics forward or backward in time.
/// It includes the options and the set of coefficients used for the monomorphic instance.
#[derive(Clone, Debug)]
pub struct Propagator<D: Dynamics, E: ErrorCtrl = ScaledRms>
where
    DefaultAllocator: Allocator<<D::StateType as State>::VecLength>,
{
    pub dynamics: D, // Stores the dynamics used. *Must* use this to get the latest values
    pub opts: IntegratorOptions<E>, // Stores the integration options (tolerances, min/max step, init step, etc.)
    pub(crate) order: u8,           // Order of the integrator
    pub(crate) stages: usize, // Number of stages, i.e. how many times the derivatives will be called
    pub(crate) a_coeffs: &'static [f64],
    pub(crate) b_coeffs: &'static [f64],
}

impl<D: Dynamics, E: ErrorCtrl> Propagator<D, E>
where
    DefaultAllocator: Allocator<<D::StateType as State>::VecLength>,
{
    /// Each propagator must be initialized with `new` which stores propagator information.
    pub fn new<T: RK>(dynamics: D, opts: IntegratorOptions<E>) -> Self {
        Self {
            dynamics,
            opts,
            stages: T::STAGES,
            order: T::ORDER,
            a_coeffs: T::A_COEFFS,
            b_coeffs: T::B_COEFFS,
        }
    }

    /// Initializes a propagator with the integrator selected at runtime.
    pub fn from_method(method: IntegratorMethod, dynamics: D, opts: IntegratorOptions<E>) -> Self {
        match method {
            IntegratorMethod::DormandPrince45 => Self::new::<Dormand45>(dynamics, opts),
            IntegratorMethod::Fehlberg45 => Self::new::<Fehlberg45>(dynamics, opts),
            IntegratorMethod::Verner56 => Self::new::<Verner56>(dynamics, opts),
            IntegratorMethod::Fehlberg78 => Self::new::<Fehlberg78>(dynamics, opts),
        }
    }

    /// A Dormand Prince 5-4 propagator with custom propagator options.
    pub fn dp45(dynamics: D, opts: IntegratorOptions<E>) -> Self {
        Self::new::<Dormand45>(dynamics, opts)
    }

    pub fn with(&self, state: D::StateType) -> PropInstance<'_, D, E> {
        // Pre-allocate the k used in the propagator
        let mut k = Vec::with_capacity(self.stages);
        for _ in 0..self.stages {
            k.push(OVector::<f64, <D::StateType as State>::VecLength>::zeros());
        }
        PropInstance {
            state,
            prop: self,
            details: IntegrationDetails {
                step: self.opts.init_step,
                error: 0.0,
                attempts: 1,
            },
            step_size: self.opts.init_step.abs(),
            k,
            candidate: None,
        }
    }
}

impl<D: Dynamics> Propagator<D, ScaledRms>
where
    DefaultAllocator: Allocator<<D::StateType as State>::VecLength>,
{
    /// Default propagator is a Dormand Prince 5-4 with the default options.
    pub fn default(dynamics: D) -> Self {
        Self::new::<Dormand45>(dynamics, IntegratorOptions::default())
    }
}
