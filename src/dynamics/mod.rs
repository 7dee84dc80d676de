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

use crate::cosmic::{Orbit, Spacecraft, State};
use crate::linalg::allocator::Allocator;
use crate::linalg::{DefaultAllocator, OVector, Vector3};
use crate::time::Epoch;
use snafu::Snafu;
use std::fmt;

/// Cartesian-based orbital dynamics: two body gravity and additive acceleration models.
pub mod orbital;
pub use self::orbital::*;

/// Spacecraft dynamics, i.e. orbital dynamics plus force models which depend on the spacecraft properties.
pub mod spacecraft;
pub use self::spacecraft::*;

/// Solar radiation pressure models.
pub mod solarpressure;
pub use self::solarpressure::*;

/// Atmospheric drag models.
pub mod drag;
pub use self::drag::*;

/// Zonal harmonic gravity models.
pub mod harmonics;
pub use self::harmonics::*;

/// A trait for models with equations of motion that can be integrated.
///
/// This trait is designed for composition, allowing different dynamics to be combined.
pub trait Dynamics: Clone + Sync + Send
where
    DefaultAllocator: Allocator<<Self::StateType as State>::VecLength>,
{
    type StateType: State;

    /// Defines the equations of motion.
    ///
    /// - `delta_t`: Time in seconds past the context epoch.
    /// - `state_vec`: The state vector, which changes at each integration stage.
    /// - `state_ctx`: The state context, used to rebuild the state from the state vector.
    fn eom(
        &self,
        delta_t: f64,
        state_vec: &OVector<f64, <Self::StateType as State>::VecLength>,
        state_ctx: &Self::StateType,
    ) -> Result<OVector<f64, <Self::StateType as State>::VecLength>, DynamicsError>;

    /// Performs final changes after each successful integration step.
    ///
    /// Also called before the first integration step to update the initial state if needed.
    fn finally(&self, next_state: Self::StateType) -> Result<Self::StateType, DynamicsError> {
        Ok(next_state)
    }
}

/// A trait for immutable dynamics that return a force (e.g., solar radiation pressure, drag), in Newtons.
///
/// The force is divided by the spacecraft's mass to compute acceleration (F=ma).
pub trait ForceModel: Send + Sync + fmt::Display + fmt::Debug {
    /// Defines the equations of motion for this force model.
    fn eom(&self, ctx: &Spacecraft) -> Result<Vector3<f64>, DynamicsError>;
}

/// A trait for immutable dynamics that return an acceleration in m/s^2 (e.g., zonal harmonics, third bodies).
pub trait AccelModel: Send + Sync + fmt::Display + fmt::Debug {
    /// Defines the equations of motion for this acceleration model.
    fn eom(&self, osc: &Orbit) -> Result<Vector3<f64>, DynamicsError>;
}

/// Dynamical model errors.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DynamicsError {
    /// The state handed to the equations of motion is not finite.
    #[snafu(display("non finite state at {epoch}"))]
    NonFiniteState { epoch: Epoch },
    /// The spacecraft is at (or numerically at) the center of the central body.
    #[snafu(display("singular radius at {epoch}: the spacecraft is at the origin of the frame"))]
    SingularRadius { epoch: Epoch },
}
