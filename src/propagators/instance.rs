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

use super::error_ctrl::ErrorCtrl;
use super::{
    DynamicsSnafu, IntegrationDetails, MaxAttemptsSnafu, NonFiniteStateSnafu, PropagationError,
    Propagator, StepSizeUnderflowSnafu,
};
use crate::cosmic::State;
use crate::dynamics::Dynamics;
use crate::linalg::allocator::Allocator;
use crate::linalg::{DefaultAllocator, OVector};
use crate::time::{Duration, Epoch, Unit};
use snafu::{ensure, ResultExt};
use std::time::Instant;

/// Largest growth of the step size after an accepted step
const MAX_GROWTH: f64 = 5.0;
/// Largest reduction of the step size after a rejected step
const MIN_SHRINK: f64 = 0.1;
const SAFETY: f64 = 0.9;

/// A propagator instance: the state of one object bound to its propagator setup.
///
/// Besides the classical `for_duration` and `until_epoch`, a step may be split in two phases:
/// [`PropInstance::propose_step`] computes an adaptive trial step and keeps its result as a candidate,
/// and [`PropInstance::commit_step`] advances the state by a step which may be shorter than the proposal.
/// This allows several instances to share one step schedule.
#[derive(Debug)]
pub struct PropInstance<'a, D: Dynamics, E: ErrorCtrl>
where
    DefaultAllocator: Allocator<<D::StateType as State>::VecLength>,
{
    /// The state of this propagator instance
    pub state: D::StateType,
    /// The propagator setup (kind, stages, etc.)
    pub prop: &'a Propagator<D, E>,
    /// Stores the details of the previous integration step
    pub details: IntegrationDetails,
    pub(crate) step_size: Duration, // Magnitude of the adapted step for the _next_ call
    // Allows us to do pre-allocation of the ki vectors
    pub(crate) k: Vec<OVector<f64, <D::StateType as State>::VecLength>>,
    // Last proposed step and the state vector it leads to
    pub(crate) candidate: Option<(Duration, OVector<f64, <D::StateType as State>::VecLength>)>,
}

impl<'a, D: Dynamics, E: ErrorCtrl> PropInstance<'a, D, E>
where
    DefaultAllocator: Allocator<<D::StateType as State>::VecLength>,
{
    /// Allows setting the magnitude of the next step of the propagator
    pub fn set_step(&mut self, step_size: Duration) {
        self.step_size = step_size.abs();
    }

    /// Magnitude of the step which will be attempted next
    pub fn next_step(&self) -> Duration {
        self.step_size
    }

    /// This method propagates the provided Dynamics for the provided duration.
    pub fn for_duration(&mut self, duration: Duration) -> Result<D::StateType, PropagationError> {
        if duration == Duration::ZERO {
            return Ok(self.state);
        }
        let stop_time = self.state.epoch() + duration;
        let tick = Instant::now();

        debug!("Propagating for {} until {}", duration, stop_time);
        // Call `finally` on the current state to set anything up
        self.state = self
            .prop
            .dynamics
            .finally(self.state)
            .context(DynamicsSnafu)?;

        loop {
            let remaining = stop_time - self.state.epoch();
            if remaining == Duration::ZERO {
                let tock: Duration = tick.elapsed().into();
                debug!("Done in {}", tock);
                return Ok(self.state);
            }
            let step = self.propose_step(remaining)?;
            // A step below the time resolution would never reach the stop time
            ensure!(
                step != Duration::ZERO,
                StepSizeUnderflowSnafu {
                    epoch: self.state.epoch(),
                    step,
                    error: self.details.error,
                }
            );
            self.commit_step(step)?;
        }
    }

    /// Propagates the provided Dynamics until the provided epoch. Returns the end state.
    pub fn until_epoch(&mut self, end_time: Epoch) -> Result<D::StateType, PropagationError> {
        let duration: Duration = end_time - self.state.epoch();
        self.for_duration(duration)
    }

    /// Computes an adaptive step toward the end of the `remaining` duration (whose sign sets the
    /// direction) without changing the state. The step is never longer than `remaining`.
    ///
    /// Returns the signed step which was accepted by the error control. Its result is kept until the next
    /// call to [`PropInstance::commit_step`].
    pub fn propose_step(&mut self, remaining: Duration) -> Result<Duration, PropagationError> {
        self.candidate = None;
        if remaining == Duration::ZERO {
            return Ok(Duration::ZERO);
        }

        let prev_step_size = self.step_size;
        let clamped = remaining.abs() < prev_step_size;
        let trial = if clamped {
            remaining
        } else if remaining.is_negative() {
            -prev_step_size
        } else {
            prev_step_size
        };

        let (step, state_vec) = self.derive(trial, true)?;
        if clamped && self.details.attempts == 1 {
            // The window was closing: the error says nothing about the step we would have taken
            self.step_size = prev_step_size;
        }
        self.candidate = Some((step, state_vec));
        Ok(step)
    }

    /// Advances the state by the provided signed step.
    ///
    /// If this step is the one returned by the latest proposal, its result is reused. Otherwise, a single
    /// step of exactly this length is taken without any error control: the step must then be shorter
    /// than the proposed one for the tolerances to hold.
    pub fn commit_step(&mut self, step: Duration) -> Result<D::StateType, PropagationError> {
        if step == Duration::ZERO {
            self.candidate = None;
            return Ok(self.state);
        }

        let state_vec = match self.candidate.take() {
            Some((proposed, state_vec)) if proposed == step => state_vec,
            _ => self.derive(step, false)?.1,
        };

        let epoch = self.state.epoch() + step;
        self.state.set(epoch, &state_vec);
        ensure!(self.state.is_finite(), NonFiniteStateSnafu { epoch });
        self.state = self
            .prop
            .dynamics
            .finally(self.state)
            .context(DynamicsSnafu)?;

        Ok(self.state)
    }

    /// Take a single adaptive propagator step in the provided direction
    pub fn single_step(&mut self, backward: bool) -> Result<D::StateType, PropagationError> {
        let step = if backward {
            -self.step_size
        } else {
            self.step_size
        };
        let step = self.propose_step(step)?;
        self.commit_step(step)
    }

    /// This method integrates whichever function is provided as `d_xdt`. Everything passed to this function is in **seconds**.
    ///
    /// This function returns the signed step used (as a Duration) and the new state as y_{n+1} = y_n + \frac{dy_n}{dt}.
    /// When `adaptive` is set, the step is shrunk until the error estimate is within the tolerances, and the
    /// magnitude of the next step is adapted. To get the integration details, check `self.latest_details`.
    fn derive(
        &mut self,
        step: Duration,
        adaptive: bool,
    ) -> Result<(Duration, OVector<f64, <D::StateType as State>::VecLength>), PropagationError>
    {
        let state_vec = &self.state.to_vector();
        let state_ctx = &self.state;
        let opts = &self.prop.opts;
        let min_step = opts.min_step.to_seconds();
        let max_step = opts.max_step.to_seconds();
        // Reset the number of attempts used (we don't reset the error because it's set before it's read)
        self.details.attempts = 1;
        // The duration is kept as is until the step must be shrunk, so that windows are closed exactly
        let mut step_dur = step;
        let mut step_size = step.to_seconds();
        // A requested step below the minimum only closes a window
        let below_min = step_size.abs() < min_step;

        loop {
            let ki = self
                .prop
                .dynamics
                .eom(0.0, state_vec, state_ctx)
                .context(DynamicsSnafu)?;
            self.k[0] = ki;
            let mut a_idx: usize = 0;
            for i in 0..(self.prop.stages - 1) {
                // Let's compute the c_i by summing the relevant items from the list of coefficients.
                // \sum_{j=1}^{i-1} a_ij  ∀ i ∈ [2, s]
                let mut ci: f64 = 0.0;
                // The wi stores the a_{s1} * k_1 + a_{s2} * k_2 + ... + a_{s, s-1} * k_{s-1} +
                let mut wi = OVector::<f64, <D::StateType as State>::VecLength>::zeros();
                for kj in &self.k[0..i + 1] {
                    let a_ij = self.prop.a_coeffs[a_idx];
                    ci += a_ij;
                    wi += a_ij * kj;
                    a_idx += 1;
                }

                let ki = self
                    .prop
                    .dynamics
                    .eom(ci * step_size, &(state_vec + step_size * wi), state_ctx)
                    .context(DynamicsSnafu)?;
                self.k[i + 1] = ki;
            }
            // Compute the next state and the error
            let mut next_state = state_vec.clone();
            // State error estimation from https://en.wikipedia.org/wiki/Runge%E2%80%93Kutta_methods#Adaptive_Runge%E2%80%93Kutta_methods
            let mut error_est = OVector::<f64, <D::StateType as State>::VecLength>::zeros();
            for (i, ki) in self.k.iter().enumerate() {
                let b_i = self.prop.b_coeffs[i];
                if adaptive {
                    let b_i_star = self.prop.b_coeffs[i + self.prop.stages];
                    error_est += step_size * (b_i - b_i_star) * ki;
                }
                next_state += step_size * b_i * ki;
            }

            self.details.step = step_dur;
            if !adaptive {
                self.details.error = 0.0;
                return Ok((step_dur, next_state));
            }

            let error = E::estimate(&error_est, &next_state, state_vec, opts.abs_tol, opts.rel_tol);
            self.details.error = error;
            let h = step_size.abs();

            if error <= 1.0 {
                // Error is less than tolerance, let's attempt to increase the step for the next iteration.
                let growth = if error > 0.0 {
                    (SAFETY * error.powf(-1.0 / f64::from(self.prop.order))).min(MAX_GROWTH)
                } else {
                    MAX_GROWTH
                };
                self.step_size = ((h * growth).min(max_step).max(min_step)) * Unit::Second;
                return Ok((step_dur, next_state));
            }

            if below_min {
                warn!(
                    "accepting a step of {} below the minimum step with an error of {:.3e}",
                    step_dur, error
                );
                return Ok((step_dur, next_state));
            }

            ensure!(
                h > min_step,
                StepSizeUnderflowSnafu {
                    epoch: state_ctx.epoch(),
                    step: step_dur,
                    error,
                }
            );

            ensure!(
                self.details.attempts < opts.attempts,
                MaxAttemptsSnafu {
                    epoch: state_ctx.epoch(),
                    attempts: self.details.attempts,
                }
            );

            // Error is too high and we aren't using the smallest step, and we haven't hit the max number of attempts.
            // So let's adapt the step size.
            self.details.attempts += 1;
            let shrink = if error.is_finite() {
                (SAFETY * error.powf(-1.0 / f64::from(self.prop.order - 1))).max(MIN_SHRINK)
            } else {
                MIN_SHRINK
            };
            step_size = (h * shrink).max(min_step).copysign(step_size);
            step_dur = step_size * Unit::Second;
        }
    }

    /// Copy the details of the latest integration step.
    pub fn latest_details(&self) -> IntegrationDetails {
        self.details
    }
}
