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
use std::fmt::Debug;

/// The Error Control trait manages how a propagator computes the error in the current step.
///
/// The estimate is normalized by the tolerance: the step is accepted when it is at most 1.0.
/// Each component `i` is scaled by `abs_tol + rel_tol * max(|y_i|, |y_i_candidate|)`.
pub trait ErrorCtrl
where
    Self: Copy + Send + Sync + Debug,
{
    /// Computes the actual error of the current step.
    ///
    /// The `error_est` is the estimated error computed from the difference in the two solutions of
    /// the RK propagator. The `candidate` variable is the candidate state, and `cur_state` is
    /// the current state.
    fn estimate<N: DimName>(
        error_est: &OVector<f64, N>,
        candidate: &OVector<f64, N>,
        cur_state: &OVector<f64, N>,
        abs_tol: f64,
        rel_tol: f64,
    ) -> f64
    where
        DefaultAllocator: Allocator<N>;
}

/// Scale of the i-th component of the error vector
fn scale(candidate_i: f64, cur_state_i: f64, abs_tol: f64, rel_tol: f64) -> f64 {
    abs_tol + rel_tol * candidate_i.abs().max(cur_state_i.abs())
}

/// A root mean square error control: the usual choice of the Dormand-Prince family.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScaledRms;

impl ErrorCtrl for ScaledRms {
    fn estimate<N: DimName>(
        error_est: &OVector<f64, N>,
        candidate: &OVector<f64, N>,
        cur_state: &OVector<f64, N>,
        abs_tol: f64,
        rel_tol: f64,
    ) -> f64
    where
        DefaultAllocator: Allocator<N>,
    {
        let mut sum = 0.0;
        for i in 0..N::dim() {
            let ratio = error_est[i] / scale(candidate[i], cur_state[i], abs_tol, rel_tol);
            sum += ratio * ratio;
        }
        (sum / N::dim() as f64).sqrt()
    }
}

/// A largest component error control, more stringent than [`ScaledRms`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ScaledMax;

impl ErrorCtrl for ScaledMax {
    fn estimate<N: DimName>(
        error_est: &OVector<f64, N>,
        candidate: &OVector<f64, N>,
        cur_state: &OVector<f64, N>,
        abs_tol: f64,
        rel_tol: f64,
    ) -> f64
    where
        DefaultAllocator: Allocator<N>,
    {
        let mut max_err = 0.0_f64;
        for i in 0..N::dim() {
            let err = (error_est[i] / scale(candidate[i], cur_state[i], abs_tol, rel_tol)).abs();
            // NaN must propagate so the step gets rejected
            if err.is_nan() {
                return f64::NAN;
            }
            max_err = max_err.max(err);
        }
        max_err
    }
}
