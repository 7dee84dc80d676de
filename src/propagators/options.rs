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

use std::fmt;

use crate::time::{Duration, Unit};

use super::{ErrorCtrl, ScaledRms};
use typed_builder::TypedBuilder;

/// IntegratorOptions stores the integrator options, including the minimum and maximum step sizes,
/// and the absolute and relative tolerances.
///
/// Steps are magnitudes: the direction of the propagation is given by the requested duration.
#[derive(Clone, Copy, Debug, TypedBuilder)]
#[builder(doc)]
pub struct IntegratorOptions<E: ErrorCtrl> {
    #[builder(default_code = "60.0 * Unit::Second")]
    pub init_step: Duration,
    #[builder(default_code = "0.001 * Unit::Second")]
    pub min_step: Duration,
    #[builder(default_code = "2700.0 * Unit::Second")]
    pub max_step: Duration,
    #[builder(default = 1e-10)]
    pub abs_tol: f64,
    #[builder(default = 1e-12)]
    pub rel_tol: f64,
    #[builder(default = 50)]
    pub attempts: u8,
    pub error_ctrl: E,
}

impl<E: ErrorCtrl> IntegratorOptions<E> {
    /// `with_adaptive_step` initializes an `IntegratorOptions` such that the integrator is used with an
    ///  adaptive step size. The number of attempts is currently fixed to 50 (as in GMAT).
    /// The initial step is the smallest of 60 seconds and the maximum step, but no smaller than the minimum step.
    pub fn with_adaptive_step(
        min_step: Duration,
        max_step: Duration,
        abs_tol: f64,
        rel_tol: f64,
        error_ctrl: E,
    ) -> Self {
        let init_step = (60.0 * Unit::Second).min(max_step).max(min_step);
        IntegratorOptions {
            init_step,
            min_step,
            max_step,
            abs_tol,
            rel_tol,
            attempts: 50,
            error_ctrl,
        }
    }

    pub fn with_adaptive_step_s(
        min_step: f64,
        max_step: f64,
        abs_tol: f64,
        rel_tol: f64,
        error_ctrl: E,
    ) -> Self {
        Self::with_adaptive_step(
            min_step * Unit::Second,
            max_step * Unit::Second,
            abs_tol,
            rel_tol,
            error_ctrl,
        )
    }
}

impl<E: ErrorCtrl> fmt::Display for IntegratorOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min_step: {:e}, max_step: {:e}, abs tol: {:e}, rel tol: {:e}, attempts: {}",
            self.min_step, self.max_step, self.abs_tol, self.rel_tol, self.attempts,
        )
    }
}

impl Default for IntegratorOptions<ScaledRms> {
    /// `default` returns the same default step bounds as GMAT.
    fn default() -> IntegratorOptions<ScaledRms> {
        IntegratorOptions {
            init_step: 60.0 * Unit::Second,
            min_step: 0.001 * Unit::Second,
            max_step: 2700.0 * Unit::Second,
            abs_tol: 1e-10,
            rel_tol: 1e-12,
            attempts: 50,
            error_ctrl: ScaledRms,
        }
    }
}

#[test]
fn test_options() {
    use super::error_ctrl::ScaledMax;

    let opts = IntegratorOptions::with_adaptive_step_s(1e-2, 10.0, 1e-6, 1e-12, ScaledMax);
    assert_eq!(opts.min_step, 1e-2 * Unit::Second);
    assert_eq!(opts.max_step, 10.0 * Unit::Second);
    assert_eq!(opts.init_step, 10.0 * Unit::Second);
    assert!((opts.abs_tol - 1e-6).abs() < f64::EPSILON);
    assert!((opts.rel_tol - 1e-12).abs() < f64::EPSILON);

    let opts = IntegratorOptions::with_adaptive_step_s(120.0, 600.0, 1e-6, 1e-12, ScaledRms);
    assert_eq!(opts.init_step, 120.0 * Unit::Second);

    let opts: IntegratorOptions<ScaledRms> = Default::default();
    assert_eq!(opts.init_step, 60.0 * Unit::Second);
    assert_eq!(opts.min_step, 0.001 * Unit::Second);
    assert_eq!(opts.max_step, 2700.0 * Unit::Second);
    assert_eq!(opts.attempts, 50);

    let opts = IntegratorOptions::builder()
        .min_step(1.0 * Unit::Second)
        .abs_tol(1e-3)
        .error_ctrl(ScaledRms)
        .build();
    assert_eq!(opts.min_step, 1.0 * Unit::Second);
    assert_eq!(opts.max_step, 2700.0 * Unit::Second);
    assert!((opts.rel_tol - 1e-12).abs() < f64::EPSILON);
}
