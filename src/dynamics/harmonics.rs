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

use super::{AccelModel, DynamicsError};
use crate::cosmic::Orbit;
use crate::linalg::Vector3;
use std::fmt;
use std::sync::Arc;

/// Unnormalized EGM96 zonal coefficients J2 through J6.
const EGM96_ZONALS: [f64; 5] = [
    1.082_626_683_553_151_3e-3,
    -2.532_656_485_332_235_5e-6,
    -1.619_621_591_367_000_1e-6,
    -2.272_960_829_2e-7,
    5.406_812_391e-7,
];

/// Highest supported degree of the zonal field.
pub const MAX_ZONAL_DEGREE: usize = 6;

/// Zonal harmonics of the central body's gravity field (axially symmetric terms only).
///
/// Each degree n contributes
/// `a_n = mu J_n R^n / r^(n+2) [((n+1) P_n(u) + u P'_n(u)) r_hat - P'_n(u) z_hat]`, where `u = z / r`,
/// and the Legendre polynomials are evaluated with the Bonnet recurrence.
/// The frame's equatorial axis is assumed aligned with the body's rotation axis.
#[derive(Clone, Debug)]
pub struct Harmonics {
    /// J_2 ..= J_degree
    jn: Vec<f64>,
}

impl Harmonics {
    /// EGM96 zonal field up to the provided degree, truncated to [2, 6].
    pub fn egm96(degree: usize) -> Arc<Self> {
        let degree = degree.clamp(2, MAX_ZONAL_DEGREE);
        Arc::new(Self {
            jn: EGM96_ZONALS[..degree - 1].to_vec(),
        })
    }

    /// J2 only
    pub fn j2() -> Arc<Self> {
        Self::egm96(2)
    }

    pub fn degree(&self) -> usize {
        self.jn.len() + 1
    }
}

impl fmt::Display for Harmonics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EGM96 zonal harmonics up to J{}", self.degree())
    }
}

impl AccelModel for Harmonics {
    fn eom(&self, osc: &Orbit) -> Result<Vector3<f64>, DynamicsError> {
        let r = osc.rmag_m();
        let r_hat = osc.radius() / r;
        let u = r_hat[2];
        let z_hat = Vector3::z();
        let mu = osc.frame.mu_m3_s2;
        let req_r = osc.frame.equatorial_radius_m / r;

        // P_{n-2}, P_{n-1} and their derivatives, starting at n = 2
        let (mut p_nm2, mut p_nm1) = (1.0, u);
        let (mut dp_nm1, mut req_r_n) = (1.0, req_r);

        let mut accel = Vector3::zeros();
        for (idx, jn) in self.jn.iter().enumerate() {
            let n = (idx + 2) as f64;
            let p_n = ((2.0 * n - 1.0) * u * p_nm1 - (n - 1.0) * p_nm2) / n;
            let dp_n = n * p_nm1 + u * dp_nm1;
            req_r_n *= req_r;

            let scale = mu * jn * req_r_n / r.powi(2);
            accel += scale * (((n + 1.0) * p_n + u * dp_n) * r_hat - dp_n * z_hat);

            p_nm2 = p_nm1;
            p_nm1 = p_n;
            dp_nm1 = dp_n;
        }

        Ok(accel)
    }
}
