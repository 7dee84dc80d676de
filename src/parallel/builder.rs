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

use crate::cosmic::{DragConfig, Orbit, Spacecraft, SrpConfig, EME2000};
use crate::dynamics::{
    AtmDensity, Drag, ForceModel, Harmonics, OrbitalDynamics, PointMasses,
    SolarPressure, SpacecraftDynamics,
};
use crate::io::{
    parse_utc_epoch, BelowTimeResolutionSnafu, ConfigError, Configurable, ForceModelConfig,
    InvertedStepBoundsSnafu, NonFiniteSnafu, NonPositiveSnafu, ObjectSnafu, PropagationConfig,
    StateVectorLengthSnafu,
};
use crate::propagators::{IntegratorOptions, PropInstance, Propagator, ScaledRms};
use crate::time::Unit;
use snafu::{ensure, ResultExt};
use std::sync::Arc;

/// Initial step when none is configured, in seconds
const DEFAULT_INIT_STEP_S: f64 = 60.0;
/// Epochs are resolved to the nanosecond
const TIME_RESOLUTION_S: f64 = 1e-9;

/// A propagator ready to be stepped: the dynamics and integrator of one object, and its initial state.
#[derive(Clone, Debug)]
pub struct PropagatorSetup {
    pub propagator: Propagator<SpacecraftDynamics, ScaledRms>,
    pub initial_state: Spacecraft,
    config: PropagationConfig,
}

impl PropagatorSetup {
    /// Binds the initial state to the propagator.
    pub fn instance(&self) -> PropInstance<'_, SpacecraftDynamics, ScaledRms> {
        self.propagator.with(self.initial_state)
    }

    /// The configuration this setup was built from
    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }
}

impl Configurable for PropagatorSetup {
    type IntermediateRepr = PropagationConfig;

    fn from_config(cfg: PropagationConfig) -> Result<Self, ConfigError> {
        build_propagator(&cfg)
    }

    fn to_config(&self) -> Result<PropagationConfig, ConfigError> {
        Ok(self.config.clone())
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    ensure!(value.is_finite(), NonFiniteSnafu { field });
    ensure!(value > 0.0, NonPositiveSnafu { field, value });
    Ok(value)
}

/// Builds the propagator of one object from its configuration.
///
/// The initial state is expressed in EME2000 around the Earth (EGM96 gravitational parameter) at the
/// configured UTC epoch. No integration is performed.
/// Validates one configuration and builds its propagator, without integrating anything.
///
/// The initial state is the spacecraft at the configured UTC epoch in EME2000. The force descriptors are
/// split in two ordered lists: `Harmonics` and `ThirdBody` are acceleration models of the orbital dynamics,
/// while drag and solar pressure are force models of the spacecraft dynamics. The configured order is kept
/// within each list, and the orbital accelerations are always summed before the forces.
pub fn build_propagator(cfg: &PropagationConfig) -> Result<PropagatorSetup, ConfigError> {
    let xi = &cfg.propagation.initial_state;
    ensure!(
        xi.len() == 6,
        StateVectorLengthSnafu {
            field: "InitialState",
            len: xi.len()
        }
    );
    ensure!(
        xi.iter().all(|x| x.is_finite()),
        NonFiniteSnafu {
            field: "InitialState"
        }
    );
    let epoch = parse_utc_epoch("Start", &cfg.propagation.start)?;

    let obj = &cfg.space_object;
    let mass_kg = check_positive("Mass", obj.mass)?;
    let area_m2 = check_positive("Area", obj.area)?;
    let cd = check_positive("Cd", obj.cd)?;
    let cr = check_positive("Cr", obj.cr)?;

    let integ = &cfg.integration;
    let min_step = check_positive("MinTimeStep", integ.min_time_step)?;
    let max_step = check_positive("MaxTimeStep", integ.max_time_step)?;
    let abs_tol = check_positive("AbsTolerance", integ.abs_tolerance)?;
    let rel_tol = check_positive("RelTolerance", integ.rel_tolerance)?;
    ensure!(
        min_step >= TIME_RESOLUTION_S,
        BelowTimeResolutionSnafu {
            field: "MinTimeStep",
            value: min_step
        }
    );
    ensure!(
        min_step <= max_step,
        InvertedStepBoundsSnafu {
            min: min_step,
            max: max_step
        }
    );
    let init_step = match integ.initial_step {
        Some(step) => check_positive("InitialStep", step)?,
        None => DEFAULT_INIT_STEP_S,
    }
    .min(max_step)
    .max(min_step);

    let mut orbital_dyn = OrbitalDynamics::two_body();
    let mut force_models: Vec<Arc<dyn ForceModel>> = Vec::new();
    for force in &cfg.forces {
        force.validate()?;
        match force {
            ForceModelConfig::Harmonics { degree } => {
                orbital_dyn.add_model(Harmonics::egm96(*degree))
            }
            ForceModelConfig::ThirdBody { bodies } => {
                orbital_dyn.add_model(PointMasses::new(bodies.clone()))
            }
            ForceModelConfig::ExponentialDrag { rho0, h0, hscale } => {
                force_models.push(Drag::new(AtmDensity::Exponential {
                    rho0_kg_m3: *rho0,
                    h0_m: *h0,
                    scale_height_m: *hscale,
                }))
            }
            ForceModelConfig::ConstantDrag { rho } => {
                force_models.push(Drag::new(AtmDensity::Constant(*rho)))
            }
            ForceModelConfig::SolarPressure { shadow } => {
                force_models.push(if *shadow {
                    SolarPressure::new()
                } else {
                    SolarPressure::no_shadow()
                })
            }
        }
    }

    let orbit = Orbit::cartesian(xi[0], xi[1], xi[2], xi[3], xi[4], xi[5], epoch, EME2000);
    let initial_state = Spacecraft::new(
        orbit,
        mass_kg,
        SrpConfig { area_m2, cr },
        DragConfig { area_m2, cd },
    );

    let opts = IntegratorOptions::builder()
        .init_step(init_step * Unit::Second)
        .min_step(min_step * Unit::Second)
        .max_step(max_step * Unit::Second)
        .abs_tol(abs_tol)
        .rel_tol(rel_tol)
        .error_ctrl(ScaledRms)
        .build();

    let dynamics = SpacecraftDynamics::from_models(orbital_dyn, force_models);
    debug!("{} with {}: {}", integ.method, opts, dynamics);

    Ok(PropagatorSetup {
        propagator: Propagator::from_method(integ.method, dynamics, opts),
        initial_state,
        config: cfg.clone(),
    })
}

/// Builds one propagator per configuration, in order.
///
/// The whole batch is rejected on the first invalid configuration, and the error carries its index.
/// Builds the propagators of a batch in order. The first invalid configuration aborts the whole batch,
/// and the error carries its index.
pub fn build_propagators(cfgs: &[PropagationConfig]) -> Result<Vec<PropagatorSetup>, ConfigError> {
    if cfgs.is_empty() {
        warn!("building an empty batch of propagators");
    }
    cfgs.iter()
        .enumerate()
        .map(|(index, cfg)| build_propagator(cfg).context(ObjectSnafu { index }))
        .collect()
}
