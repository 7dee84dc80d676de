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

use super::{PropagatorSetup, StepHandler, SyncStep};
use crate::cosmic::State;
use crate::dynamics::{Dynamics, SpacecraftDynamics};
use crate::linalg::allocator::Allocator;
use crate::linalg::DefaultAllocator;
use crate::propagators::{
    ErrorCtrl, MemberSnafu, PropInstance, PropagationError, ScaledRms, StepSizeUnderflowSnafu,
};
use crate::time::{Duration, Epoch};
use rayon::prelude::*;
use snafu::ResultExt;
use std::time::Instant;

/// Propagates several instances on one shared step schedule.
///
/// At each step, every instance proposes its own adaptive step in parallel, the smallest one is taken
/// by all, and all the states are reported at once to the step handler.
pub struct ParallelPropagation<'a, D: Dynamics, E: ErrorCtrl>
where
    DefaultAllocator: Allocator<<D::StateType as State>::VecLength>,
{
    pub instances: Vec<PropInstance<'a, D, E>>,
}

impl<'a> ParallelPropagation<'a, SpacecraftDynamics, ScaledRms> {
    /// Binds each setup to its initial state.
    pub fn from_setups(setups: &'a [PropagatorSetup]) -> Self {
        Self::new(setups.iter().map(|setup| setup.instance()).collect())
    }
}

/// Unpacks per-instance results, reporting the failure of the lowest index.
fn collect_members<T>(results: Vec<Result<T, PropagationError>>) -> Result<Vec<T>, PropagationError> {
    results
        .into_iter()
        .enumerate()
        .map(|(index, result)| result.context(MemberSnafu { index }))
        .collect()
}

impl<'a, D: Dynamics, E: ErrorCtrl> ParallelPropagation<'a, D, E>
where
    DefaultAllocator: Allocator<<D::StateType as State>::VecLength>,
    PropInstance<'a, D, E>: Send,
{
    pub fn new(instances: Vec<PropInstance<'a, D, E>>) -> Self {
        Self { instances }
    }

    /// Current states of all the instances
    pub fn states(&self) -> Vec<D::StateType> {
        self.instances.iter().map(|inst| inst.state).collect()
    }

    /// Propagates all the instances from `start` to `end` (which may precede `start`).
    ///
    /// Each instance is first brought to `start` without any report. The handler then receives the
    /// snapshot of every synchronized step, the last one being exactly at `end`. When `start` and `end`
    /// match, the start snapshot is the only (and last) step.
    ///
    /// The first failure aborts the whole propagation, and is reported with the index of the instance.
    pub fn propagate<H: StepHandler<D::StateType>>(
        &mut self,
        start: Epoch,
        end: Epoch,
        handler: &mut H,
    ) -> Result<(), PropagationError> {
        let tick = Instant::now();
        if self.instances.is_empty() {
            warn!("no propagator to step from {start} to {end}");
        }
        info!(
            "Propagating {} object(s) from {} to {}",
            self.instances.len(),
            start,
            end
        );

        collect_members(
            self.instances
                .par_iter_mut()
                .map(|inst| inst.until_epoch(start))
                .collect(),
        )?;

        handler.init(&self.states(), end);

        if start == end {
            handler.handle_step(&SyncStep {
                epoch: start,
                states: self.states(),
                is_last: true,
            });
            handler.finish();
            return Ok(());
        }

        let mut epoch = start;
        let mut num_steps: usize = 0;
        while epoch != end {
            let remaining = end - epoch;

            let proposals = collect_members(
                self.instances
                    .par_iter_mut()
                    .map(|inst| inst.propose_step(remaining))
                    .collect(),
            )?;

            let (index, common) = proposals.iter().enumerate().fold(
                (0, remaining),
                |(idx, acc), (i, step)| {
                    if step.abs() < acc.abs() {
                        (i, *step)
                    } else {
                        (idx, acc)
                    }
                },
            );
            if common == Duration::ZERO {
                // Below the time resolution, the schedule would stall
                let source = StepSizeUnderflowSnafu {
                    epoch,
                    step: common,
                    error: f64::NAN,
                }
                .build();
                return Err(source).context(MemberSnafu { index });
            }

            let states = collect_members(
                self.instances
                    .par_iter_mut()
                    .map(|inst| inst.commit_step(common))
                    .collect(),
            )?;

            epoch = epoch + common;
            num_steps += 1;
            handler.handle_step(&SyncStep {
                epoch,
                states,
                is_last: epoch == end,
            });
        }

        handler.finish();

        let tock: Duration = tick.elapsed().into();
        info!("Done in {} ({} synchronized steps)", tock, num_steps);
        Ok(())
    }
}
