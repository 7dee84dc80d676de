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

use crate::time::Epoch;

/// The simultaneous states of all the propagators after one synchronized step.
///
/// The i-th state is the state of the i-th propagator.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncStep<S> {
    pub epoch: Epoch,
    pub states: Vec<S>,
    /// Set on the snapshot at the end of the propagation window
    pub is_last: bool,
}

impl<S> SyncStep<S> {
    /// State of the i-th propagator
    pub fn state(&self, index: usize) -> Option<&S> {
        self.states.get(index)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.states.iter()
    }
}

/// Handles the synchronized steps of a parallel propagation.
///
/// Any `FnMut(&SyncStep<S>)` closure is a step handler.
pub trait StepHandler<S> {
    /// Called once, with the states at the start of the window, before any step.
    fn init(&mut self, _states: &[S], _target: Epoch) {}

    /// Called exactly once per synchronized step, with all the states.
    fn handle_step(&mut self, step: &SyncStep<S>);

    /// Called once after the last step.
    fn finish(&mut self) {}
}

impl<S, F> StepHandler<S> for F
where
    F: FnMut(&SyncStep<S>),
{
    fn handle_step(&mut self, step: &SyncStep<S>) {
        self(step)
    }
}

/// A step handler which stores every synchronized step.
#[derive(Clone, Debug, Default)]
pub struct StepRecorder<S> {
    /// States at the start of the window
    pub initial: Vec<S>,
    pub target: Option<Epoch>,
    pub steps: Vec<SyncStep<S>>,
    pub finished: bool,
}

impl<S> StepRecorder<S> {
    pub fn new() -> Self {
        Self {
            initial: Vec::new(),
            target: None,
            steps: Vec::new(),
            finished: false,
        }
    }

    /// The last recorded step, if any
    pub fn last(&self) -> Option<&SyncStep<S>> {
        self.steps.last()
    }

    /// The history of the i-th propagator
    pub fn history(&self, index: usize) -> impl Iterator<Item = &S> {
        self.steps.iter().filter_map(move |step| step.state(index))
    }
}

impl<S: Clone> StepHandler<S> for StepRecorder<S> {
    fn init(&mut self, states: &[S], target: Epoch) {
        self.initial = states.to_vec();
        self.target = Some(target);
        self.steps.clear();
        self.finished = false;
    }

    fn handle_step(&mut self, step: &SyncStep<S>) {
        self.steps.push(step.clone());
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
