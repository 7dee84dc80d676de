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


/*! # multiprop
Synchronized parallel propagation of many spacecraft: every object is integrated with its own adaptive
Runge Kutta propagator and force models, but all of them step together on one shared schedule, and a
single handler receives all their states at each step.

```no_run
use multiprop::parallel::{propagate, SyncStep};
use multiprop::Spacecraft;

let cfg = std::fs::read_to_string("leo.json").unwrap();
propagate(
    &[cfg.as_str(), cfg.as_str()],
    "2019-05-01T00:00:00Z",
    "2019-05-01T06:00:00Z",
    &mut |step: &SyncStep<Spacecraft>| println!("{} {}", step.epoch, step.states[0]),
)
.unwrap();
```
*/

/// Provides the propagators / integrators available in `multiprop`.
pub mod propagators;

/// Provides the dynamics used for orbital mechanics, which can be combined.
pub mod dynamics;

/// Provides the states, frames, constants and the Sun and Moon ephemerides.
pub mod cosmic;

/// Utility functions shared by different modules.
pub mod utils;

mod errors;
/// Functions which may fail return an error rather than panic.
pub use self::errors::MultiPropError;

/// The configuration documents and their loading.
pub mod io;

/// Building propagators from configurations and stepping them in lockstep.
pub mod parallel;

#[macro_use]
extern crate log;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::cosmic::{Orbit, Spacecraft, State};
