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

use crate::cosmic::Spacecraft;
use crate::io::{parse_utc_epoch, ConfigError, ConfigRepr, ObjectSnafu, PropagationConfig};
use crate::MultiPropError;
use snafu::ResultExt;

mod builder;
pub use self::builder::*;

mod handler;
pub use self::handler::*;

mod propagation;
pub use self::propagation::*;

/// Propagates every object described by the JSON configurations from `start` to `end`, two UTC date time
/// strings, and reports their synchronized states to the handler.
///
/// The i-th state of each step is the state of the object of the i-th configuration.
pub fn propagate<H: StepHandler<Spacecraft>>(
    configs: &[&str],
    start: &str,
    end: &str,
    handler: &mut H,
) -> Result<(), MultiPropError> {
    let cfgs = configs
        .iter()
        .enumerate()
        .map(|(index, json)| PropagationConfig::loads_json(json).context(ObjectSnafu { index }))
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let start = parse_utc_epoch("PropagationStart", start)?;
    let end = parse_utc_epoch("PropagationEnd", end)?;

    let setups = build_propagators(&cfgs)?;
    let mut driver = ParallelPropagation::from_setups(&setups);
    driver.propagate(start, end, handler)?;
    Ok(())
}
