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

use crate::io::ConfigError;
use crate::propagators::PropagationError;
use snafu::prelude::*;

/// Errors of a complete run: from the configurations to the last synchronized step.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MultiPropError {
    #[snafu(context(false), display("configuration error: {source}"))]
    Config { source: ConfigError },
    #[snafu(context(false), display("propagation error: {source}"))]
    Propagation { source: PropagationError },
}

impl MultiPropError {
    /// Index of the object at fault, either its configuration or its propagation
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Config { source } => source.index(),
            Self::Propagation { source } => source.member_index(),
        }
    }
}
