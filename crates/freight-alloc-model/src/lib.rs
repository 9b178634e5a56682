// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Reference data and plan representation for air cargo allocation.
//!
//! Airports, flights and orders are validated on construction and are
//! immutable afterwards. A [`problem::Problem`] bundles them with indexes,
//! a [`solution::Solution`] is the list of shipments a planner produced.

pub mod common;
pub mod demand;
pub mod feed;
pub mod network;
pub mod problem;
pub mod solution;

pub mod prelude {
    pub use crate::common::{
        AirportCode, FlightIdentifier, Identifier, OrderIdentifier, ShipmentIdentifier,
    };
    pub use crate::demand::{Order, OrderError};
    pub use crate::feed::{DataFeed, InMemoryFeed};
    pub use crate::network::{
        Airport, Continent, Coordinates, Flight, FlightStatus, parse_coordinate,
    };
    pub use crate::network::err::{AirportError, CoordinateError, FlightError};
    pub use crate::problem::{
        CommittedLoad, Problem, ProblemBuilder, ProblemError, ScenarioConfig, ScenarioGenerator,
        UnknownAirportError,
    };
    pub use crate::solution::{Route, SearchStats, Shipment, Solution, SolutionValidationError};
}
