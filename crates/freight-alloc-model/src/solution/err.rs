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

use crate::common::{FlightIdentifier, OrderIdentifier, ShipmentIdentifier};
use freight_alloc_core::prelude::Quantity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionValidationError {
    ZeroQuantity(ShipmentIdentifier),
    DuplicateShipment(ShipmentIdentifier),
    UnknownOrder(ShipmentIdentifier, OrderIdentifier),
    UnknownFlight(ShipmentIdentifier, FlightIdentifier),
    BrokenRoute(ShipmentIdentifier),
    ConnectionTooShort(ShipmentIdentifier),
    OverAssigned {
        order: OrderIdentifier,
        assigned: u64,
        requested: Quantity,
    },
}

impl std::fmt::Display for SolutionValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionValidationError::ZeroQuantity(id) => {
                write!(f, "Shipment {} carries no quantity", id)
            }
            SolutionValidationError::DuplicateShipment(id) => {
                write!(f, "Shipment {} appears more than once", id)
            }
            SolutionValidationError::UnknownOrder(id, order) => {
                write!(f, "Shipment {} references unknown order {}", id, order)
            }
            SolutionValidationError::UnknownFlight(id, flight) => {
                write!(f, "Shipment {} references unknown flight {}", id, flight)
            }
            SolutionValidationError::BrokenRoute(id) => write!(
                f,
                "Shipment {} does not chain from its order's origin to its destination",
                id
            ),
            SolutionValidationError::ConnectionTooShort(id) => {
                write!(f, "Shipment {} has a connection below the minimum", id)
            }
            SolutionValidationError::OverAssigned {
                order,
                assigned,
                requested,
            } => write!(
                f,
                "Order {} has {} units assigned but requested {}",
                order, assigned, requested
            ),
        }
    }
}

impl std::error::Error for SolutionValidationError {}
