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

use freight_alloc_core::prelude::Quantity;
use freight_alloc_model::prelude::ShipmentIdentifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    UnknownShipment(ShipmentIdentifier),
    DuplicateShipment(ShipmentIdentifier),
    InvalidQuantity {
        shipment: ShipmentIdentifier,
        quantity: Quantity,
    },
    OrderMismatch(ShipmentIdentifier, ShipmentIdentifier),
    RouteMismatch(ShipmentIdentifier, ShipmentIdentifier),
    SameShipment(ShipmentIdentifier),
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::UnknownShipment(id) => write!(f, "Shipment {} does not exist", id),
            MoveError::DuplicateShipment(id) => write!(f, "Shipment {} already exists", id),
            MoveError::InvalidQuantity { shipment, quantity } => write!(
                f,
                "Quantity {} is not movable out of shipment {}",
                quantity, shipment
            ),
            MoveError::OrderMismatch(a, b) => {
                write!(f, "Shipments {} and {} belong to different orders", a, b)
            }
            MoveError::RouteMismatch(a, b) => {
                write!(f, "Shipments {} and {} use different routes", a, b)
            }
            MoveError::SameShipment(id) => {
                write!(f, "Move references shipment {} twice", id)
            }
        }
    }
}

impl std::error::Error for MoveError {}

