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

use crate::search::err::MoveError;
use freight_alloc_core::prelude::Quantity;
use freight_alloc_model::prelude::{
    FlightIdentifier, OrderIdentifier, Route, Shipment, ShipmentIdentifier, Solution,
};
use serde::{Deserialize, Serialize};

/// Canonical key of a move for tabu membership and long-term statistics.
///
/// Built from the order and the flight sequence the moved quantity ends up
/// on, or `unassign-<shipment>` when that shipment has no route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveSignature(String);

impl MoveSignature {
    pub fn for_route(order: OrderIdentifier, route: &[FlightIdentifier]) -> Self {
        let legs: Vec<String> = route.iter().map(|f| f.value().to_string()).collect();
        Self(format!("{}:{}", order.value(), legs.join("-")))
    }

    #[inline]
    pub fn unassign(shipment: ShipmentIdentifier) -> Self {
        Self(format!("unassign-{}", shipment.value()))
    }

    fn of(shipment: &Shipment, route: &[FlightIdentifier]) -> Self {
        if route.is_empty() {
            Self::unassign(shipment.id())
        } else {
            Self::for_route(shipment.order(), route)
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MoveSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoveKind {
    Split,
    Merge,
    Transfer,
    Reroute,
}

impl std::fmt::Display for MoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveKind::Split => write!(f, "Split"),
            MoveKind::Merge => write!(f, "Merge"),
            MoveKind::Transfer => write!(f, "Transfer"),
            MoveKind::Reroute => write!(f, "Reroute"),
        }
    }
}

/// A neighbourhood step over a [`Solution`].
///
/// Moves reference shipments by id and are applied to a copy of the current
/// solution; they never touch the live plan directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TabuMove {
    /// Carve `quantity` out of `shipment` into a new shipment `new_id` on the
    /// same route.
    Split {
        shipment: ShipmentIdentifier,
        quantity: Quantity,
        new_id: ShipmentIdentifier,
    },
    /// Fold `absorb` into `keep`; both must share order and route.
    Merge {
        keep: ShipmentIdentifier,
        absorb: ShipmentIdentifier,
    },
    /// Move `quantity` between two shipments of the same order.
    Transfer {
        from: ShipmentIdentifier,
        to: ShipmentIdentifier,
        quantity: Quantity,
    },
    Reroute {
        shipment: ShipmentIdentifier,
        route: Route,
    },
}

#[inline]
fn lookup(solution: &Solution, id: ShipmentIdentifier) -> Result<&Shipment, MoveError> {
    solution.shipment(id).ok_or(MoveError::UnknownShipment(id))
}

#[inline]
fn lookup_mut(
    solution: &mut Solution,
    id: ShipmentIdentifier,
) -> Result<&mut Shipment, MoveError> {
    solution.shipment_mut(id).ok_or(MoveError::UnknownShipment(id))
}

impl TabuMove {
    #[inline]
    pub fn kind(&self) -> MoveKind {
        match self {
            TabuMove::Split { .. } => MoveKind::Split,
            TabuMove::Merge { .. } => MoveKind::Merge,
            TabuMove::Transfer { .. } => MoveKind::Transfer,
            TabuMove::Reroute { .. } => MoveKind::Reroute,
        }
    }

    /// Signature against the solution the move is about to be applied to.
    pub fn signature(&self, solution: &Solution) -> Result<MoveSignature, MoveError> {
        Ok(match self {
            TabuMove::Split { shipment, .. } => {
                let s = lookup(solution, *shipment)?;
                MoveSignature::of(s, s.route())
            }
            TabuMove::Merge { keep, .. } => {
                let s = lookup(solution, *keep)?;
                MoveSignature::of(s, s.route())
            }
            TabuMove::Transfer { to, .. } => {
                let s = lookup(solution, *to)?;
                MoveSignature::of(s, s.route())
            }
            TabuMove::Reroute { shipment, route } => {
                MoveSignature::of(lookup(solution, *shipment)?, route)
            }
        })
    }

    pub fn apply(&self, solution: &mut Solution) -> Result<(), MoveError> {
        match self {
            TabuMove::Split {
                shipment,
                quantity,
                new_id,
            } => {
                if solution.shipment(*new_id).is_some() {
                    return Err(MoveError::DuplicateShipment(*new_id));
                }
                let pos = solution
                    .position(*shipment)
                    .ok_or(MoveError::UnknownShipment(*shipment))?;
                let source = lookup_mut(solution, *shipment)?;
                if *quantity == 0 || *quantity >= source.quantity() {
                    return Err(MoveError::InvalidQuantity {
                        shipment: *shipment,
                        quantity: *quantity,
                    });
                }
                source.set_quantity(source.quantity() - quantity);
                let piece = Shipment::new(
                    *new_id,
                    source.order(),
                    *quantity,
                    source.route().iter().copied(),
                );
                solution.insert(pos + 1, piece);
            }
            TabuMove::Merge { keep, absorb } => {
                if keep == absorb {
                    return Err(MoveError::SameShipment(*keep));
                }
                let a = lookup(solution, *keep)?;
                let b = lookup(solution, *absorb)?;
                if a.order() != b.order() {
                    return Err(MoveError::OrderMismatch(*keep, *absorb));
                }
                if !a.same_route(b) {
                    return Err(MoveError::RouteMismatch(*keep, *absorb));
                }
                let extra = b.quantity();
                solution.remove(*absorb);
                let target = lookup_mut(solution, *keep)?;
                target.set_quantity(target.quantity().saturating_add(extra));
            }
            TabuMove::Transfer { from, to, quantity } => {
                if from == to {
                    return Err(MoveError::SameShipment(*from));
                }
                let a = lookup(solution, *from)?;
                let b = lookup(solution, *to)?;
                if a.order() != b.order() {
                    return Err(MoveError::OrderMismatch(*from, *to));
                }
                if *quantity == 0 || *quantity >= a.quantity() {
                    return Err(MoveError::InvalidQuantity {
                        shipment: *from,
                        quantity: *quantity,
                    });
                }
                let source = lookup_mut(solution, *from)?;
                source.set_quantity(source.quantity() - quantity);
                let target = lookup_mut(solution, *to)?;
                target.set_quantity(target.quantity().saturating_add(*quantity));
            }
            TabuMove::Reroute { shipment, route } => {
                lookup_mut(solution, *shipment)?.set_route(route.iter().copied());
            }
        }
        Ok(())
    }

    /// The move that undoes `self`, given the solution it was applied to.
    pub fn reverse(&self, before: &Solution) -> Result<TabuMove, MoveError> {
        Ok(match self {
            TabuMove::Split {
                shipment, new_id, ..
            } => TabuMove::Merge {
                keep: *shipment,
                absorb: *new_id,
            },
            TabuMove::Merge { keep, absorb } => TabuMove::Split {
                shipment: *keep,
                quantity: lookup(before, *absorb)?.quantity(),
                new_id: *absorb,
            },
            TabuMove::Transfer { from, to, quantity } => TabuMove::Transfer {
                from: *to,
                to: *from,
                quantity: *quantity,
            },
            TabuMove::Reroute { shipment, .. } => TabuMove::Reroute {
                shipment: *shipment,
                route: lookup(before, *shipment)?.route().iter().copied().collect(),
            },
        })
    }
}

impl std::fmt::Display for TabuMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabuMove::Split {
                shipment,
                quantity,
                new_id,
            } => write!(f, "Split({} -{} -> {})", shipment, quantity, new_id),
            TabuMove::Merge { keep, absorb } => write!(f, "Merge({} <- {})", keep, absorb),
            TabuMove::Transfer { from, to, quantity } => {
                write!(f, "Transfer({} -> {} x{})", from, to, quantity)
            }
            TabuMove::Reroute { shipment, route } => {
                write!(f, "Reroute({} via {} legs)", shipment, route.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(n: u64) -> ShipmentIdentifier {
        ShipmentIdentifier::new(n)
    }

    fn oid(n: u32) -> OrderIdentifier {
        OrderIdentifier::new(n)
    }

    fn fid(n: u32) -> FlightIdentifier {
        FlightIdentifier::new(n)
    }

    fn solution() -> Solution {
        Solution::new(vec![
            Shipment::new(sid(1), oid(1), 40, [fid(1), fid(2)]),
            Shipment::new(sid(2), oid(1), 10, [fid(3)]),
            Shipment::unrouted(sid(3), oid(1), 5),
            Shipment::new(sid(4), oid(2), 7, [fid(3)]),
        ])
    }

    #[test]
    fn test_split_then_merge_preserves_quantity() {
        let mut sol = solution();
        let before = sol.total_quantity();
        let split = TabuMove::Split {
            shipment: sid(1),
            quantity: 15,
            new_id: sid(10),
        };
        split.apply(&mut sol).unwrap();
        assert_eq!(sol.total_quantity(), before);
        assert_eq!(sol.shipment(sid(1)).unwrap().quantity(), 25);
        assert_eq!(sol.shipments()[1].id(), sid(10));
        assert_eq!(sol.shipments()[1].route(), &[fid(1), fid(2)]);

        let merge = split.reverse(&solution()).unwrap();
        merge.apply(&mut sol).unwrap();
        assert_eq!(sol, solution());
    }

    #[test]
    fn test_split_rejects_bad_quantities() {
        let mut sol = solution();
        for quantity in [0, 40, 41] {
            let mv = TabuMove::Split {
                shipment: sid(1),
                quantity,
                new_id: sid(10),
            };
            assert!(matches!(
                mv.apply(&mut sol),
                Err(MoveError::InvalidQuantity { .. })
            ));
        }
        let dup = TabuMove::Split {
            shipment: sid(1),
            quantity: 5,
            new_id: sid(2),
        };
        assert_eq!(dup.apply(&mut sol), Err(MoveError::DuplicateShipment(sid(2))));
        assert_eq!(sol, solution());
    }

    #[test]
    fn test_merge_requires_same_order_and_route() {
        let mut sol = solution();
        let wrong_route = TabuMove::Merge {
            keep: sid(1),
            absorb: sid(2),
        };
        assert_eq!(
            wrong_route.apply(&mut sol),
            Err(MoveError::RouteMismatch(sid(1), sid(2)))
        );
        let wrong_order = TabuMove::Merge {
            keep: sid(2),
            absorb: sid(4),
        };
        assert_eq!(
            wrong_order.apply(&mut sol),
            Err(MoveError::OrderMismatch(sid(2), sid(4)))
        );
    }

    #[test]
    fn test_transfer_and_reverse() {
        let mut sol = solution();
        let mv = TabuMove::Transfer {
            from: sid(1),
            to: sid(3),
            quantity: 12,
        };
        mv.apply(&mut sol).unwrap();
        assert_eq!(sol.shipment(sid(1)).unwrap().quantity(), 28);
        assert_eq!(sol.shipment(sid(3)).unwrap().quantity(), 17);
        mv.reverse(&solution()).unwrap().apply(&mut sol).unwrap();
        assert_eq!(sol, solution());

        let too_much = TabuMove::Transfer {
            from: sid(2),
            to: sid(1),
            quantity: 10,
        };
        assert!(too_much.apply(&mut sol).is_err());
    }

    #[test]
    fn test_reroute_and_reverse() {
        let mut sol = solution();
        let mv = TabuMove::Reroute {
            shipment: sid(3),
            route: Route::from_slice(&[fid(7)]),
        };
        mv.apply(&mut sol).unwrap();
        assert_eq!(sol.shipment(sid(3)).unwrap().route(), &[fid(7)]);
        mv.reverse(&solution()).unwrap().apply(&mut sol).unwrap();
        assert_eq!(sol, solution());
    }

    #[test]
    fn test_signatures() {
        let sol = solution();
        let split = TabuMove::Split {
            shipment: sid(1),
            quantity: 5,
            new_id: sid(10),
        };
        assert_eq!(split.signature(&sol).unwrap().as_str(), "1:1-2");

        let to_pending = TabuMove::Transfer {
            from: sid(1),
            to: sid(3),
            quantity: 5,
        };
        assert_eq!(to_pending.signature(&sol).unwrap().as_str(), "unassign-3");

        let reroute = TabuMove::Reroute {
            shipment: sid(3),
            route: Route::from_slice(&[fid(9)]),
        };
        assert_eq!(reroute.signature(&sol).unwrap().as_str(), "1:9");

        let missing = TabuMove::Merge {
            keep: sid(99),
            absorb: sid(1),
        };
        assert_eq!(
            missing.signature(&sol),
            Err(MoveError::UnknownShipment(sid(99)))
        );
    }
}
