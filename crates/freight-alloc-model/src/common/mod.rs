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

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub trait IdentifierMarkerName: Copy {
    const NAME: &'static str;
}

#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(serialize = "I: Serialize", deserialize = "I: Deserialize<'de>"))]
pub struct Identifier<I, U>(I, core::marker::PhantomData<U>);

impl<I, U> Identifier<I, U> {
    #[inline]
    pub fn new(id: I) -> Self {
        Self(id, core::marker::PhantomData)
    }

    #[inline]
    pub fn value(&self) -> &I {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> I {
        self.0
    }
}

impl<I, U> std::fmt::Display for Identifier<I, U>
where
    I: std::fmt::Display,
    U: IdentifierMarkerName,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME, self.0)
    }
}

macro_rules! identifier_marker {
    ($marker:ident, $name:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $marker;

        impl IdentifierMarkerName for $marker {
            const NAME: &'static str = $name;
        }
    };
}

identifier_marker!(AirportCodeMarker, "Airport");
identifier_marker!(FlightIdentifierMarker, "FlightId");
identifier_marker!(OrderIdentifierMarker, "OrderId");
identifier_marker!(ShipmentIdentifierMarker, "ShipmentId");

/// Upper-case ICAO/IATA style code; cheap to clone.
pub type AirportCode = Identifier<Arc<str>, AirportCodeMarker>;
pub type FlightIdentifier = Identifier<u32, FlightIdentifierMarker>;
pub type OrderIdentifier = Identifier<u32, OrderIdentifierMarker>;
pub type ShipmentIdentifier = Identifier<u64, ShipmentIdentifierMarker>;

impl AirportCode {
    #[inline]
    pub fn as_str(&self) -> &str {
        self.value()
    }
}

impl From<&str> for AirportCode {
    #[inline]
    fn from(code: &str) -> Self {
        Identifier::new(Arc::from(code.to_ascii_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_marker_name() {
        assert_eq!(FlightIdentifier::new(7).to_string(), "FlightId(7)");
        assert_eq!(AirportCode::from("spim").to_string(), "Airport(SPIM)");
    }

    #[test]
    fn test_airport_code_equality_is_case_insensitive_on_input() {
        assert_eq!(AirportCode::from("ebci"), AirportCode::from("EBCI"));
        assert_eq!(AirportCode::from("ubbb").as_str(), "UBBB");
    }

    #[test]
    fn test_identifiers_order_by_value() {
        let mut ids = vec![OrderIdentifier::new(3), OrderIdentifier::new(1)];
        ids.sort();
        assert_eq!(ids[0].into_inner(), 1);
    }
}
