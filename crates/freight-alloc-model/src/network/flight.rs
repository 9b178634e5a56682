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

use crate::{
    common::{AirportCode, FlightIdentifier},
    network::err::FlightError,
};
use freight_alloc_core::prelude::{Quantity, TimeDelta, TimePoint};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlightStatus {
    #[default]
    Scheduled,
    Delayed,
    Cancelled,
    Completed,
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FlightStatus::Scheduled => "SCHEDULED",
            FlightStatus::Delayed => "DELAYED",
            FlightStatus::Cancelled => "CANCELLED",
            FlightStatus::Completed => "COMPLETED",
        };
        write!(f, "{}", s)
    }
}

/// A scheduled leg between two airports. Times are absolute (UTC minutes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flight {
    id: FlightIdentifier,
    origin: AirportCode,
    destination: AirportCode,
    departure: i64,
    arrival: i64,
    capacity: Quantity,
    status: FlightStatus,
}

impl Flight {
    pub fn new(
        id: FlightIdentifier,
        origin: AirportCode,
        destination: AirportCode,
        departure: TimePoint<i64>,
        arrival: TimePoint<i64>,
        capacity: Quantity,
    ) -> Result<Self, FlightError> {
        if origin == destination {
            return Err(FlightError::SameEndpoints(id));
        }
        if arrival <= departure {
            return Err(FlightError::NonPositiveDuration(id));
        }
        if capacity == 0 {
            return Err(FlightError::ZeroCapacity(id));
        }
        Ok(Self {
            id,
            origin,
            destination,
            departure: departure.value(),
            arrival: arrival.value(),
            capacity,
            status: FlightStatus::Scheduled,
        })
    }

    #[inline]
    pub fn with_status(mut self, status: FlightStatus) -> Self {
        self.status = status;
        self
    }

    #[inline]
    pub fn set_status(&mut self, status: FlightStatus) {
        self.status = status;
    }

    #[inline]
    pub fn id(&self) -> FlightIdentifier {
        self.id
    }

    #[inline]
    pub fn origin(&self) -> &AirportCode {
        &self.origin
    }

    #[inline]
    pub fn destination(&self) -> &AirportCode {
        &self.destination
    }

    #[inline]
    pub fn departure(&self) -> TimePoint<i64> {
        TimePoint::new(self.departure)
    }

    #[inline]
    pub fn arrival(&self) -> TimePoint<i64> {
        TimePoint::new(self.arrival)
    }

    #[inline]
    pub fn duration(&self) -> TimeDelta<i64> {
        self.arrival() - self.departure()
    }

    #[inline]
    pub fn capacity(&self) -> Quantity {
        self.capacity
    }

    #[inline]
    pub fn status(&self) -> FlightStatus {
        self.status
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.status == FlightStatus::Cancelled
    }

    /// Identity used when a cancellation notice names a flight by schedule
    /// rather than by id.
    #[inline]
    pub fn same_schedule(&self, other: &Flight) -> bool {
        self.origin == other.origin
            && self.destination == other.destination
            && self.departure == other.departure
    }
}

impl std::fmt::Display for Flight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}->{} dep {} arr {} cap {} {}",
            self.id,
            self.origin.as_str(),
            self.destination.as_str(),
            self.departure,
            self.arrival,
            self.capacity,
            self.status
        )
    }
}
