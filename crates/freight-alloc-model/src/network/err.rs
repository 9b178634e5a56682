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

use crate::common::{AirportCode, FlightIdentifier};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvalidAirportCodeError {
    code: String,
}

impl InvalidAirportCodeError {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for InvalidAirportCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Airport code {:?} must be 3 or 4 ASCII letters or digits",
            self.code
        )
    }
}

impl std::error::Error for InvalidAirportCodeError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZeroStorageCapacityError {
    code: AirportCode,
}

impl ZeroStorageCapacityError {
    pub fn new(code: AirportCode) -> Self {
        Self { code }
    }

    pub fn code(&self) -> &AirportCode {
        &self.code
    }
}

impl std::fmt::Display for ZeroStorageCapacityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} has no storage capacity", self.code)
    }
}

impl std::error::Error for ZeroStorageCapacityError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GmtOffsetOutOfRangeError {
    code: AirportCode,
    offset: i32,
}

impl GmtOffsetOutOfRangeError {
    pub fn new(code: AirportCode, offset: i32) -> Self {
        Self { code, offset }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }
}

impl std::fmt::Display for GmtOffsetOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GMT offset {} of {} is outside -12..=14",
            self.offset, self.code
        )
    }
}

impl std::error::Error for GmtOffsetOutOfRangeError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AirportError {
    InvalidCode(InvalidAirportCodeError),
    ZeroStorageCapacity(ZeroStorageCapacityError),
    GmtOffsetOutOfRange(GmtOffsetOutOfRangeError),
}

impl std::fmt::Display for AirportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AirportError::InvalidCode(e) => write!(f, "{}", e),
            AirportError::ZeroStorageCapacity(e) => write!(f, "{}", e),
            AirportError::GmtOffsetOutOfRange(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AirportError {}

impl From<InvalidAirportCodeError> for AirportError {
    fn from(err: InvalidAirportCodeError) -> Self {
        AirportError::InvalidCode(err)
    }
}

impl From<ZeroStorageCapacityError> for AirportError {
    fn from(err: ZeroStorageCapacityError) -> Self {
        AirportError::ZeroStorageCapacity(err)
    }
}

impl From<GmtOffsetOutOfRangeError> for AirportError {
    fn from(err: GmtOffsetOutOfRangeError) -> Self {
        AirportError::GmtOffsetOutOfRange(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CoordinateError {
    Unparseable(String),
    OutOfRange(String),
}

impl std::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateError::Unparseable(raw) => {
                write!(f, "Cannot parse coordinate {:?}", raw)
            }
            CoordinateError::OutOfRange(raw) => {
                write!(f, "Coordinate {} is out of range", raw)
            }
        }
    }
}

impl std::error::Error for CoordinateError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlightError {
    SameEndpoints(FlightIdentifier),
    NonPositiveDuration(FlightIdentifier),
    ZeroCapacity(FlightIdentifier),
}

impl std::fmt::Display for FlightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlightError::SameEndpoints(id) => {
                write!(f, "{} departs from and arrives at the same airport", id)
            }
            FlightError::NonPositiveDuration(id) => {
                write!(f, "{} does not arrive after it departs", id)
            }
            FlightError::ZeroCapacity(id) => write!(f, "{} has zero capacity", id),
        }
    }
}

impl std::error::Error for FlightError {}
