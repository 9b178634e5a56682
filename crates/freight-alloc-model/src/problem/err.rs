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

use crate::common::{AirportCode, FlightIdentifier, OrderIdentifier};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownAirportError {
    code: AirportCode,
    referenced_by: String,
}

impl UnknownAirportError {
    pub fn new(code: AirportCode, referenced_by: impl Into<String>) -> Self {
        Self {
            code,
            referenced_by: referenced_by.into(),
        }
    }

    pub fn code(&self) -> &AirportCode {
        &self.code
    }

    pub fn referenced_by(&self) -> &str {
        &self.referenced_by
    }
}

impl std::fmt::Display for UnknownAirportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} references unknown {}",
            self.referenced_by, self.code
        )
    }
}

impl std::error::Error for UnknownAirportError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProblemError {
    DuplicateAirport(AirportCode),
    DuplicateFlight(FlightIdentifier),
    DuplicateOrder(OrderIdentifier),
    UnknownAirport(UnknownAirportError),
}

impl std::fmt::Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemError::DuplicateAirport(code) => write!(f, "Duplicate airport {}", code),
            ProblemError::DuplicateFlight(id) => write!(f, "Duplicate flight {}", id),
            ProblemError::DuplicateOrder(id) => write!(f, "Duplicate order {}", id),
            ProblemError::UnknownAirport(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProblemError {}

impl From<UnknownAirportError> for ProblemError {
    fn from(err: UnknownAirportError) -> Self {
        ProblemError::UnknownAirport(err)
    }
}
