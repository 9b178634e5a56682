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
use freight_alloc_model::prelude::{AirportCode, FlightIdentifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsufficientStorageError {
    code: AirportCode,
    requested: Quantity,
    available: Quantity,
}

impl InsufficientStorageError {
    pub fn new(code: AirportCode, requested: Quantity, available: Quantity) -> Self {
        Self {
            code,
            requested,
            available,
        }
    }

    pub fn code(&self) -> &AirportCode {
        &self.code
    }

    pub fn requested(&self) -> Quantity {
        self.requested
    }

    pub fn available(&self) -> Quantity {
        self.available
    }
}

impl std::fmt::Display for InsufficientStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Airport {} cannot hold {} more units ({} available)",
            self.code, self.requested, self.available
        )
    }
}

impl std::error::Error for InsufficientStorageError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownFlightError(pub FlightIdentifier);

impl std::fmt::Display for UnknownFlightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Flight {} is not part of the problem", self.0)
    }
}

impl std::error::Error for UnknownFlightError {}
