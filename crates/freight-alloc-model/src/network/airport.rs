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
    common::AirportCode,
    network::err::{
        AirportError, CoordinateError, GmtOffsetOutOfRangeError, InvalidAirportCodeError,
        ZeroStorageCapacityError,
    },
};
use freight_alloc_core::prelude::Quantity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Continent {
    America,
    Europe,
    Asia,
    Africa,
    Oceania,
}

impl Continent {
    pub const SAME_CONTINENT_DEADLINE_HOURS: i64 = 48;
    pub const INTERCONTINENTAL_DEADLINE_HOURS: i64 = 72;

    /// Delivery promise between an airport on `self` and one on `other`.
    #[inline]
    pub fn deadline_hours(self, other: Continent) -> i64 {
        if self == other {
            Self::SAME_CONTINENT_DEADLINE_HOURS
        } else {
            Self::INTERCONTINENTAL_DEADLINE_HOURS
        }
    }
}

impl std::fmt::Display for Continent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Continent::America => "America",
            Continent::Europe => "Europe",
            Continent::Asia => "Asia",
            Continent::Africa => "Africa",
            Continent::Oceania => "Oceania",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::OutOfRange(format!("latitude {}", latitude)));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::OutOfRange(format!(
                "longitude {}",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parses both components with [`parse_coordinate`] and validates the ranges.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, CoordinateError> {
        Self::new(parse_coordinate(latitude)?, parse_coordinate(longitude)?)
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Converts a decimal or degrees/minutes/seconds coordinate into decimal degrees.
///
/// Accepted shapes: `-4.702222`, `04°42'08"S` and `04 42 08 S`.
/// Southern and western hemispheres yield negative values.
pub fn parse_coordinate(raw: &str) -> Result<f64, CoordinateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoordinateError::Unparseable(raw.to_string()));
    }
    if let Ok(decimal) = trimmed.parse::<f64>() {
        return Ok(decimal);
    }

    let unparseable = || CoordinateError::Unparseable(raw.to_string());
    let hemisphere = trimmed.chars().last().ok_or_else(unparseable)?;
    let sign = match hemisphere.to_ascii_uppercase() {
        'N' | 'E' => 1.0,
        'S' | 'W' => -1.0,
        _ => return Err(unparseable()),
    };

    let body = &trimmed[..trimmed.len() - hemisphere.len_utf8()];
    let parts: Vec<&str> = body
        .split(|c: char| c == '°' || c == '\'' || c == '"' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    let [deg, min, sec] = parts.as_slice() else {
        return Err(unparseable());
    };

    let degrees: u32 = deg.parse().map_err(|_| unparseable())?;
    let minutes: u32 = min.parse().map_err(|_| unparseable())?;
    let seconds: f64 = sec.parse().map_err(|_| unparseable())?;
    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return Err(CoordinateError::OutOfRange(raw.to_string()));
    }

    Ok(sign * (degrees as f64 + minutes as f64 / 60.0 + seconds / 3600.0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    code: AirportCode,
    storage_capacity: Quantity,
    gmt_offset_hours: i32,
    continent: Continent,
    coordinates: Option<Coordinates>,
}

impl Airport {
    pub fn new(
        code: &str,
        storage_capacity: Quantity,
        gmt_offset_hours: i32,
        continent: Continent,
    ) -> Result<Self, AirportError> {
        let trimmed = code.trim();
        if !(3..=4).contains(&trimmed.len()) || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(InvalidAirportCodeError::new(code))?;
        }
        let code = AirportCode::from(trimmed);
        if storage_capacity == 0 {
            return Err(ZeroStorageCapacityError::new(code))?;
        }
        if !(-12..=14).contains(&gmt_offset_hours) {
            return Err(GmtOffsetOutOfRangeError::new(code, gmt_offset_hours))?;
        }
        Ok(Self {
            code,
            storage_capacity,
            gmt_offset_hours,
            continent,
            coordinates: None,
        })
    }

    #[inline]
    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    #[inline]
    pub fn code(&self) -> &AirportCode {
        &self.code
    }

    #[inline]
    pub fn storage_capacity(&self) -> Quantity {
        self.storage_capacity
    }

    #[inline]
    pub fn gmt_offset_hours(&self) -> i32 {
        self.gmt_offset_hours
    }

    #[inline]
    pub fn continent(&self) -> Continent {
        self.continent
    }

    #[inline]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }
}

impl std::fmt::Display for Airport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}, storage {}, GMT{:+}]",
            self.code.as_str(),
            self.continent,
            self.storage_capacity,
            self.gmt_offset_hours
        )
    }
}
