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

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroTabuListSize,
    ZeroIterations,
    ProbabilityOutOfRange { name: &'static str, value: u32 },
    InvalidWeight { name: &'static str, value: f64 },
    InvalidFraction { name: &'static str, value: f64 },
    TenureBounds { floor: usize, ceiling: usize },
    ZeroCandidates,
    InvalidHub(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroTabuListSize => write!(f, "Tabu list size must be positive"),
            ConfigError::ZeroIterations => write!(f, "Iteration limits must be positive"),
            ConfigError::ProbabilityOutOfRange { name, value } => {
                write!(f, "{} must be a percentage in 0..=100, got {}", name, value)
            }
            ConfigError::InvalidWeight { name, value } => {
                write!(f, "{} must be finite and non-negative, got {}", name, value)
            }
            ConfigError::InvalidFraction { name, value } => {
                write!(f, "{} must lie in (0, 1], got {}", name, value)
            }
            ConfigError::TenureBounds { floor, ceiling } => write!(
                f,
                "Tenure floor {} must be positive and not exceed ceiling {}",
                floor, ceiling
            ),
            ConfigError::ZeroCandidates => {
                write!(f, "Neighborhood must allow at least one candidate")
            }
            ConfigError::InvalidHub(code) => write!(f, "Invalid hub code '{}'", code),
        }
    }
}

impl std::error::Error for ConfigError {}
