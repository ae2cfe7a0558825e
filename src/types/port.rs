// ABOUTME: TCP port number validation.
// ABOUTME: Rejects port 0 so a configured port is always bindable by number.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortError {
    #[error("port must be between 1 and 65535, got {0}")]
    OutOfRange(i64),
}

/// A TCP port in the range 1–65535.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Port(u16);

impl Port {
    /// Port used by generated configs.
    pub const DEV_SERVER: Port = Port(8000);

    pub fn new(value: i64) -> Result<Self, PortError> {
        match u16::try_from(value) {
            Ok(0) | Err(_) => Err(PortError::OutOfRange(value)),
            Ok(port) => Ok(Self(port)),
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Port {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> Deserialize<'de> for Port {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Port::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_range() {
        assert_eq!(Port::new(1).unwrap().get(), 1);
        assert_eq!(Port::new(8080).unwrap().get(), 8080);
        assert_eq!(Port::new(65535).unwrap().get(), 65535);
    }

    #[test]
    fn rejects_zero_and_out_of_range() {
        assert_eq!(Port::new(0), Err(PortError::OutOfRange(0)));
        assert_eq!(Port::new(65536), Err(PortError::OutOfRange(65536)));
        assert_eq!(Port::new(-1), Err(PortError::OutOfRange(-1)));
    }

    #[test]
    fn try_from_u16_rejects_zero() {
        assert!(Port::try_from(0u16).is_err());
        assert!(Port::try_from(443u16).is_ok());
    }
}
