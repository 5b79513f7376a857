//! Boundary checks applied before a command string is built.
//!
//! Every helper returns `AwgError::InvalidParameter` naming the offending
//! parameter, so a rejected call never reaches the session.

use std::fmt::Display;
use std::net::IpAddr;
use std::ops::RangeInclusive;

use crate::error::{AwgError, AwgResult};

/// Validates if a given u16 value is a usable port number.
/// By type, the port is already within the 0-65535 range.
/// This function checks that the port is not 0, which is reserved.
///
/// # Arguments
///
/// * `port` - The u16 value to validate.
///
/// # Returns
///
/// * `Ok(())` if the port is valid.
/// * `Err(AwgError::InvalidParameter)` if the port is 0.
pub fn is_valid_port(port: u16) -> AwgResult<()> {
    if port > 0 {
        Ok(())
    } else {
        Err(AwgError::invalid("port number must be greater than 0"))
    }
}

/// Validates that `ip` is a literal IPv4 or IPv6 address.
///
/// # Arguments
///
/// * `ip` - The string to validate.
///
/// # Returns
///
/// * `Ok(())` if the IP address is valid.
/// * `Err(AwgError::InvalidParameter)` otherwise.
pub fn is_valid_ip(ip: &str) -> AwgResult<()> {
    ip.parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| AwgError::invalid(format!("invalid IP address '{ip}'")))
}

/// Validates an instrument mass-storage path.
///
/// Paths travel inside a quoted SCPI string, so they must be non-empty and
/// must not contain NUL or line terminators.
pub fn is_valid_path(path: &str) -> AwgResult<()> {
    if path.is_empty() {
        return Err(AwgError::invalid("file path cannot be empty"));
    }
    if path.contains(['\0', '\n', '\r']) {
        return Err(AwgError::invalid(format!(
            "file path {path:?} contains a control character"
        )));
    }
    Ok(())
}

/// Validates that `value` lies within `range`.
///
/// # Arguments
///
/// * `name` - Parameter name used in the error message.
/// * `value` - The value to validate.
/// * `range` - The inclusive range to validate against.
pub fn is_in_range<T>(name: &str, value: T, range: RangeInclusive<T>) -> AwgResult<()>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(AwgError::invalid(format!(
            "{name} {value} is outside {}..={}",
            range.start(),
            range.end()
        )))
    }
}

/// Validates that a float is finite and within `range`.
pub fn is_finite_in_range(name: &str, value: f64, range: RangeInclusive<f64>) -> AwgResult<()> {
    if !value.is_finite() {
        return Err(AwgError::invalid(format!("{name} must be finite, got {value}")));
    }
    is_in_range(name, value, range)
}

/// Validates that a float is finite.
pub fn is_finite(name: &str, value: f64) -> AwgResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AwgError::invalid(format!("{name} must be finite, got {value}")))
    }
}

/// Validates if a given string is not empty.
pub fn is_not_empty(name: &str, value: &str) -> AwgResult<()> {
    if !value.is_empty() {
        Ok(())
    } else {
        Err(AwgError::invalid(format!("{name} cannot be empty")))
    }
}

/// Validates that `value` has at most `max` characters.
pub fn max_chars(name: &str, value: &str, max: usize) -> AwgResult<()> {
    let count = value.chars().count();
    if count <= max {
        Ok(())
    } else {
        Err(AwgError::invalid(format!(
            "{name} is {count} characters long; maximum is {max}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports() {
        assert!(is_valid_port(5025).is_ok());
        assert!(is_valid_port(0).is_err());
    }

    #[test]
    fn ip_addresses() {
        assert!(is_valid_ip("192.168.1.50").is_ok());
        assert!(is_valid_ip("::1").is_ok());
        assert!(is_valid_ip("192.168.1").is_err());
        assert!(is_valid_ip("awg.local").is_err());
    }

    #[test]
    fn paths() {
        assert!(is_valid_path(r"C:\Temp\wave.bin").is_ok());
        assert!(is_valid_path("").is_err());
        assert!(is_valid_path("a\nb").is_err());
    }

    #[test]
    fn ranges_name_the_parameter() {
        assert!(is_in_range("ESE", 255u16, 0..=255).is_ok());
        let err = is_in_range("ESE", 256u16, 0..=255).unwrap_err();
        assert_eq!(err.to_string(), "invalid parameter: ESE 256 is outside 0..=255");
        assert!(is_finite_in_range("scale", f64::NAN, 0.0..=1.0).is_err());
        assert!(is_finite("offset", f64::INFINITY).is_err());
    }

    #[test]
    fn lengths() {
        assert!(max_chars("name", &"a".repeat(32), 32).is_ok());
        assert!(max_chars("name", &"a".repeat(33), 32).is_err());
        assert!(is_not_empty("name", "").is_err());
    }
}
