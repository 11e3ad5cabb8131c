//! Parsing of wall-clock limits given on the command line.

use std::time::Duration;

/// Parse a duration such as `"90"`, `"45s"`, `"1h 30m"` or `"500ms"`.
///
/// Accepts the same humantime syntax as `simulator.timeout` in the YAML
/// configuration, plus a bare number taken as seconds. Zero is rejected: a
/// trial limit of zero would fail every trial.
///
/// ```
/// use slpsweep::utils::duration::parse_timeout;
/// use std::time::Duration;
///
/// assert_eq!(parse_timeout("30m"), Ok(Duration::from_secs(1800)));
/// assert_eq!(parse_timeout("1h 30m"), Ok(Duration::from_secs(5400)));
/// assert!(parse_timeout("0").is_err());
/// ```
pub fn parse_timeout(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let duration = match value.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(value)
            .map_err(|e| format!("Invalid duration '{}': {}", value, e))?,
    };

    if duration.is_zero() {
        return Err(format!("Duration must be greater than zero: {}", value));
    }
    Ok(duration)
}
