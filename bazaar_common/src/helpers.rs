use std::str::FromStr;

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Parse a value of type `T` from an optional string. Missing or unparseable values yield `Err` with a message that
/// can be logged by the caller before it falls back to a default.
pub fn parse_value<T>(value: Option<String>) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = value.ok_or_else(|| "value is not set".to_string())?;
    value.trim().parse::<T>().map_err(|e| format!("'{value}' is invalid. {e}"))
}
