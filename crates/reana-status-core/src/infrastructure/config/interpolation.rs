//! `${VAR}` / `${VAR:-default}` expansion for configuration values.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpolationError {
    #[error("Required environment variable not found: {0}")]
    RequiredVarNotFound(String),

    #[error("Recursive interpolation limit exceeded")]
    RecursionLimit,
}

pub type InterpolationResult<T> = Result<T, InterpolationError>;

/// Expansion passes before a value that keeps producing references is rejected
const MAX_PASSES: usize = 10;

/// Defaults cannot contain `$`, `{` or `}`, so the innermost reference of a
/// nested default such as `${A:-${B}/users}` is matched first.
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^${}]*))?\}").expect("Invalid regex pattern")
});

/// Expand references until the text is stable, innermost first
pub fn interpolate(input: &str) -> InterpolationResult<String> {
    let mut result = input.to_string();

    for _ in 0..MAX_PASSES {
        if !VAR_PATTERN.is_match(&result) {
            return Ok(result);
        }
        result = expand_once(&result)?;
    }

    if VAR_PATTERN.is_match(&result) {
        return Err(InterpolationError::RecursionLimit);
    }
    Ok(result)
}

fn expand_once(input: &str) -> InterpolationResult<String> {
    let mut output = String::with_capacity(input.len());
    let mut last_end = 0;

    for captures in VAR_PATTERN.captures_iter(input) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let var_name = &captures[1];

        output.push_str(&input[last_end..whole.start()]);

        let value = match std::env::var(var_name) {
            Ok(value) => value,
            Err(_) => match captures.get(2) {
                Some(default) => default.as_str().to_string(),
                None => return Err(InterpolationError::RequiredVarNotFound(var_name.to_string())),
            },
        };

        output.push_str(&value);
        last_end = whole.end();
    }

    output.push_str(&input[last_end..]);
    Ok(output)
}

pub fn interpolate_toml(value: &mut toml::Value) -> InterpolationResult<()> {
    match value {
        toml::Value::String(s) => {
            *s = interpolate(s)?;
        }
        toml::Value::Array(arr) => {
            for item in arr {
                interpolate_toml(item)?;
            }
        }
        toml::Value::Table(table) => {
            for (_, v) in table.iter_mut() {
                interpolate_toml(v)?;
            }
        }
        _ => {}
    }
    Ok(())
}
