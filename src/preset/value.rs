// src/preset/value.rs

//! Checking user-supplied parameter values against their declaration.

use crate::config::model::{ParamConfig, ParamKind};

impl ParamConfig {
    /// Check that `value` is acceptable for this parameter.
    ///
    /// Returns a human readable reason on failure.
    pub fn check_value(&self, value: &str) -> Result<(), String> {
        match self.kind {
            ParamKind::Number | ParamKind::Slider => self.check_number(value),
            ParamKind::Boolean => match value.trim() {
                "true" | "false" => Ok(()),
                other => Err(format!("expected true or false, got '{other}'")),
            },
            ParamKind::Select => self.check_option(value),
            ParamKind::Multiselect => value
                .split(',')
                .map(str::trim)
                .try_for_each(|item| self.check_option(item)),
            ParamKind::Time => {
                if is_valid_time(value) {
                    Ok(())
                } else {
                    Err(format!(
                        "expected a time like HH:MM:SS or a number of seconds, got '{value}'"
                    ))
                }
            }
            ParamKind::String
            | ParamKind::File
            | ParamKind::Color
            | ParamKind::Directory => Ok(()),
        }
    }

    fn check_number(&self, value: &str) -> Result<(), String> {
        let n: f64 = value
            .trim()
            .parse()
            .map_err(|_| format!("expected a number, got '{value}'"))?;

        if !n.is_finite() {
            return Err(format!("expected a finite number, got '{value}'"));
        }
        if let Some(min) = self.min {
            if n < min {
                return Err(format!("{n} is below the minimum of {min}"));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(format!("{n} is above the maximum of {max}"));
            }
        }
        Ok(())
    }

    fn check_option(&self, value: &str) -> Result<(), String> {
        if self.options.iter().any(|o| o.value.to_string() == value) {
            return Ok(());
        }
        let allowed: Vec<String> = self.options.iter().map(|o| o.value.to_string()).collect();
        Err(format!(
            "'{value}' is not one of the allowed values: {}",
            allowed.join(", ")
        ))
    }
}

/// Accepts `SS[.frac]`, `MM:SS[.frac]` and `HH:MM:SS[.frac]`, the forms
/// ffmpeg understands for `-ss` / `-t`.
fn is_valid_time(value: &str) -> bool {
    let parts: Vec<&str> = value.trim().split(':').collect();
    let Some((seconds, leading)) = parts.split_last() else {
        return false;
    };
    if leading.len() > 2 {
        return false;
    }

    let seconds_ok = !seconds.starts_with(['+', '-'])
        && seconds
            .parse::<f64>()
            .is_ok_and(|s| s.is_finite() && s >= 0.0 && (leading.is_empty() || s < 60.0));
    if !seconds_ok {
        return false;
    }

    let fields: Option<Vec<u64>> = leading
        .iter()
        .map(|p| {
            if !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()) {
                p.parse().ok()
            } else {
                None
            }
        })
        .collect();

    match fields.as_deref() {
        Some([]) => true,
        Some([minutes]) | Some([_, minutes]) => *minutes < 60,
        _ => false,
    }
}
