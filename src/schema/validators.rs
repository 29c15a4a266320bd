//! Reusable field validators
//!
//! These validators are composed into [`FieldSchema`](super::FieldSchema)
//! declarations. A validator checks one constraint and reports a
//! human-readable message; type mismatches are passed through so the
//! dedicated type validator reports them instead of every constraint firing
//! at once.

use regex::Regex;
use serde_json::Value;

/// Validator: field is required (not null)
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_null() {
            Err(format!("Le champ '{}' est requis", field))
        } else {
            Ok(())
        }
    }
}

/// Validator: field is optional (always valid)
pub fn optional() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, _: &Value| Ok(())
}

/// Validator: number must be positive
pub fn positive() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num <= 0.0 {
                Err(format!(
                    "Le champ '{}' doit être positif (valeur: {})",
                    field, num
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: number must be at least the given minimum
pub fn min_value(min: f64) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num < min {
                Err(format!(
                    "'{}' doit être au moins {} (valeur: {})",
                    field, min, num
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: number must not exceed maximum
pub fn max_value(max: f64) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num > max {
                Err(format!(
                    "'{}' ne doit pas dépasser {} (valeur: {})",
                    field, max, num
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be an integer
pub fn integer() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_null() || value.is_i64() || value.is_u64() {
            Ok(())
        } else {
            Err(format!("'{}' doit être un nombre entier", field))
        }
    }
}

/// Validator: string length must be within range
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            let len = s.len();
            if len < min {
                Err(format!(
                    "'{}' doit avoir au moins {} caractères (actuellement: {})",
                    field, min, len
                ))
            } else if len > max {
                Err(format!(
                    "'{}' ne doit pas dépasser {} caractères (actuellement: {})",
                    field, max, len
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string must not be empty
pub fn non_empty() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if s.is_empty() {
                Err(format!("Le champ '{}' ne doit pas être vide", field))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if !allowed.contains(&s.to_string()) {
                Err(format!(
                    "'{}' doit être l'une des valeurs: {:?} (valeur actuelle: {})",
                    field, allowed, s
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string must match the given pattern
pub fn matches(pattern: Regex) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if !pattern.is_match(s) {
                Err(format!(
                    "'{}' ne respecte pas le format attendu (valeur actuelle: {})",
                    field, s
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string must be a valid UUID
pub fn uuid_format() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            match uuid::Uuid::parse_str(s) {
                Ok(_) => Ok(()),
                Err(_) => Err(format!(
                    "'{}' doit être un UUID valide (valeur actuelle: {})",
                    field, s
                )),
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: date must match format
pub fn date_format(
    format: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            match chrono::NaiveDate::parse_from_str(s, format) {
                Ok(_) => Ok(()),
                Err(_) => Err(format!(
                    "'{}' doit être au format {} (valeur actuelle: {})",
                    field, format, s
                )),
            }
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === required() ===

    #[test]
    fn test_required_null_value_returns_error() {
        let v = required();
        let result = v("name", &json!(null));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("requis"));
    }

    #[test]
    fn test_required_string_value_returns_ok() {
        let v = required();
        assert!(v("name", &json!("hello")).is_ok());
    }

    #[test]
    fn test_required_empty_string_returns_ok() {
        let v = required();
        assert!(v("name", &json!("")).is_ok());
    }

    #[test]
    fn test_required_object_value_returns_ok() {
        let v = required();
        assert!(v("data", &json!({"key": "val"})).is_ok());
    }

    // === optional() ===

    #[test]
    fn test_optional_always_ok_for_null() {
        let v = optional();
        assert!(v("field", &json!(null)).is_ok());
    }

    // === positive() ===

    #[test]
    fn test_positive_negative_number_returns_error() {
        let v = positive();
        let result = v("price", &json!(-5.0));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("positif"));
    }

    #[test]
    fn test_positive_zero_returns_error() {
        let v = positive();
        assert!(v("price", &json!(0.0)).is_err());
    }

    #[test]
    fn test_positive_non_number_passthrough() {
        let v = positive();
        assert!(v("name", &json!("hello")).is_ok());
    }

    // === min_value() ===

    #[test]
    fn test_min_value_under_returns_error() {
        let v = min_value(0.0);
        let result = v("age", &json!(-1));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("au moins 0"));
    }

    #[test]
    fn test_min_value_equal_returns_ok() {
        let v = min_value(0.0);
        assert!(v("age", &json!(0)).is_ok());
    }

    #[test]
    fn test_min_value_over_returns_ok() {
        let v = min_value(18.0);
        assert!(v("age", &json!(42)).is_ok());
    }

    #[test]
    fn test_min_value_non_number_passthrough() {
        let v = min_value(3.0);
        assert!(v("name", &json!("ab")).is_ok());
    }

    // === max_value() ===

    #[test]
    fn test_max_value_over_returns_error() {
        let v = max_value(100.0);
        let result = v("score", &json!(101.0));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("dépasser 100"));
    }

    #[test]
    fn test_max_value_equal_returns_ok() {
        let v = max_value(100.0);
        assert!(v("score", &json!(100.0)).is_ok());
    }

    // === integer() ===

    #[test]
    fn test_integer_whole_number_returns_ok() {
        let v = integer();
        assert!(v("age", &json!(42)).is_ok());
    }

    #[test]
    fn test_integer_negative_whole_number_returns_ok() {
        let v = integer();
        assert!(v("age", &json!(-3)).is_ok());
    }

    #[test]
    fn test_integer_float_returns_error() {
        let v = integer();
        let result = v("age", &json!(3.5));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("entier"));
    }

    #[test]
    fn test_integer_string_returns_error() {
        let v = integer();
        assert!(v("age", &json!("42")).is_err());
    }

    #[test]
    fn test_integer_null_passthrough() {
        let v = integer();
        assert!(v("age", &json!(null)).is_ok());
    }

    // === string_length() ===

    #[test]
    fn test_string_length_too_short_returns_error() {
        let v = string_length(3, 50);
        let result = v("name", &json!("ab"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("au moins 3"));
    }

    #[test]
    fn test_string_length_too_long_returns_error() {
        let v = string_length(1, 5);
        let result = v("name", &json!("abcdef"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("dépasser 5"));
    }

    #[test]
    fn test_string_length_exact_min_returns_ok() {
        let v = string_length(3, 10);
        assert!(v("name", &json!("abc")).is_ok());
    }

    #[test]
    fn test_string_length_non_string_passthrough() {
        let v = string_length(5, 10);
        assert!(v("age", &json!(42)).is_ok());
    }

    // === non_empty() ===

    #[test]
    fn test_non_empty_empty_string_returns_error() {
        let v = non_empty();
        let result = v("name", &json!(""));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("vide"));
    }

    #[test]
    fn test_non_empty_string_returns_ok() {
        let v = non_empty();
        assert!(v("name", &json!("Couscous")).is_ok());
    }

    #[test]
    fn test_non_empty_non_string_passthrough() {
        let v = non_empty();
        assert!(v("count", &json!(0)).is_ok());
    }

    // === in_list() ===

    #[test]
    fn test_in_list_value_in_list_returns_ok() {
        let v = in_list(vec!["pending".into(), "delivered".into(), "cancelled".into()]);
        assert!(v("status", &json!("pending")).is_ok());
    }

    #[test]
    fn test_in_list_value_not_in_list_returns_error() {
        let v = in_list(vec!["pending".into(), "delivered".into()]);
        let result = v("status", &json!("eaten"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("valeurs"));
    }

    // === matches() ===

    #[test]
    fn test_matches_pattern_ok() {
        let v = matches(Regex::new(r"^[A-Z]{2}-\d{4}$").unwrap());
        assert!(v("code", &json!("FR-1234")).is_ok());
    }

    #[test]
    fn test_matches_pattern_mismatch_returns_error() {
        let v = matches(Regex::new(r"^[A-Z]{2}-\d{4}$").unwrap());
        let result = v("code", &json!("1234-FR"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("format"));
    }

    #[test]
    fn test_matches_non_string_passthrough() {
        let v = matches(Regex::new(r"^\d+$").unwrap());
        assert!(v("code", &json!(42)).is_ok());
    }

    // === uuid_format() ===

    #[test]
    fn test_uuid_format_valid() {
        let v = uuid_format();
        assert!(v("id", &json!(uuid::Uuid::new_v4().to_string())).is_ok());
    }

    #[test]
    fn test_uuid_format_invalid_returns_error() {
        let v = uuid_format();
        let result = v("id", &json!("not-a-uuid"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("UUID"));
    }

    // === date_format() ===

    #[test]
    fn test_date_format_valid_date_returns_ok() {
        let v = date_format("%Y-%m-%d");
        assert!(v("delivery_date", &json!("2024-01-15")).is_ok());
    }

    #[test]
    fn test_date_format_invalid_date_returns_error() {
        let v = date_format("%Y-%m-%d");
        let result = v("delivery_date", &json!("not-a-date"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("format"));
    }

    #[test]
    fn test_date_format_non_string_passthrough() {
        let v = date_format("%Y-%m-%d");
        assert!(v("delivery_date", &json!(12345)).is_ok());
    }
}
