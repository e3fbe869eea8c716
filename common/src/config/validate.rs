pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Checks that `value` lies in `min..=max`, naming the field in the error.
pub fn ensure_in_range(field: &str, value: u64, min: u64, max: u64) -> Result<(), String> {
    if value < min || value > max {
        return Err(format!("{} must be between {} and {}, got {}", field, min, max, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert!(ensure_in_range("timeout", 10, 10, 3600).is_ok());
        assert!(ensure_in_range("timeout", 3600, 10, 3600).is_ok());
    }

    #[test]
    fn test_out_of_range_names_the_field() {
        let err = ensure_in_range("timeout", 9, 10, 3600).unwrap_err();
        assert_eq!(err, "timeout must be between 10 and 3600, got 9");
    }
}
