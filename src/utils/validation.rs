//! Validation utilities for raw reconciliation requests

use crate::config::ReconciliationConfig;
use crate::types::*;

/// Validate that a request carries movements, unless configured otherwise
pub fn validate_movement_count(count: usize, config: &ReconciliationConfig) -> DomainResult<()> {
    if count == 0 && !config.allow_empty_movements {
        return Err(DomainError::InvalidRequest(
            "Movements array can not be empty.".to_string(),
        ));
    }
    Ok(())
}

/// Validate that a request carries enough balances to build a period
pub fn validate_balance_count(count: usize, config: &ReconciliationConfig) -> DomainResult<()> {
    if count == 0 {
        return Err(DomainError::InvalidRequest(
            "Balances array can not be empty.".to_string(),
        ));
    }

    if count < config.min_checkpoints {
        return Err(DomainError::InvalidRequest(format!(
            "Balances must represent at least {} statements at differents dates.",
            config.min_checkpoints
        )));
    }

    Ok(())
}

/// Prefix an error with the position of the offending item, e.g. `movements[3]`
pub fn at_position(error: DomainError, field: &str, index: usize) -> DomainError {
    let locate = |message: String| format!("{field}[{index}]: {message}");

    match error {
        DomainError::InvalidAmount(m) => DomainError::InvalidAmount(locate(m)),
        DomainError::InvalidDate(m) => DomainError::InvalidDate(locate(m)),
        DomainError::InvalidLabel(m) => DomainError::InvalidLabel(locate(m)),
        DomainError::InvalidTransaction(m) => DomainError::InvalidTransaction(locate(m)),
        DomainError::InvalidCheckpoint(m) => DomainError::InvalidCheckpoint(locate(m)),
        DomainError::InvalidRequest(m) => DomainError::InvalidRequest(locate(m)),
        other @ DomainError::Json(_) => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_count() {
        let config = ReconciliationConfig::default();
        assert!(validate_movement_count(0, &config).is_err());
        assert!(validate_movement_count(1, &config).is_ok());

        let lenient = ReconciliationConfig {
            allow_empty_movements: true,
            ..ReconciliationConfig::default()
        };
        assert!(validate_movement_count(0, &lenient).is_ok());
    }

    #[test]
    fn test_balance_count() {
        let config = ReconciliationConfig::default();

        let empty = validate_balance_count(0, &config).unwrap_err();
        assert_eq!(empty.to_string(), "Invalid request: Balances array can not be empty.");

        let single = validate_balance_count(1, &config).unwrap_err();
        assert!(single.to_string().contains("at least 2 statements"));

        assert!(validate_balance_count(2, &config).is_ok());
    }

    #[test]
    fn test_at_position_keeps_variant() {
        let error = at_position(
            DomainError::InvalidLabel("Label cannot be empty".to_string()),
            "movements",
            3,
        );
        assert!(matches!(error, DomainError::InvalidLabel(_)));
        assert_eq!(
            error.to_string(),
            "Invalid label: movements[3]: Label cannot be empty"
        );
    }
}
