//! Boundary validation helpers
//!
//! Invalid records are excluded from calculations rather than rejected:
//! batch helpers drop them with a warning, single-record callers that need
//! a hard failure use [`ensure_valid`].

use std::fmt::Debug;

use validator::Validate;

use crate::error::PricingStrategyResult;

/// Whether `record` passes validation, logging the failure when it does not
pub fn is_valid<T: Validate + Debug>(kind: &str, record: &T) -> bool {
    match record.validate() {
        Ok(()) => true,
        Err(errors) => {
            tracing::warn!(kind, ?record, %errors, "Dropping invalid record");
            false
        }
    }
}

/// Keep the records that pass validation, in order
pub fn retain_valid<T: Validate + Debug>(kind: &str, records: Vec<T>) -> Vec<T> {
    records
        .into_iter()
        .filter(|record| is_valid(kind, record))
        .collect()
}

pub fn ensure_valid<T: Validate>(record: &T) -> PricingStrategyResult<()> {
    record.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingStrategyError;
    use crate::models::{Competitor, SegmentInput, ValueFactor};

    #[test]
    fn test_retain_valid_drops_out_of_range_records() {
        let competitors = vec![
            Competitor::new("Acme", 49.0),
            Competitor::new("Free Tier", 0.0),
            Competitor::new("Globex", 55.0).with_attribute("quality", 12.0),
            Competitor::new("Initech", 61.0).with_attribute("quality", 7.0),
        ];

        let kept = retain_valid("competitor", competitors);
        let names: Vec<_> = kept.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Acme", "Initech"]);
    }

    #[test]
    fn test_value_factor_ranges() {
        assert!(is_valid("value factor", &ValueFactor::new("Support", 1.0, 10.0)));
        assert!(!is_valid("value factor", &ValueFactor::new("Support", 0.5, 5.0)));
        assert!(!is_valid("value factor", &ValueFactor::new("", 5.0, 5.0)));
    }

    #[test]
    fn test_ensure_valid_maps_to_invalid_input() {
        let result = ensure_valid(&SegmentInput::new("Students", 0.0, 8.0));
        assert!(matches!(result, Err(PricingStrategyError::InvalidInput(_))));
        assert!(ensure_valid(&SegmentInput::new("Students", 20.0, 8.0)).is_ok());
    }
}
