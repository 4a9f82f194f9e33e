// src/core/judgment/factory.rs
//
// Strategy registry keyed by the `judgment_method` config value.

use super::pitch_distribution::PitchDistributionStrategy;
use super::strategy::JudgmentStrategy;
use super::two_stage::TwoStageStrategy;
use crate::error::{ChordcheckrError, Result};

/// Names accepted by `create_strategy`, default first
pub fn available_strategies() -> Vec<&'static str> {
    vec![TwoStageStrategy::NAME, PitchDistributionStrategy::NAME]
}

/// Build a fresh strategy instance for `name`.
///
/// Unknown names are an error; there is no fallback strategy.
pub fn create_strategy(name: &str) -> Result<Box<dyn JudgmentStrategy>> {
    match name {
        TwoStageStrategy::NAME => Ok(Box::new(TwoStageStrategy)),
        PitchDistributionStrategy::NAME => Ok(Box::new(PitchDistributionStrategy)),
        _ => Err(ChordcheckrError::UnknownStrategy {
            name: name.to_string(),
            available: available_strategies(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_name_resolves() {
        for name in available_strategies() {
            let strategy = create_strategy(name).unwrap();
            assert_eq!(strategy.name(), name);
        }
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let err = create_strategy("nonexistent_method").err().unwrap();
        match err {
            ChordcheckrError::UnknownStrategy { name, available } => {
                assert_eq!(name, "nonexistent_method");
                assert!(available.contains(&"two_stage"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(create_strategy("Two_Stage").is_err());
        assert!(create_strategy("").is_err());
    }
}
