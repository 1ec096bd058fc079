use std::collections::BTreeMap;

use crate::{PeriodLabel, PeriodTotals};

/// Pass/fail per anchor year plus the overall verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub passes:       BTreeMap<PeriodLabel, bool>,
    pub overall_pass: bool,
}

/// A period passes when its total reaches `min_days`.
///
/// The overall verdict requires every period to pass and at least one
/// period to exist: an empty calculation never passes.
pub fn evaluate(totals: &PeriodTotals, min_days: u32) -> Evaluation {
    let passes: BTreeMap<PeriodLabel, bool> = totals
        .iter()
        .map(|(label, total)| (*label, *total >= min_days))
        .collect();
    let overall_pass = !passes.is_empty() && passes.values().all(|pass| *pass);

    Evaluation { passes, overall_pass }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(entries: &[(i32, u32)]) -> PeriodTotals {
        entries
            .iter()
            .map(|(year, days)| (PeriodLabel::new(*year), *days))
            .collect()
    }

    #[test]
    fn test_threshold_cases() {
        struct TestCase {
            totals:      PeriodTotals,
            min_days:    u32,
            overall:     bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                totals:      totals(&[(2022, 16), (2023, 167)]),
                min_days:    183,
                overall:     false,
                description: "both periods short",
            },
            TestCase {
                totals:      totals(&[(2022, 183), (2023, 200)]),
                min_days:    183,
                overall:     true,
                description: "exactly at threshold passes",
            },
            TestCase {
                totals:      totals(&[(2022, 183), (2023, 182)]),
                min_days:    183,
                overall:     false,
                description: "one short period fails overall",
            },
            TestCase {
                totals:      totals(&[(2022, 1)]),
                min_days:    0,
                overall:     true,
                description: "zero threshold always passes",
            },
            TestCase {
                totals:      PeriodTotals::new(),
                min_days:    0,
                overall:     false,
                description: "no periods never passes",
            },
        ];

        for case in &cases {
            let evaluation = evaluate(&case.totals, case.min_days);
            assert_eq!(evaluation.overall_pass, case.overall, "{}", case.description);
            assert_eq!(evaluation.passes.len(), case.totals.len(), "{}", case.description);
        }
    }

    #[test]
    fn test_per_period_passes() {
        let evaluation = evaluate(&totals(&[(2022, 16), (2023, 190)]), 183);
        assert!(!evaluation.passes[&PeriodLabel::new(2022)]);
        assert!(evaluation.passes[&PeriodLabel::new(2023)]);
        assert!(!evaluation.overall_pass);
    }

    #[test]
    fn test_raising_threshold_never_turns_fail_into_pass() {
        let fixed = totals(&[(2019, 0), (2020, 90), (2021, 183), (2022, 250), (2023, 366)]);

        for low in 0..=370 {
            let lower = evaluate(&fixed, low);
            let higher = evaluate(&fixed, low + 1);
            for (label, passed_higher) in &higher.passes {
                if *passed_higher {
                    assert!(lower.passes[label], "{label} passed at {} but not at {low}", low + 1);
                }
            }
            assert!(!higher.overall_pass || lower.overall_pass);
        }
    }
}
