use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matcher::{Matcher, Tier};
use crate::model::SuggestionList;

/// Input paired with the exact suggestion list it must produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalCase {
    pub case_id: String,
    pub input: String,
    #[serde(default)]
    pub expected: SuggestionList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOutcome {
    pub case_id: String,
    pub passed: bool,
    pub tier: Option<Tier>,
    pub actual: SuggestionList,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f32,
    pub outcomes: Vec<EvalOutcome>,
}

impl EvalSummary {
    pub fn meets(&self, required_pass_rate: f32) -> bool {
        self.pass_rate >= required_pass_rate
    }
}

pub fn load_cases(path: &Path) -> Result<Vec<EvalCase>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Order-sensitive comparison of every case against the matcher.
pub fn evaluate_cases(matcher: &Matcher, cases: &[EvalCase]) -> EvalSummary {
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        let start = Instant::now();
        let outcome = matcher.match_input(&case.input);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        outcomes.push(EvalOutcome {
            case_id: case.case_id.clone(),
            passed: outcome.suggestions == case.expected,
            tier: outcome.tier,
            actual: outcome.suggestions,
            latency_ms,
        });
    }

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed).count();
    let failed = total.saturating_sub(passed);
    let pass_rate = if total == 0 {
        0.0
    } else {
        passed as f32 / total as f32
    };

    EvalSummary {
        total,
        passed,
        failed,
        pass_rate,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::matcher::MatcherConfig;

    fn matcher() -> Matcher {
        Matcher::from_catalog(Catalog::builtin().expect("catalog"), MatcherConfig::default())
            .expect("matcher")
    }

    fn case(id: &str, input: &str, expected: &[&str]) -> EvalCase {
        EvalCase {
            case_id: id.to_string(),
            input: input.to_string(),
            expected: expected.iter().map(|q| q.to_string()).collect(),
        }
    }

    #[test]
    fn scores_exact_order() {
        let cases = vec![
            case(
                "track-order",
                "I want to track my order",
                &["How can I track my deliveries?", "How do I place an order?"],
            ),
            case(
                "reversed",
                "I want to track my order",
                &["How do I place an order?", "How can I track my deliveries?"],
            ),
            case("miss", "asdkjasd", &[]),
        ];

        let summary = evaluate_cases(&matcher(), &cases);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.outcomes[1].passed);
        assert_eq!(summary.outcomes[0].tier, Some(Tier::Exact));
        assert_eq!(summary.outcomes[2].tier, None);
        assert!(summary.meets(0.6));
        assert!(!summary.meets(0.7));
    }

    #[test]
    fn empty_case_list_has_zero_pass_rate() {
        let summary = evaluate_cases(&matcher(), &[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pass_rate, 0.0);
    }

    #[test]
    fn bundled_cases_all_pass() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/eval_cases.json");
        let cases = load_cases(&path).expect("cases");
        let summary = evaluate_cases(&matcher(), &cases);

        let failing: Vec<&str> = summary
            .outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(|o| o.case_id.as_str())
            .collect();
        assert!(failing.is_empty(), "failing cases: {failing:?}");
        assert!(summary.meets(1.0));
    }
}
