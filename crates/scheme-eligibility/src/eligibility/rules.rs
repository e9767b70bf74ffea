use super::domain::RuleOutcome;

/// One named eligibility check over a scheme's rule inputs.
pub(crate) struct RuleCheck<I> {
    pub name: &'static str,
    pub passes: fn(&I) -> bool,
    pub failure: &'static str,
}

/// Runs checks in priority order. The first failing check decides the outcome and no later
/// check is evaluated.
pub(crate) fn evaluate_checks<I>(
    inputs: &I,
    checks: &[RuleCheck<I>],
    success: fn(&I) -> &'static str,
) -> RuleOutcome {
    match checks.iter().find(|check| !(check.passes)(inputs)) {
        Some(check) => RuleOutcome::ineligible(check.name, check.failure),
        None => RuleOutcome::eligible(success(inputs)),
    }
}
