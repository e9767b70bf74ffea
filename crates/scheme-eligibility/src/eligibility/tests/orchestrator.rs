use super::common::*;
use std::sync::Arc;

use crate::config::FairnessConfig;
use crate::eligibility::domain::{ApplicantProfile, SchemeId, SensitiveAttribute};
use crate::eligibility::fairness::{AuditStatus, INSUFFICIENT_DATA_REASON};
use crate::eligibility::orchestrator::{EligibilityOrchestrator, OrchestrationError};
use crate::eligibility::registry::SchemeRegistry;
use crate::eligibility::scoring::{ModelError, ModelRegistry};

#[test]
fn ineligible_schemes_are_omitted_and_never_scored() {
    let (orchestrator, models) = build_orchestrator(CountingStore::default());

    let result = orchestrator
        .evaluate_all(&ineligible_everywhere())
        .expect("evaluation succeeds");

    assert!(result.decisions.is_empty());
    assert_eq!(prediction_count(&models), 0);
    assert_eq!(load_count(&models), 0);
    assert_eq!(result.bias_report.status, AuditStatus::Warn);
    assert_eq!(result.bias_report.reason, Some(INSUFFICIENT_DATA_REASON));
}

#[test]
fn eligible_farmer_is_scored_for_every_scheme_in_registry_order() {
    let (orchestrator, models) = build_orchestrator(CountingStore::default());

    let result = orchestrator
        .evaluate_all(&farmer_profile())
        .expect("evaluation succeeds");

    let order: Vec<SchemeId> = result.decisions.iter().map(|d| d.scheme).collect();
    assert_eq!(order, SchemeId::ALL.to_vec());
    assert_eq!(prediction_count(&models), SchemeId::COUNT);

    let pm_kisan = &result.decisions[0];
    assert!(pm_kisan.rule_eligible);
    assert_eq!(pm_kisan.approval_probability, FIXED_PROBABILITY);
    assert_eq!(pm_kisan.expected_benefit, 6_000.0);
    assert_eq!(pm_kisan.explanation.rule_based_reason, pm_kisan.rule_reason);
    assert!(pm_kisan.explanation.overall_summary.contains("ELIGIBLE"));
}

#[test]
fn single_applicant_batch_audits_as_one_group() {
    let (orchestrator, _) = build_orchestrator(CountingStore::default());

    let result = orchestrator
        .evaluate_all(&farmer_profile())
        .expect("evaluation succeeds");

    let report = &result.bias_report;
    assert_eq!(report.status, AuditStatus::Pass);
    assert_eq!(report.group_approval_rates.get("female"), Some(1.0));
    assert_eq!(report.group_approval_rates.len(), 1);
    assert_eq!(report.allowed_diff, 0.08);
    assert_eq!(result.ethical_disclaimer, "Advisory output only.");
}

#[test]
fn audit_can_group_by_disability_status() {
    let (orchestrator, _) = build_orchestrator(CountingStore::default());

    let result = orchestrator
        .evaluate_all_by(&farmer_profile(), SensitiveAttribute::DisabilityStatus)
        .expect("evaluation succeeds");

    assert_eq!(
        result.bias_report.group_approval_rates.get("undisclosed"),
        Some(1.0)
    );
}

#[test]
fn pm_kisan_income_gate_end_to_end() {
    let (orchestrator, _) = build_orchestrator(CountingStore::default());

    let included = orchestrator
        .evaluate_all(&farmer_profile())
        .expect("evaluation succeeds");
    assert!(included
        .decisions
        .iter()
        .any(|decision| decision.scheme == SchemeId::PmKisan));

    let mut submission = farmer_submission();
    submission.annual_income = 300_000.0;
    let excluded = orchestrator
        .evaluate_all(&ApplicantProfile::from(submission))
        .expect("evaluation succeeds");
    assert!(excluded
        .decisions
        .iter()
        .all(|decision| decision.scheme != SchemeId::PmKisan));
}

#[test]
fn evaluation_is_idempotent_for_a_warm_cache() {
    let (orchestrator, models) = build_orchestrator(CountingStore::default());
    let profile = farmer_profile();

    let first = orchestrator.evaluate_all(&profile).expect("first run");
    let second = orchestrator.evaluate_all(&profile).expect("second run");

    assert_eq!(first, second);
    assert_eq!(load_count(&models), SchemeId::COUNT);
}

#[test]
fn sensitive_attributes_do_not_change_decisions() {
    let (orchestrator, _) = build_orchestrator(CountingStore::default());

    let mut other = farmer_submission();
    other.gender = "male".to_string();
    other.disability_status = Some("visual_impairment".to_string());

    let baseline = orchestrator
        .evaluate_all(&farmer_profile())
        .expect("evaluation succeeds");
    let varied = orchestrator
        .evaluate_all(&ApplicantProfile::from(other))
        .expect("evaluation succeeds");

    assert_eq!(baseline.decisions, varied.decisions);
}

#[test]
fn missing_model_for_eligible_scheme_is_surfaced() {
    let (orchestrator, _) = build_orchestrator(CountingStore::without(&[SchemeId::Nsp]));

    match orchestrator.evaluate_all(&farmer_profile()) {
        Err(OrchestrationError::Model(ModelError::Unavailable { scheme, detail })) => {
            assert_eq!(scheme, SchemeId::Nsp);
            assert!(detail.contains("not found"));
        }
        other => panic!("expected model unavailable, got {other:?}"),
    }
}

#[test]
fn missing_model_for_ineligible_scheme_is_never_loaded() {
    let (orchestrator, models) = build_orchestrator(CountingStore::without(&[SchemeId::PmKisan]));

    let mut submission = farmer_submission();
    submission.occupation = "Student".to_string();
    submission.age = 17;
    submission.has_family_id = Some(false);

    let result = orchestrator
        .evaluate_all(&ApplicantProfile::from(submission))
        .expect("pm-kisan model is never needed");

    let schemes: Vec<SchemeId> = result.decisions.iter().map(|d| d.scheme).collect();
    assert_eq!(schemes, vec![SchemeId::Nsp]);
    assert!(!models.is_loaded(SchemeId::PmKisan));
}

#[test]
fn single_scheme_check_reports_failed_rule() {
    let (orchestrator, models) = build_orchestrator(CountingStore::default());

    let mut submission = farmer_submission();
    submission.annual_income = 300_000.0;
    let evaluation = orchestrator
        .evaluate_scheme(&ApplicantProfile::from(submission), SchemeId::PmKisan)
        .expect("evaluation succeeds");

    assert!(!evaluation.rule.eligible);
    assert_eq!(evaluation.rule.failed_check, Some("income_limit"));
    assert!(evaluation.decision.is_none());
    assert_eq!(prediction_count(&models), 0);
}

#[test]
fn single_scheme_check_scores_eligible_applicants() {
    let (orchestrator, _) = build_orchestrator(CountingStore::default());

    let evaluation = orchestrator
        .evaluate_scheme(&farmer_profile(), SchemeId::Ayushman)
        .expect("evaluation succeeds");

    let decision = evaluation.decision.expect("eligible applicants are scored");
    assert_eq!(decision.approval_probability, FIXED_PROBABILITY);
    assert_eq!(decision.expected_benefit, 500_000.0);
}

#[test]
fn unregistered_scheme_is_rejected() {
    let schemes = Arc::new(SchemeRegistry::with_schemes(
        &metadata_store(),
        &[SchemeId::PmKisan],
    ));
    let models = Arc::new(ModelRegistry::new(CountingStore::default()));
    let orchestrator = EligibilityOrchestrator::new(schemes, models, FairnessConfig::default());

    assert!(matches!(
        orchestrator.evaluate_scheme(&farmer_profile(), SchemeId::Pmay),
        Err(OrchestrationError::SchemeNotRegistered(SchemeId::Pmay))
    ));
}

#[test]
fn reference_scheme_drives_threshold_and_disclaimer() {
    let schemes = Arc::new(SchemeRegistry::standard(&metadata_store()));
    let models = Arc::new(ModelRegistry::new(CountingStore::default()));
    let fairness = FairnessConfig {
        reference_scheme: SchemeId::Nsp,
        ..FairnessConfig::default()
    };
    let orchestrator = EligibilityOrchestrator::new(schemes, models, fairness);

    let result = orchestrator
        .evaluate_all(&farmer_profile())
        .expect("evaluation succeeds");

    assert_eq!(result.bias_report.allowed_diff, 0.10);
    assert_eq!(
        result.ethical_disclaimer,
        crate::eligibility::orchestrator::DEFAULT_BATCH_DISCLAIMER
    );
}
