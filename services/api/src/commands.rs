use crate::infra::{build_orchestrator, parse_allowed_diff, parse_attribute, parse_warn_multiplier};
use chrono::Utc;
use clap::Args;
use scheme_eligibility::config::AppConfig;
use scheme_eligibility::eligibility::{
    audit, read_audit_records, to_percentage, ApplicantProfile, ApplicantSubmission, BiasReport,
    FairnessPolicy, FileMetadataStore, OrchestrationResult, PredictResponse, SchemeRegistry,
    SensitiveAttribute,
};
use scheme_eligibility::error::AppError;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Path to an applicant profile JSON document
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Sensitive attribute used to group the fairness audit
    #[arg(long, value_parser = parse_attribute, default_value = "gender")]
    pub(crate) audit_by: SensitiveAttribute,
    /// Print the HTTP response payload instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AuditArgs {
    /// CSV file with `prediction,group` columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Largest tolerated approval-rate gap (defaults to the reference scheme's policy)
    #[arg(long, value_parser = parse_allowed_diff)]
    pub(crate) allowed_diff: Option<f64>,
    /// Gaps up to allowed_diff times this multiplier are reported as WARN
    #[arg(long, value_parser = parse_warn_multiplier)]
    pub(crate) warn_multiplier: Option<f64>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let orchestrator = build_orchestrator(&config);

    let raw = fs::read_to_string(&args.profile)?;
    let submission: ApplicantSubmission = serde_json::from_str(&raw)?;
    let result = orchestrator.evaluate_all_by(&ApplicantProfile::from(submission), args.audit_by)?;

    if args.json {
        let view = PredictResponse::from_result(&result, Utc::now());
        println!("{}", render_json(&view)?);
    } else {
        print!("{}", render_evaluation(&result));
    }
    Ok(())
}

pub(crate) fn run_audit(args: AuditArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let records = read_audit_records(File::open(&args.csv)?)?;

    let allowed_diff = match args.allowed_diff {
        Some(value) => value,
        None => {
            let metadata = FileMetadataStore::new(&config.stores.metadata_dir);
            SchemeRegistry::standard(&metadata)
                .definition(config.fairness.reference_scheme)
                .fairness_threshold
        }
    };
    let warn_multiplier = args
        .warn_multiplier
        .unwrap_or(config.fairness.warn_multiplier);
    let policy = FairnessPolicy::new(allowed_diff).with_warn_multiplier(warn_multiplier);

    let report = audit(&records.predictions, &records.group_labels, &policy);
    print!("{}", render_audit(&report));
    Ok(())
}

pub(crate) fn run_schemes() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let orchestrator = build_orchestrator(&config);
    print!("{}", render_catalogue(orchestrator.registry()));
    Ok(())
}

fn render_json(view: &PredictResponse) -> Result<String, AppError> {
    serde_json::to_string_pretty(view).map_err(AppError::Output)
}

fn render_evaluation(result: &OrchestrationResult) -> String {
    let mut out = String::new();
    if result.decisions.is_empty() {
        let _ = writeln!(out, "No scheme rule gates were passed.");
    }
    for decision in &result.decisions {
        let _ = writeln!(
            out,
            "{}: {:.2}% approval ({}) | expected benefit {:.0}",
            decision.display_name,
            to_percentage(decision.approval_probability),
            decision.explanation.probability_band.label(),
            decision.expected_benefit
        );
        let _ = writeln!(out, "  {}", decision.rule_reason);
    }
    out.push('\n');
    out.push_str(&render_audit(&result.bias_report));
    let _ = writeln!(out, "\n{}", result.ethical_disclaimer);
    out
}

fn render_audit(report: &BiasReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Fairness audit ({}): {}",
        report.metric_name,
        report.status.label()
    );
    for (group, rate) in report.group_approval_rates.iter() {
        let _ = writeln!(out, "  - {group}: {:.2}% approved", rate * 100.0);
    }
    if let (Some(gap), Some((first, second))) = (report.max_gap, &report.worst_pair) {
        let _ = writeln!(
            out,
            "  Largest gap {gap:.2} between '{first}' and '{second}' (allowed {:.2})",
            report.allowed_diff
        );
    }
    let _ = writeln!(out, "{}", report.explanation);
    out
}

fn render_catalogue(registry: &SchemeRegistry) -> String {
    let mut out = String::new();
    for scheme in registry.iter() {
        let _ = writeln!(
            out,
            "{} ({}): benefit {:.0} | allowed gap {:.2} | features [{}]",
            scheme.display_name,
            scheme.id.as_str(),
            scheme.benefit_amount,
            scheme.fairness_threshold,
            scheme.feature_names().join(", ")
        );
    }
    out
}
