//! Approval-rate parity audits across sensitive groups.
//!
//! Sensitive attributes never reach a scorer; they are only compared here, after decisions are
//! made. The audit is exact over 0, 1, or many groups and never fails: unusable input degrades
//! to a WARN report.

mod records;

pub use records::{read_audit_records, AuditInputError, AuditRecords};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

pub const APPROVAL_RATE_DIFFERENCE: &str = "approval_rate_difference";
pub const INSUFFICIENT_DATA_REASON: &str = "insufficient_or_misaligned_data";
pub const DEFAULT_ALLOWED_DIFF: f64 = 0.10;
pub const DEFAULT_WARN_MULTIPLIER: f64 = 1.5;

/// Classification thresholds for an audit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FairnessPolicy {
    allowed_diff: f64,
    warn_multiplier: f64,
}

impl FairnessPolicy {
    /// Non-finite or negative gaps fall back to [`DEFAULT_ALLOWED_DIFF`].
    pub fn new(allowed_diff: f64) -> Self {
        let allowed_diff = if allowed_diff.is_finite() && allowed_diff >= 0.0 {
            allowed_diff
        } else {
            DEFAULT_ALLOWED_DIFF
        };

        Self {
            allowed_diff,
            warn_multiplier: DEFAULT_WARN_MULTIPLIER,
        }
    }

    /// Multipliers below 1.0 or non-finite fall back to [`DEFAULT_WARN_MULTIPLIER`].
    pub fn with_warn_multiplier(mut self, warn_multiplier: f64) -> Self {
        self.warn_multiplier = if warn_multiplier.is_finite() && warn_multiplier >= 1.0 {
            warn_multiplier
        } else {
            DEFAULT_WARN_MULTIPLIER
        };
        self
    }

    pub fn allowed_diff(&self) -> f64 {
        self.allowed_diff
    }

    pub fn warn_multiplier(&self) -> f64 {
        self.warn_multiplier
    }

    pub fn classify(&self, gap: f64) -> AuditStatus {
        if gap <= self.allowed_diff {
            AuditStatus::Pass
        } else if gap <= self.allowed_diff * self.warn_multiplier {
            AuditStatus::Warn
        } else {
            AuditStatus::Fail
        }
    }
}

impl Default for FairnessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_DIFF)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditStatus {
    Pass,
    Warn,
    Fail,
}

impl AuditStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AuditStatus::Pass => "PASS",
            AuditStatus::Warn => "WARN",
            AuditStatus::Fail => "FAIL",
        }
    }
}

/// Approval rate per group, kept in first-seen order and serialized as a JSON object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupRates(Vec<(String, f64)>);

impl GroupRates {
    pub fn get(&self, group: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(label, _)| label == group)
            .map(|(_, rate)| *rate)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(label, rate)| (label.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for GroupRates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, rate) in &self.0 {
            map.serialize_entry(label, rate)?;
        }
        map.end()
    }
}

/// Result of a fairness audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiasReport {
    pub status: AuditStatus,
    pub metric_name: &'static str,
    pub group_approval_rates: GroupRates,
    /// Largest pairwise gap; absent when fewer than two groups were compared.
    pub max_gap: Option<f64>,
    pub worst_pair: Option<(String, String)>,
    pub allowed_diff: f64,
    /// Set when the audit degraded instead of comparing groups.
    pub reason: Option<&'static str>,
    pub explanation: String,
}

impl BiasReport {
    /// Flattened details block in the shape API consumers expect.
    pub fn details(&self) -> Value {
        if let Some(reason) = self.reason {
            return json!({ "reason": reason });
        }

        let mut details = json!({
            "group_rates": self.group_approval_rates,
            "allowed_diff": self.allowed_diff,
        });
        if let (Some(gap), Some((first, second))) = (self.max_gap, &self.worst_pair) {
            details["max_gap"] = json!(gap);
            details["worst_pair"] = json!([first, second]);
        }
        details
    }
}

/// Compare approval rates across groups.
///
/// `predictions` are 0/1 outcomes aligned position-wise with `group_labels`; only `1` counts as
/// an approval.
pub fn audit<L>(predictions: &[u8], group_labels: &[L], policy: &FairnessPolicy) -> BiasReport
where
    L: AsRef<str>,
{
    if predictions.is_empty() || predictions.len() != group_labels.len() {
        return BiasReport {
            status: AuditStatus::Warn,
            metric_name: APPROVAL_RATE_DIFFERENCE,
            group_approval_rates: GroupRates::default(),
            max_gap: None,
            worst_pair: None,
            allowed_diff: policy.allowed_diff(),
            reason: Some(INSUFFICIENT_DATA_REASON),
            explanation: "Fairness audit was not fully performed because there were not enough \
                          records or the sensitive attribute values did not align with the \
                          predictions."
                .to_string(),
        };
    }

    let rates = approval_rates(predictions, group_labels);

    if rates.len() == 1 {
        return BiasReport {
            status: AuditStatus::Pass,
            metric_name: APPROVAL_RATE_DIFFERENCE,
            group_approval_rates: rates,
            max_gap: None,
            worst_pair: None,
            allowed_diff: policy.allowed_diff(),
            reason: None,
            explanation: "Fairness audit passed trivially because only one group was present \
                          in the analysed data."
                .to_string(),
        };
    }

    let (max_gap, first, second) = widest_gap(&rates);
    let status = policy.classify(max_gap);
    let explanation = format!(
        "Fairness audit result: {}. The largest difference in approval rates between any two \
         groups was {max_gap:.2}, observed between groups '{first}' and '{second}'. Values above \
         the configured threshold suggest the model may be treating groups unevenly and should \
         be investigated.",
        status.label()
    );

    BiasReport {
        status,
        metric_name: APPROVAL_RATE_DIFFERENCE,
        group_approval_rates: rates,
        max_gap: Some(max_gap),
        worst_pair: Some((first, second)),
        allowed_diff: policy.allowed_diff(),
        reason: None,
        explanation,
    }
}

fn approval_rates<L: AsRef<str>>(predictions: &[u8], group_labels: &[L]) -> GroupRates {
    // (label, count, positives) in first-seen order
    let mut tallies: Vec<(&str, u64, u64)> = Vec::new();

    for (prediction, label) in predictions.iter().zip(group_labels) {
        let label = label.as_ref();
        let index = match tallies.iter().position(|(seen, _, _)| *seen == label) {
            Some(index) => index,
            None => {
                tallies.push((label, 0, 0));
                tallies.len() - 1
            }
        };
        let tally = &mut tallies[index];
        tally.1 += 1;
        if *prediction == 1 {
            tally.2 += 1;
        }
    }

    GroupRates(
        tallies
            .into_iter()
            .map(|(label, count, positives)| {
                let rate = if count == 0 {
                    0.0
                } else {
                    positives as f64 / count as f64
                };
                (label.to_string(), rate)
            })
            .collect(),
    )
}

/// Largest absolute gap over all unordered pairs; ties keep the first pair in insertion order.
fn widest_gap(rates: &GroupRates) -> (f64, String, String) {
    let groups = &rates.0;
    let mut max_gap = f64::NEG_INFINITY;
    let mut worst = (0, 1);

    for i in 0..groups.len() {
        for j in (i + 1)..groups.len() {
            let gap = (groups[i].1 - groups[j].1).abs();
            if gap > max_gap {
                max_gap = gap;
                worst = (i, j);
            }
        }
    }

    (max_gap, groups[worst.0].0.clone(), groups[worst.1].0.clone())
}
