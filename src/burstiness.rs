//! Weekday burstiness and load imbalance.
//!
//! PMR (peak-to-mean ratio) is the largest weekday volume of a region
//! divided by its mean over all seven weekdays.

use crate::aggregate::{weekday_name, RegionWeekdayMatrix, WEEKDAYS};
use crate::core::Category;
use crate::utils::mean;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Write as _;

/// Ranking and tagging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstinessConfig {
    /// Regions listed in the insight report
    pub top_n: usize,
    /// PMR strictly above this is tagged high-risk
    pub high_risk_pmr: f64,
}

impl Default for BurstinessConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            high_risk_pmr: 2.5,
        }
    }
}

/// Load class implied by a PMR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadTag {
    HighRisk,
    Standard,
}

impl LoadTag {
    pub fn from_pmr(pmr: f64, threshold: f64) -> Self {
        if pmr > threshold {
            LoadTag::HighRisk
        } else {
            LoadTag::Standard
        }
    }

    /// Operational action for this class.
    pub fn recommendation(&self) -> &'static str {
        match self {
            LoadTag::HighRisk => "Queue Throttling",
            LoadTag::Standard => "Standard Balancing",
        }
    }
}

impl fmt::Display for LoadTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadTag::HighRisk => "high-risk",
            LoadTag::Standard => "standard",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurstinessScore {
    pub region: String,
    /// Always >= 1.
    pub pmr: f64,
    pub tag: LoadTag,
}

/// Score every region with non-zero mean load, highest PMR first.
///
/// Regions with equal PMR stay in name order.
pub fn score_burstiness(matrix: &RegionWeekdayMatrix, high_risk_pmr: f64) -> Vec<BurstinessScore> {
    let mut scores: Vec<BurstinessScore> = matrix
        .rows()
        .iter()
        .filter_map(|(region, row)| {
            let avg = mean(row);
            if avg <= 0.0 {
                return None;
            }
            let peak = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let pmr = peak / avg;
            Some(BurstinessScore {
                region: region.clone(),
                pmr,
                tag: LoadTag::from_pmr(pmr, high_risk_pmr),
            })
        })
        .collect();

    scores.sort_by(|a, b| b.pmr.partial_cmp(&a.pmr).unwrap_or(Ordering::Equal));
    scores
}

/// Busiest and quietest weekday across all regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadImbalance {
    pub peak_day: Weekday,
    pub trough_day: Weekday,
    pub peak_total: f64,
    pub trough_total: f64,
    /// (peak - trough) / peak * 100
    pub imbalance_pct: f64,
    /// Column sums, Monday first.
    pub weekday_totals: [f64; 7],
}

/// Compare the weekday column sums of the matrix.
///
/// On ties the earlier weekday (Monday first) wins. `None` when the matrix
/// carries no load at all.
pub fn global_load_imbalance(matrix: &RegionWeekdayMatrix) -> Option<LoadImbalance> {
    let totals = matrix.column_totals();

    let mut peak = 0;
    let mut trough = 0;
    for i in 1..totals.len() {
        if totals[i] > totals[peak] {
            peak = i;
        }
        if totals[i] < totals[trough] {
            trough = i;
        }
    }

    if totals[peak] <= 0.0 {
        return None;
    }

    Some(LoadImbalance {
        peak_day: WEEKDAYS[peak],
        trough_day: WEEKDAYS[trough],
        peak_total: totals[peak],
        trough_total: totals[trough],
        imbalance_pct: (totals[peak] - totals[trough]) / totals[peak] * 100.0,
        weekday_totals: totals,
    })
}

/// Markdown insight block for one category.
pub fn render_insights(
    category: Category,
    matrix: &RegionWeekdayMatrix,
    config: &BurstinessConfig,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "### {} - Server Load Optimization Insights\n", category.title());

    match global_load_imbalance(matrix) {
        Some(imb) => {
            let trough = weekday_name(imb.trough_day);
            let _ = writeln!(
                out,
                "**Global Load Imbalance**: The system processes **{:.1}%** less traffic on {} compared to {}.",
                imb.imbalance_pct,
                trough,
                weekday_name(imb.peak_day)
            );
            let _ = writeln!(
                out,
                "- **Recommendation**: Shift batch processing jobs (e.g., deduplication, mis-match reports) to **{trough}s** to utilize idle compute capacity.\n"
            );
        }
        None => {
            let _ = writeln!(out, "**Global Load Imbalance**: no weekday load recorded.\n");
        }
    }

    let _ = writeln!(
        out,
        "#### Top {} 'Bursty' States (High Peak-to-Mean Ratio)",
        config.top_n
    );
    let _ = writeln!(
        out,
        "These states generate sudden spikes in server load, risking timeouts."
    );
    for score in score_burstiness(matrix, config.high_risk_pmr)
        .iter()
        .take(config.top_n)
    {
        let _ = writeln!(
            out,
            "- **{}**: {:.2}x PMR ({}, {})",
            score.region,
            score.pmr,
            score.tag.recommendation(),
            score.tag
        );
    }
    let _ = writeln!(
        out,
        "\n_Note: A PMR of 2.0x means peak load is double the average load._"
    );

    out
}
