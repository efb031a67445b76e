//! One analysis run over a normalized dataset.
//!
//! Every metric is attempted. A metric that cannot be computed is recorded
//! as skipped, logged, and the run continues.

use crate::aggregate::{
    aggregate_by_region, aggregate_by_region_weekday, aggregate_by_time, weekday_month_intensity,
    weekday_profile, IntensityMatrix, RegionRollup, RegionWeekdayMatrix, TimeSeriesRollup,
};
use crate::burstiness::{
    global_load_imbalance, render_insights, score_burstiness, BurstinessScore, LoadImbalance,
};
use crate::calendar::holidays_for;
use crate::clustering::{
    cluster_regions, elbow_inertias, prominent_regions, ClusterAssignment, RegionFeatures,
};
use crate::config::AnalyticsConfig;
use crate::core::{Category, Frame, NormalizedDataset, RegionTable};
use crate::daytype::{daily_volume_by_day_type, DayTypeSummary};
use crate::detection::{detect_anomalies, AnomalyFlag};
use crate::error::{MetricOutcome, SkipReason};
use crate::forecast::{fit_and_forecast, ForecastPoint};
use crate::maturity::{compute_omi_with, notable_regions, MaturityRecord};
use crate::transform::{moving_averages, standardize_columns};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Largest k tried by the elbow diagnostic.
const ELBOW_MAX_K: usize = 8;
/// Quantile above which a region is annotated on the cluster scatter.
const PROMINENT_QUANTILE: f64 = 0.9;

/// A metric that produced nothing, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedMetric {
    pub metric: &'static str,
    pub category: Option<Category>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverage {
    pub window: usize,
    /// Aligned with the time rollup's dates; NaN until the window fills.
    pub values: Vec<f64>,
}

/// Trend outputs derived from a time rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub rollup: TimeSeriesRollup,
    pub moving_averages: Vec<MovingAverage>,
}

/// Region ranking derived from a region rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAnalysis {
    pub rollup: RegionRollup,
    pub top_regions: Vec<(String, f64)>,
}

/// Weekday load outputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadAnalysis {
    pub matrix: RegionWeekdayMatrix,
    pub burstiness: Vec<BurstinessScore>,
    pub imbalance: Option<LoadImbalance>,
    /// Markdown insight block.
    pub insights: String,
}

/// Everything computed for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAnalysis {
    pub category: Category,
    pub measures: Vec<String>,
    pub trend: MetricOutcome<TrendAnalysis>,
    pub regions: MetricOutcome<RegionAnalysis>,
    pub weekday_profile: MetricOutcome<[Option<f64>; 7]>,
    pub intensity: MetricOutcome<IntensityMatrix>,
    pub load: MetricOutcome<LoadAnalysis>,
    pub anomalies: MetricOutcome<Vec<AnomalyFlag>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaturityAnalysis {
    pub records: Vec<MaturityRecord>,
    /// Regions worth annotating, by name.
    pub notable: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAnalysis {
    pub assignment: ClusterAssignment,
    pub prominent: Vec<String>,
    /// Inertia for k = 1.. on the standardized features; diagnostic only.
    pub elbow_inertias: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTypeAnalysis {
    pub category: Category,
    pub summary: DayTypeSummary,
    pub years: BTreeSet<i32>,
    /// Regions evaluated against the national calendar only.
    pub unsupported_regions: BTreeSet<String>,
}

/// Output of [`run_analysis`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub categories: BTreeMap<Category, CategoryAnalysis>,
    pub maturity: MetricOutcome<MaturityAnalysis>,
    pub clusters: MetricOutcome<ClusterAnalysis>,
    pub forecast: MetricOutcome<Vec<ForecastPoint>>,
    pub day_types: MetricOutcome<DayTypeAnalysis>,
    pub skipped: Vec<SkippedMetric>,
}

impl AnalysisReport {
    /// Insight blocks of all categories joined into one Markdown document.
    pub fn insights_markdown(&self) -> String {
        let blocks: Vec<&str> = self
            .categories
            .values()
            .filter_map(|c| c.load.as_ref().ok())
            .map(|l| l.insights.as_str())
            .collect();
        let mut doc = String::from("# Day-Wise Server Load Insights\n\n");
        doc.push_str(&blocks.join("\n---\n\n"));
        doc
    }

    /// Whether `metric` was skipped, for any category.
    pub fn was_skipped(&self, metric: &str) -> bool {
        self.skipped.iter().any(|s| s.metric == metric)
    }
}

struct SkipLog(Vec<SkippedMetric>);

impl SkipLog {
    fn record(&mut self, metric: &'static str, category: Option<Category>, reason: &SkipReason) {
        match category {
            Some(category) => warn!(metric, %category, %reason, "metric skipped"),
            None => warn!(metric, %reason, "metric skipped"),
        }
        self.0.push(SkippedMetric {
            metric,
            category,
            reason: reason.clone(),
        });
    }

    fn note<T>(
        &mut self,
        metric: &'static str,
        category: Option<Category>,
        outcome: MetricOutcome<T>,
    ) -> MetricOutcome<T> {
        if let Err(reason) = &outcome {
            self.record(metric, category, reason);
        }
        outcome
    }
}

fn analyze_category(
    category: Category,
    frame: &Frame,
    config: &AnalyticsConfig,
    regions: &RegionTable,
    log: &mut SkipLog,
) -> CategoryAnalysis {
    let measures = frame.measures();
    let some = Some(category);

    let trend = aggregate_by_time(frame, &measures).map(|rollup| {
        let totals: Vec<f64> = rollup.daily_totals().into_iter().map(|(_, t)| t).collect();
        let moving_averages = moving_averages(&totals, &config.trend.moving_average_windows)
            .into_iter()
            .map(|(window, values)| MovingAverage { window, values })
            .collect();
        TrendAnalysis {
            rollup,
            moving_averages,
        }
    });
    let trend = log.note("time_rollup", some, trend);

    let by_region = aggregate_by_region(frame, &measures, regions).map(|rollup| {
        let top_regions = rollup
            .top_by_total(config.trend.top_regions)
            .into_iter()
            .map(|(r, t)| (r.to_string(), t))
            .collect();
        RegionAnalysis {
            rollup,
            top_regions,
        }
    });
    let by_region = log.note("region_rollup", some, by_region);

    let profile = log.note("weekday_profile", some, weekday_profile(frame, &measures));
    let intensity = log.note("intensity", some, weekday_month_intensity(frame, &measures));

    let load = aggregate_by_region_weekday(frame, &measures, regions).map(|matrix| LoadAnalysis {
        burstiness: score_burstiness(&matrix, config.burstiness.high_risk_pmr),
        imbalance: global_load_imbalance(&matrix),
        insights: render_insights(category, &matrix, &config.burstiness),
        matrix,
    });
    let load = log.note("burstiness", some, load);

    let anomalies = match &trend {
        Ok(t) => detect_anomalies(&t.rollup.daily_totals(), &config.anomaly),
        Err(reason) => Err(reason.clone()),
    };
    let anomalies = log.note("anomalies", some, anomalies);

    CategoryAnalysis {
        category,
        measures,
        trend,
        regions: by_region,
        weekday_profile: profile,
        intensity,
        load,
        anomalies,
    }
}

fn region_rollup(
    categories: &BTreeMap<Category, CategoryAnalysis>,
    category: Category,
) -> MetricOutcome<&RegionRollup> {
    match categories.get(&category) {
        None => Err(SkipReason::MissingCategory(category)),
        Some(analysis) => analysis
            .regions
            .as_ref()
            .map(|r| &r.rollup)
            .map_err(Clone::clone),
    }
}

fn analyze_maturity(
    categories: &BTreeMap<Category, CategoryAnalysis>,
    config: &AnalyticsConfig,
) -> MetricOutcome<MaturityAnalysis> {
    let enrolment = region_rollup(categories, Category::Enrolment)?;
    let updates: BTreeMap<Category, RegionRollup> = Category::UPDATES
        .iter()
        .filter_map(|&c| region_rollup(categories, c).ok().map(|r| (c, r.clone())))
        .collect();

    let records = compute_omi_with(enrolment, &updates, &config.maturity.thresholds())?;
    let notable = notable_regions(&records, config.maturity.notable_n)
        .into_iter()
        .map(|r| r.region.clone())
        .collect();
    Ok(MaturityAnalysis { records, notable })
}

fn analyze_clusters(
    categories: &BTreeMap<Category, CategoryAnalysis>,
    config: &AnalyticsConfig,
) -> MetricOutcome<ClusterAnalysis> {
    let enrolment = region_rollup(categories, Category::Enrolment)?;
    let biometric = region_rollup(categories, Category::Biometric)?;
    let features = RegionFeatures::from_rollups(&[
        (Category::Enrolment.as_str(), enrolment),
        (Category::Biometric.as_str(), biometric),
    ]);

    let assignment = cluster_regions(&features, &config.clustering)?;
    let prominent = prominent_regions(&features, PROMINENT_QUANTILE)
        .into_iter()
        .map(str::to_string)
        .collect();
    let (scaled, _) = standardize_columns(features.values());
    let elbow = elbow_inertias(&scaled, ELBOW_MAX_K, &config.clustering);

    Ok(ClusterAnalysis {
        assignment,
        prominent,
        elbow_inertias: elbow,
    })
}

fn analyze_forecast(
    categories: &BTreeMap<Category, CategoryAnalysis>,
    config: &AnalyticsConfig,
) -> MetricOutcome<Vec<ForecastPoint>> {
    let category = config.forecast.category;
    let analysis = categories
        .get(&category)
        .ok_or(SkipReason::MissingCategory(category))?;
    let trend = analysis.trend.as_ref().map_err(Clone::clone)?;
    fit_and_forecast(&trend.rollup.daily_totals(), config.forecast.horizon_days)
}

fn analyze_day_types(
    dataset: &NormalizedDataset,
    config: &AnalyticsConfig,
    regions: &RegionTable,
) -> MetricOutcome<DayTypeAnalysis> {
    let category = config.calendar.day_type_category;
    let frame = dataset.frame(category)?;
    let years = frame.years();
    let index = holidays_for(frame.regions(), years.iter().copied(), regions);
    let summary = daily_volume_by_day_type(frame, &frame.measures(), &index)?;

    Ok(DayTypeAnalysis {
        category,
        summary,
        years,
        unsupported_regions: index.unsupported_regions().clone(),
    })
}

/// Run every metric over `dataset`.
///
/// `regions` is the closed set of valid region names used by the
/// region-keyed rollups and the holiday calendar.
pub fn run_analysis(
    dataset: &NormalizedDataset,
    config: &AnalyticsConfig,
    regions: &RegionTable,
) -> AnalysisReport {
    let mut log = SkipLog(Vec::new());

    let mut categories = BTreeMap::new();
    for category in Category::ALL {
        match dataset.frame(category) {
            Ok(frame) => {
                info!(%category, rows = frame.len(), "analyzing category");
                let analysis = analyze_category(category, frame, config, regions, &mut log);
                categories.insert(category, analysis);
            }
            Err(reason) => {
                log.record("category", Some(category), &reason);
            }
        }
    }

    let maturity = log.note("maturity", None, analyze_maturity(&categories, config));
    let clusters = log.note("clusters", None, analyze_clusters(&categories, config));
    let forecast = log.note("forecast", None, analyze_forecast(&categories, config));
    let day_types = log.note("day_types", None, analyze_day_types(dataset, config, regions));

    info!(skipped = log.0.len(), "analysis complete");

    AnalysisReport {
        categories,
        maturity,
        clusters,
        forecast,
        day_types,
        skipped: log.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Record;
    use chrono::{Duration, NaiveDate};

    fn frame(rows: &[(&str, i64, f64)]) -> Frame {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        Frame::from_records(
            ["count", "pincode"],
            rows.iter()
                .map(|&(r, day, v)| Record::new(r, start + Duration::days(day), vec![v, 110001.0]))
                .collect(),
        )
        .unwrap()
    }

    fn daily(regions: &[&str], days: i64, base: f64) -> Frame {
        let rows: Vec<(&str, i64, f64)> = (0..days)
            .flat_map(move |d| {
                regions
                    .iter()
                    .enumerate()
                    .map(move |(i, &r)| (r, d, base * (i + 1) as f64 + d as f64))
            })
            .collect();
        frame(&rows)
    }

    const REGIONS: [&str; 4] = ["Kerala", "Goa", "Bihar", "Punjab"];

    #[test]
    fn full_dataset_computes_every_metric() {
        let dataset = NormalizedDataset::new()
            .with_frame(Category::Enrolment, daily(&REGIONS, 40, 100.0))
            .with_frame(Category::Biometric, daily(&REGIONS, 40, 50.0))
            .with_frame(Category::Demographic, daily(&REGIONS, 40, 20.0));

        let report = run_analysis(&dataset, &AnalyticsConfig::default(), &RegionTable::india());

        assert!(report.skipped.is_empty(), "{:?}", report.skipped);
        assert_eq!(report.categories.len(), 3);
        let enrol = &report.categories[&Category::Enrolment];
        assert_eq!(enrol.measures, vec!["count".to_string()]);
        assert_eq!(enrol.trend.as_ref().unwrap().moving_averages.len(), 2);
        assert_eq!(report.forecast.as_ref().unwrap().len(), 30);
        assert_eq!(report.maturity.as_ref().unwrap().records.len(), 4);
        assert_eq!(report.clusters.as_ref().unwrap().assignment.assignments.len(), 4);
        assert!(report.insights_markdown().contains("### Biometric"));
    }

    #[test]
    fn missing_update_categories_skip_only_dependants() {
        let dataset =
            NormalizedDataset::new().with_frame(Category::Enrolment, daily(&REGIONS, 10, 100.0));
        let report = run_analysis(&dataset, &AnalyticsConfig::default(), &RegionTable::india());

        assert_eq!(
            report.maturity,
            Err(SkipReason::Degenerate("no update category rollups available".into()))
        );
        assert_eq!(
            report.clusters.as_ref().unwrap_err(),
            &SkipReason::MissingCategory(Category::Biometric)
        );
        assert!(report.forecast.is_ok());
        assert!(report.day_types.is_ok());
        assert!(report.was_skipped("category"));
        assert!(report.was_skipped("maturity"));
    }

    #[test]
    fn absent_categories_are_recorded_once_each() {
        let dataset =
            NormalizedDataset::new().with_frame(Category::Biometric, daily(&REGIONS, 10, 10.0));
        let report = run_analysis(&dataset, &AnalyticsConfig::default(), &RegionTable::india());

        let missing: Vec<&SkippedMetric> = report
            .skipped
            .iter()
            .filter(|s| s.metric == "category")
            .collect();
        assert_eq!(missing.len(), 2);
        assert_eq!(missing[0].category, Some(Category::Enrolment));
        assert_eq!(missing[0].reason, SkipReason::MissingCategory(Category::Enrolment));
        assert_eq!(missing[1].category, Some(Category::Demographic));
    }

    #[test]
    fn missing_enrolment_skips_enrolment_metrics() {
        let dataset =
            NormalizedDataset::new().with_frame(Category::Biometric, daily(&REGIONS, 10, 10.0));
        let report = run_analysis(&dataset, &AnalyticsConfig::default(), &RegionTable::india());

        let missing = SkipReason::MissingCategory(Category::Enrolment);
        assert_eq!(report.maturity.as_ref().unwrap_err(), &missing);
        assert_eq!(report.forecast.as_ref().unwrap_err(), &missing);
        assert!(matches!(
            report.day_types,
            Err(SkipReason::MissingCategory(Category::Enrolment))
        ));
        assert!(report.categories[&Category::Biometric].anomalies.is_ok());
    }

    #[test]
    fn frames_without_measures_are_skipped() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let only_pincode = Frame::from_records(
            ["pincode"],
            vec![Record::new("Kerala", start, vec![695001.0])],
        )
        .unwrap();
        let dataset = NormalizedDataset::new().with_frame(Category::Enrolment, only_pincode);
        let report = run_analysis(&dataset, &AnalyticsConfig::default(), &RegionTable::india());

        let enrol = &report.categories[&Category::Enrolment];
        assert_eq!(enrol.trend, Err(SkipReason::NoMeasures));
        assert_eq!(enrol.anomalies, Err(SkipReason::NoMeasures));
        assert_eq!(report.forecast, Err(SkipReason::NoMeasures));
    }

    #[test]
    fn report_serializes_to_json() {
        let dataset =
            NormalizedDataset::new().with_frame(Category::Enrolment, daily(&REGIONS, 10, 100.0));
        let report = run_analysis(&dataset, &AnalyticsConfig::default(), &RegionTable::india());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["categories"]["enrolment"]["trend"]["Ok"].is_object());
        assert_eq!(json["clusters"]["Err"]["reason"], "missing_category");
    }
}
