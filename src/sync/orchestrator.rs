//! Synchronization Orchestrator
//!
//! Owns the Timeline Store and Unit Registry for the duration of a run.
//! Workers only return values; every mutation happens here, after the pool
//! has drained, in chronological descriptor order. Ids for new unit names
//! are therefore deterministic for a given listing.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::diff::{compute_diff, full_date_range, mark_latest, mark_latest_from};
use super::pool::{run_pool, TaskOutcome};
use crate::classify::{self, Classifier, SidcClassifier};
use crate::config::{RemoteConfig, SyncConfig};
use crate::error::SyncError;
use crate::extract::{Extraction, LatestLayers};
use crate::registry::UnitRegistry;
use crate::source::{list_snapshots, ArchiveSource, HttpArchiveSource};
use crate::storage::{write_unit_count_csv, StateDir};
use crate::timeline::TimelineStore;
use crate::types::{BaseState, DateKey, DayFacts, PerSide, Side, SnapshotDescriptor, UnitPosition};

/// What a generate or update run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Dates whose descriptors were dispatched, in order
    pub processed: Vec<DateKey>,
    /// Dispatched dates whose snapshot could not be fetched or parsed
    pub failed: Vec<DateKey>,
    /// The descriptor marked latest, if any
    pub latest: Option<DateKey>,
    /// `date` recorded in the written base state
    pub base_date: Option<DateKey>,
    pub days_written: usize,
    pub units: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Nothing to process; no file was written
    UpToDate,
    Synced(RunSummary),
}

/// Merged results of one pool run.
#[derive(Debug, Default)]
struct MergeReport {
    processed: Vec<DateKey>,
    failed: Vec<DateKey>,
    /// Layers of the latest descriptor, if it extracted successfully
    latest: Option<LatestLayers>,
}

pub struct Orchestrator {
    source: Arc<dyn ArchiveSource>,
    classifier: Arc<dyn Classifier>,
    remote: RemoteConfig,
    state: StateDir,
    unit_count_csv: PathBuf,
    workers: usize,
}

impl Orchestrator {
    pub fn new(source: Arc<dyn ArchiveSource>, config: &SyncConfig) -> Self {
        Self {
            source,
            classifier: Arc::new(SidcClassifier),
            remote: config.remote.clone(),
            state: StateDir::new(config.storage.data_dir.clone()),
            unit_count_csv: config.storage.unit_count_csv.clone(),
            workers: config.sync.workers,
        }
    }

    /// Orchestrator over the HTTP listing named in `config`.
    pub fn from_config(config: &SyncConfig) -> Result<Self, SyncError> {
        let source = HttpArchiveSource::new(config)?;
        Ok(Self::new(Arc::new(source), config))
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn state(&self) -> &StateDir {
        &self.state
    }

    async fn list_sorted(&self) -> Result<Vec<SnapshotDescriptor>, SyncError> {
        let mut descriptors = list_snapshots(self.source.as_ref(), &self.remote).await?;
        descriptors.sort_by_key(|d| d.real_data_date);
        Ok(descriptors)
    }

    /// Full rebuild: process every listed snapshot into a fresh registry.
    pub async fn generate(&self) -> Result<SyncOutcome, SyncError> {
        let mut descriptors = self.list_sorted().await?;
        if descriptors.is_empty() {
            info!("Remote listing has no dated snapshots, nothing to generate");
            return Ok(SyncOutcome::UpToDate);
        }

        let latest = mark_latest(&mut descriptors);
        let range = full_date_range(&descriptors);
        info!(
            snapshots = descriptors.len(),
            days = range.len(),
            latest = ?latest.map(|d| d.to_string()),
            "Generating full timeline"
        );

        let mut store = TimelineStore::new();
        store.init_dates(&range);
        let mut registry = UnitRegistry::new();

        let report = self.process(descriptors, &mut store, &mut registry).await;
        let base = BaseState::default();
        self.finish(store, registry, base, range, report, latest)
    }

    /// Incremental run: process only missing dates plus the newest one.
    pub async fn update(&self) -> Result<SyncOutcome, SyncError> {
        let descriptors = self.list_sorted().await?;
        let range = full_date_range(&descriptors);
        if range.is_empty() {
            info!("Remote listing has no dated snapshots, nothing to update");
            return Ok(SyncOutcome::UpToDate);
        }

        let base = self.state.load_base()?;
        let persisted = self.state.persisted_dates()?;
        let diff = compute_diff(&range, &persisted);

        let mut wanted: Vec<SnapshotDescriptor> = descriptors
            .into_iter()
            .filter(|d| diff.contains(&d.real_data_date))
            .collect();
        let latest = mark_latest_from(&mut wanted, base.date);

        info!(
            dates = diff.len(),
            snapshots = wanted.len(),
            prior_latest = ?base.date.map(|d| d.to_string()),
            latest = ?latest.map(|d| d.to_string()),
            "Updating timeline"
        );

        let mut store = TimelineStore::new();
        store.init_dates(&diff.iter().copied().collect::<Vec<_>>());
        let mut registry = UnitRegistry::load(base.unit_map.clone());

        let report = self.process(wanted, &mut store, &mut registry).await;
        self.finish(store, registry, base, range, report, latest)
    }

    /// Dispatch, then merge every outcome on this task.
    async fn process(
        &self,
        descriptors: Vec<SnapshotDescriptor>,
        store: &mut TimelineStore,
        registry: &mut UnitRegistry,
    ) -> MergeReport {
        let outcomes = run_pool(self.source.clone(), descriptors, self.workers).await;

        let mut report = MergeReport::default();
        for TaskOutcome { descriptor, result } in outcomes {
            let date = descriptor.real_data_date;
            report.processed.push(date);

            match result {
                Ok(extraction) => {
                    let (facts, latest) = resolve_units(extraction, registry);
                    store.merge(date, facts);
                    if descriptor.is_latest {
                        report.latest = latest;
                    }
                }
                Err(_) => report.failed.push(date),
            }
        }

        if let Some(layers) = report.latest.as_mut() {
            store.apply_geolocations(std::mem::take(&mut layers.geolocations));
        }
        report
    }

    /// Classify, assemble the base state and persist everything.
    fn finish(
        &self,
        store: TimelineStore,
        mut registry: UnitRegistry,
        mut base: BaseState,
        range: Vec<DateKey>,
        report: MergeReport,
        latest: Option<DateKey>,
    ) -> Result<SyncOutcome, SyncError> {
        registry.classify_all(self.classifier.as_ref());

        // Static layers and the base date move only with a good latest snapshot
        if let Some(layers) = report.latest {
            base.date = latest;
            base.fortifications = layers.fortifications;
            base.dragon_teeth = layers.dragon_teeth;
        } else if latest.is_some() {
            warn!(
                latest = ?latest.map(|d| d.to_string()),
                "Latest snapshot failed, keeping previous static layers"
            );
        }
        base.dates = range;
        base.unit_map = registry.dump();

        let days_written = self.persist(&store, &base)?;

        let summary = RunSummary {
            processed: report.processed,
            failed: report.failed,
            latest,
            base_date: base.date,
            days_written,
            units: registry.len(),
        };
        info!(
            processed = summary.processed.len(),
            failed = summary.failed.len(),
            days_written,
            units = summary.units,
            base_date = ?summary.base_date.map(|d| d.to_string()),
            "Sync complete"
        );
        Ok(SyncOutcome::Synced(summary))
    }

    /// Day files first, then `base.json`, then the derived report.
    fn persist(&self, store: &TimelineStore, base: &BaseState) -> Result<usize, SyncError> {
        self.state.ensure_exists()?;
        for (date, facts) in store.iter() {
            self.state.write_day(date, facts)?;
        }
        self.state.write_base(base)?;

        let rows = base.dates.iter().map(|&date| (date, self.unit_count_for(store, date)));
        write_unit_count_csv(&self.unit_count_csv, rows)?;
        Ok(store.len())
    }

    fn unit_count_for(&self, store: &TimelineStore, date: DateKey) -> PerSide<u32> {
        if let Some(facts) = store.get(date) {
            return facts.unit_count.clone();
        }
        match self.state.load_day(date) {
            Ok(Some(facts)) => facts.unit_count,
            Ok(None) => PerSide::default(),
            Err(e) => {
                warn!(date = %date, error = %e, "Unreadable day file, counting zero units");
                PerSide::default()
            }
        }
    }

    /// Log the code every unit would get. Writes nothing.
    pub fn check_classification(&self) -> Result<usize, SyncError> {
        check_classification(&self.state, self.classifier.as_ref())
    }

    /// Reclassify every unit and rewrite `base.json` only.
    pub fn force_classification(&self) -> Result<usize, SyncError> {
        force_classification(&self.state, self.classifier.as_ref())
    }

    /// Dates already on disk, for callers that want to report coverage.
    pub fn persisted_dates(&self) -> Result<BTreeSet<DateKey>, SyncError> {
        self.state.persisted_dates()
    }
}

/// Compute every unit's code from the persisted registry and log it.
///
/// Returns how many stored codes differ from the computed ones.
pub fn check_classification(
    state: &StateDir,
    classifier: &dyn Classifier,
) -> Result<usize, SyncError> {
    let base = state.load_base()?;
    let registry = UnitRegistry::load(base.unit_map);
    Ok(classify::check(&registry, classifier))
}

/// Recompute every unit's code and rewrite `base.json`. Day files are not
/// touched. Returns the number of units classified.
pub fn force_classification(
    state: &StateDir,
    classifier: &dyn Classifier,
) -> Result<usize, SyncError> {
    let mut base = state.load_base()?;
    let mut registry = UnitRegistry::load(std::mem::take(&mut base.unit_map));
    registry.classify_all(classifier);

    let units = registry.len();
    base.unit_map = registry.into_entries();
    state.write_base(&base)?;
    info!(units, "Symbol codes rewritten");
    Ok(units)
}

/// Turn raw unit names into registry ids and build the day record.
fn resolve_units(
    extraction: Extraction,
    registry: &mut UnitRegistry,
) -> (DayFacts, Option<LatestLayers>) {
    let Extraction {
        unit_count,
        units,
        frontline,
        areas,
        areas_ua,
        latest,
    } = extraction;

    let mut positions = PerSide::<Vec<UnitPosition>>::default();
    for side in Side::ALL {
        let resolved = units
            .get(side)
            .iter()
            .filter_map(|unit| {
                let id = registry.resolve(side, &unit.name)?;
                Some(UnitPosition(id, unit.coords))
            });
        positions.get_mut(side).extend(resolved);
    }

    let facts = DayFacts {
        unit_count,
        units: positions,
        frontline,
        areas,
        areas_ua,
        ..DayFacts::default()
    };
    (facts, latest)
}
