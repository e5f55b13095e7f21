//! Pattern Engine
//!
//! Runs every detector over one shared `PatternContext` and concatenates
//! the findings in a fixed detector order. The engine owns the two impure
//! inputs (current time, fresh ids); detectors stay pure functions of the
//! context.

use crate::events::{MealEvent, MoodEvent};
use crate::patterns::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::patterns::late_night::LateNightCluster;
use crate::patterns::meal_mood::MealTypeMoodAssociation;
use crate::patterns::mood_dip::MoodDipThenEat;
use crate::patterns::snack_shift::WeekdayWeekendShift;
use crate::patterns::types::{Finding, Pattern, PatternContext};
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;

/// A single heuristic analyzer
///
/// Implementations must not fail: insufficient data, zero denominators and
/// missing evidence all resolve to an empty result.
pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, ctx: &PatternContext) -> Vec<Finding>;
}

/// The built-in detectors, in output order
pub fn default_detectors() -> Vec<Arc<dyn Detector>> {
    vec![
        Arc::new(MoodDipThenEat),
        Arc::new(LateNightCluster),
        Arc::new(WeekdayWeekendShift),
        Arc::new(MealTypeMoodAssociation),
    ]
}

/// Stateless dispatcher over the detectors
pub struct PatternEngine {
    detectors: Vec<Arc<dyn Detector>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    tz: FixedOffset,
}

impl PatternEngine {
    /// Engine with the built-in detectors, wall-clock time and UUID ids
    pub fn new(tz: FixedOffset) -> Self {
        Self {
            detectors: default_detectors(),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            tz,
        }
    }

    /// Builder: replace the time source
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Builder: replace the id source
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Builder: replace the detector set
    pub fn with_detectors(mut self, detectors: Vec<Arc<dyn Detector>>) -> Self {
        self.detectors = detectors;
        self
    }

    pub fn tz(&self) -> FixedOffset {
        self.tz
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Snapshot the inputs into a context stamped with the current time
    pub fn context(&self, meals: &[MealEvent], moods: &[MoodEvent]) -> PatternContext {
        PatternContext::new(meals.to_vec(), moods.to_vec(), self.clock.now(), self.tz)
    }

    /// Run all detectors sequentially
    pub fn run(&self, meals: &[MealEvent], moods: &[MoodEvent]) -> Vec<Pattern> {
        let ctx = self.context(meals, moods);
        self.analyze(&ctx)
    }

    /// Run all detectors over an existing context
    pub fn analyze(&self, ctx: &PatternContext) -> Vec<Pattern> {
        let groups: Vec<Vec<Finding>> = self
            .detectors
            .iter()
            .map(|detector| {
                let findings = detector.detect(ctx);
                tracing::debug!(
                    detector = detector.name(),
                    findings = findings.len(),
                    "Detector finished"
                );
                findings
            })
            .collect();

        self.stamp(ctx, groups)
    }

    /// Run every detector as its own blocking task
    ///
    /// Results are joined in detector order, so the output matches `run`
    /// for the same input and clock.
    pub async fn run_concurrent(&self, meals: &[MealEvent], moods: &[MoodEvent]) -> Vec<Pattern> {
        let ctx = Arc::new(self.context(meals, moods));

        let handles: Vec<_> = self
            .detectors
            .iter()
            .map(|detector| {
                let detector = Arc::clone(detector);
                let ctx = Arc::clone(&ctx);
                tokio::task::spawn_blocking(move || (detector.name(), detector.detect(&ctx)))
            })
            .collect();

        let mut groups = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok((name, findings)) => {
                    tracing::debug!(detector = name, findings = findings.len(), "Detector finished");
                    groups.push(findings);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Detector task failed");
                    groups.push(Vec::new());
                }
            }
        }

        self.stamp(&ctx, groups)
    }

    fn stamp(&self, ctx: &PatternContext, groups: Vec<Vec<Finding>>) -> Vec<Pattern> {
        let patterns: Vec<Pattern> = groups
            .into_iter()
            .flatten()
            .map(|finding| Pattern::from_finding(finding, self.ids.next_id(), ctx.now))
            .collect();

        tracing::info!(
            meals = ctx.meals.len(),
            moods = ctx.moods.len(),
            patterns = patterns.len(),
            "Pattern engine run complete"
        );

        patterns
    }
}
