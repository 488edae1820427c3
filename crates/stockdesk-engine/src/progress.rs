//! Staged progress animation for the loading section.
//!
//! The stages are cosmetic: they advance on a timer while a research
//! request is in flight and carry no information about the request itself.
//! [`ProgressPlan::start`] returns a [`ProgressHandle`] that must be
//! cancelled when the request settles; after [`ProgressHandle::cancel`]
//! returns no further updates reach the view.

use crate::view::View;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// A single labelled stage, activated `offset` after the request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub label: String,
    pub offset: Duration,
}

impl Stage {
    pub fn new(label: impl Into<String>, offset: Duration) -> Self {
        Self {
            label: label.into(),
            offset,
        }
    }
}

/// Status of one stage in a [`Progress`] snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Pending,
    Active,
    Done,
}

/// Snapshot of the animation: stage labels and the active stage index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    labels: Vec<String>,
    active: usize,
}

impl Progress {
    /// Build a snapshot with `active` as the current stage.
    pub fn new(labels: Vec<String>, active: usize) -> Self {
        Self { labels, active }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of the active stage.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Status of the stage at `index`; stages before the active one are done.
    pub fn status(&self, index: usize) -> StageStatus {
        match index.cmp(&self.active) {
            std::cmp::Ordering::Less => StageStatus::Done,
            std::cmp::Ordering::Equal => StageStatus::Active,
            std::cmp::Ordering::Greater => StageStatus::Pending,
        }
    }

    /// Iterate over `(label, status)` pairs.
    pub fn stages(&self) -> impl Iterator<Item = (&str, StageStatus)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), self.status(i)))
    }
}

/// The schedule of stages shown while a request is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressPlan {
    stages: Vec<Stage>,
}

impl Default for ProgressPlan {
    fn default() -> Self {
        Self::new(vec![
            Stage::new("Fetching market data", Duration::ZERO),
            Stage::new("Searching recent news", Duration::from_secs(3)),
            Stage::new("Reading institutional flows", Duration::from_secs(8)),
            Stage::new("Writing the report", Duration::from_secs(15)),
        ])
    }
}

impl ProgressPlan {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    fn labels(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.label.clone()).collect()
    }

    /// Snapshot with the first stage active.
    pub fn initial(&self) -> Progress {
        Progress::new(self.labels(), 0)
    }

    /// Spawn the timer task that advances `view` through the remaining stages.
    ///
    /// The first stage is not sent; callers show it with [`Self::initial`].
    /// Must be called from within a tokio runtime.
    pub fn start<V: View + 'static>(&self, view: Arc<V>) -> ProgressHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let labels = self.labels();
        let offsets: Vec<Duration> = self.stages.iter().map(|s| s.offset).collect();
        let started = Instant::now();

        let task = tokio::spawn(async move {
            for (index, offset) in offsets.into_iter().enumerate().skip(1) {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => return,
                    () = tokio::time::sleep_until(started + offset) => {}
                }
                view.set_progress(&Progress::new(labels.clone(), index));
            }
        });

        ProgressHandle {
            token,
            task: Some(task),
        }
    }
}

/// Handle to a running progress animation.
///
/// Dropping the handle cancels the animation without waiting for it.
#[derive(Debug)]
pub struct ProgressHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ProgressHandle {
    /// Stop the animation and wait for the timer task to exit.
    pub async fn cancel(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingView;

    #[test]
    fn test_stage_status() {
        let progress = Progress::new(vec!["a".into(), "b".into(), "c".into()], 1);
        let statuses: Vec<StageStatus> = progress.stages().map(|(_, s)| s).collect();
        assert_eq!(
            statuses,
            vec![StageStatus::Done, StageStatus::Active, StageStatus::Pending]
        );
    }

    #[test]
    fn test_default_plan() {
        let plan = ProgressPlan::default();
        assert_eq!(plan.stages().len(), 4);
        assert_eq!(plan.stages()[0].offset, Duration::ZERO);
        assert!(plan.stages().windows(2).all(|w| w[0].offset < w[1].offset));
        assert_eq!(plan.initial().active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stages_advance_on_schedule() {
        let view = Arc::new(RecordingView::default());
        let handle = ProgressPlan::default().start(Arc::clone(&view));

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert!(view.progress_updates().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(view.progress_updates(), vec![1]);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(view.progress_updates(), vec![1, 2, 3]);

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_updates() {
        let view = Arc::new(RecordingView::default());
        let handle = ProgressPlan::default().start(Arc::clone(&view));

        tokio::time::sleep(Duration::from_secs(4)).await;
        handle.cancel().await;

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(view.progress_updates(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let view = Arc::new(RecordingView::default());
        let handle = ProgressPlan::default().start(Arc::clone(&view));
        assert!(!handle.is_cancelled());
        drop(handle);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(view.progress_updates().is_empty());
    }
}
