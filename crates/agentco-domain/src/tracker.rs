//! Development progress tracker.
//!
//! One spawned task per tracked run. It fetches the run snapshot, waits for
//! the poll interval, and fetches again; the next request is only scheduled
//! after the previous one settles, so two fetches never overlap. Observers
//! read the latest [`TrackerView`] from a watch channel.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use agentco_types::{
    DEFAULT_LOG_CAPACITY, DevelopmentStatus, LogBuffer, LogEntry, LogLevel, ProjectId,
};

use crate::error::{DomainError, Result};

/// Default delay between the end of one fetch and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Where run snapshots come from.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the current snapshot of a project's development run.
    async fn fetch(&self, project: &ProjectId) -> Result<DevelopmentStatus>;

    /// Ask the run to pause.
    async fn pause(&self, project: &ProjectId) -> Result<()>;
}

/// Tracker tuning.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
    /// Maximum number of buffered log entries.
    pub log_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

/// What observers see.
#[derive(Debug, Clone)]
pub struct TrackerView {
    /// Most recent snapshot, replaced wholesale on every successful fetch.
    pub snapshot: Option<DevelopmentStatus>,
    /// Every log entry seen so far, bounded.
    pub logs: LogBuffer,
    /// Fetches settled, successful or not.
    pub polls: u64,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    /// The loop has exited and no further fetch will happen.
    pub finished: bool,
}

impl TrackerView {
    fn new(log_capacity: usize) -> Self {
        Self {
            snapshot: None,
            logs: LogBuffer::new(log_capacity),
            polls: 0,
            last_error: None,
            consecutive_failures: 0,
            finished: false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.snapshot.as_ref().is_some_and(DevelopmentStatus::is_completed)
    }

    pub fn is_failed(&self) -> bool {
        self.snapshot.as_ref().is_some_and(DevelopmentStatus::is_failed)
    }
}

#[derive(Debug)]
enum Command {
    Pause,
}

/// Starts trackers.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    config: TrackerConfig,
}

impl ProgressTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    /// Start tracking `project`.
    ///
    /// The first fetch happens immediately. `on_complete` runs once, with
    /// the completed snapshot, and polling stops right after. Must be called
    /// from within a tokio runtime.
    pub fn start<F>(
        &self,
        source: Arc<dyn StatusSource>,
        project: ProjectId,
        on_complete: F,
    ) -> TrackerHandle
    where
        F: FnOnce(&DevelopmentStatus) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(TrackerView::new(self.config.log_capacity));

        let poll_loop = PollLoop {
            source,
            project,
            interval: self.config.poll_interval,
            cancel: cancel.clone(),
            commands: command_rx,
            view: view_tx,
            cursor: LogCursor::default(),
            was_failed: false,
        };
        let join = tokio::spawn(poll_loop.run(on_complete));

        TrackerHandle {
            cancel,
            commands: command_tx,
            view: view_rx,
            join: Some(join),
        }
    }
}

/// Handle to a running tracker. Dropping it stops the tracker.
pub struct TrackerHandle {
    cancel: CancellationToken,
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<TrackerView>,
    join: Option<JoinHandle<()>>,
}

impl TrackerHandle {
    /// Subscribe to view updates.
    pub fn subscribe(&self) -> watch::Receiver<TrackerView> {
        self.view.clone()
    }

    /// Copy of the current view.
    pub fn view(&self) -> TrackerView {
        self.view.borrow().clone()
    }

    /// Request a pause. The backend decides; the tracker re-fetches right
    /// after the request settles instead of assuming the outcome.
    pub fn pause(&self) -> Result<()> {
        self.commands
            .send(Command::Pause)
            .map_err(|_| DomainError::TrackerStopped)
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the tracker to stop on its own (after completion).
    pub async fn wait(mut self) -> Result<()> {
        self.join().await
    }

    /// Stop polling and wait for the loop to exit.
    pub async fn close(mut self) -> Result<()> {
        self.cancel.cancel();
        self.join().await
    }

    async fn join(&mut self) -> Result<()> {
        match self.join.take() {
            Some(join) => join
                .await
                .map_err(|e| DomainError::TrackerJoin(e.to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct PollLoop {
    source: Arc<dyn StatusSource>,
    project: ProjectId,
    interval: Duration,
    cancel: CancellationToken,
    commands: mpsc::UnboundedReceiver<Command>,
    view: watch::Sender<TrackerView>,
    cursor: LogCursor,
    was_failed: bool,
}

impl PollLoop {
    async fn run<F>(mut self, on_complete: F)
    where
        F: FnOnce(&DevelopmentStatus) + Send + 'static,
    {
        info!(
            project = %self.project,
            interval_ms = self.interval.as_millis() as u64,
            "Development tracker started"
        );
        let mut on_complete = Some(on_complete);

        loop {
            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                result = self.source.fetch(&self.project) => result,
            };

            match fetched {
                Ok(status) if status.is_completed() => {
                    let snapshot = status.clone();
                    self.apply(status);
                    if let Some(callback) = on_complete.take() {
                        callback(&snapshot);
                    }
                    info!(project = %self.project, "Development run completed");
                    break;
                }
                Ok(status) => self.apply(status),
                Err(err) => self.record_failure(&err),
            }

            let paused = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                command = self.commands.recv() => match command {
                    Some(Command::Pause) => true,
                    None => break,
                },
                _ = tokio::time::sleep(self.interval) => false,
            };

            if paused {
                let result = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break,
                    result = self.source.pause(&self.project) => result,
                };
                self.record_pause(result);
            }
        }

        self.view.send_modify(|view| view.finished = true);
        debug!(project = %self.project, "Development tracker stopped");
    }

    fn apply(&mut self, status: DevelopmentStatus) {
        let failed = status.is_failed();
        if failed && !self.was_failed {
            warn!(
                project = %self.project,
                error = status.error_message.as_deref().unwrap_or("no error message"),
                "Development run failed"
            );
        }
        self.was_failed = failed;

        let fresh = self.cursor.unseen(&status.logs).to_vec();
        self.view.send_modify(|view| {
            view.logs.extend(fresh);
            view.snapshot = Some(status);
            view.polls += 1;
            view.last_error = None;
            view.consecutive_failures = 0;
        });
    }

    fn record_failure(&mut self, err: &DomainError) {
        warn!(project = %self.project, error = %err, "Development status poll failed");
        let message = err.to_string();
        self.view.send_modify(|view| {
            view.polls += 1;
            view.last_error = Some(message);
            view.consecutive_failures += 1;
        });
    }

    fn record_pause(&mut self, result: Result<()>) {
        let entry = match result {
            Ok(()) => {
                info!(project = %self.project, "Pause requested");
                LogEntry::now(LogLevel::Info, "Pause requested")
            }
            Err(err) => {
                warn!(project = %self.project, error = %err, "Pause request failed");
                LogEntry::now(LogLevel::Warning, format!("Pause request failed: {err}"))
            }
        };
        self.view.send_modify(|view| view.logs.push(entry));
    }
}

/// Tracks which backend log entries have already been buffered.
///
/// The backend resends its whole log list on every poll. Normally the list
/// only grows; if it was trimmed, the cursor resynchronises on the last
/// entry it saw.
#[derive(Debug, Default)]
struct LogCursor {
    seen: usize,
    last: Option<LogEntry>,
}

impl LogCursor {
    fn unseen<'a>(&mut self, logs: &'a [LogEntry]) -> &'a [LogEntry] {
        if logs.is_empty() {
            return &[];
        }
        let start = match &self.last {
            None => 0,
            Some(last) if self.seen.checked_sub(1).and_then(|i| logs.get(i)) == Some(last) => {
                self.seen
            }
            Some(last) => logs.iter().rposition(|e| e == last).map_or(0, |i| i + 1),
        };
        self.seen = logs.len();
        self.last = logs.last().cloned();
        &logs[start..]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Simulated run
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(any(test, feature = "simulation"))]
pub use simulated::SimulatedRun;

#[cfg(any(test, feature = "simulation"))]
mod simulated {
    use agentco_types::{Progress, RunStatus};
    use parking_lot::Mutex;

    use super::*;

    /// Percentage added per fetch.
    const STEP: u8 = 10;

    #[derive(Debug, Default)]
    struct State {
        progress: Progress,
        paused: bool,
        fetches: u64,
        logs: Vec<LogEntry>,
    }

    /// A development run that advances by a fixed step on every fetch.
    ///
    /// No network is involved. Intended for demos and tests only.
    #[derive(Debug, Default)]
    pub struct SimulatedRun {
        state: Mutex<State>,
    }

    impl SimulatedRun {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of fetches served so far.
        pub fn fetches(&self) -> u64 {
            self.state.lock().fetches
        }
    }

    #[async_trait]
    impl StatusSource for SimulatedRun {
        async fn fetch(&self, _project: &ProjectId) -> Result<DevelopmentStatus> {
            let mut state = self.state.lock();
            state.fetches += 1;

            let status = if state.paused {
                RunStatus::Paused
            } else {
                state.progress = state.progress.saturating_add(STEP);
                let message = format!("Progress {}", state.progress);
                state.logs.push(LogEntry::now(LogLevel::Info, message));
                if state.progress.is_complete() {
                    RunStatus::Completed
                } else {
                    RunStatus::InProgress
                }
            };

            Ok(DevelopmentStatus {
                status,
                overall_progress: state.progress,
                logs: state.logs.clone(),
                ..Default::default()
            })
        }

        async fn pause(&self, _project: &ProjectId) -> Result<()> {
            self.state.lock().paused = true;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use agentco_types::{Progress, RunStatus};
    use parking_lot::Mutex;

    const INTERVAL: Duration = Duration::from_millis(2000);

    fn tracker() -> ProgressTracker {
        ProgressTracker::new(TrackerConfig {
            poll_interval: INTERVAL,
            log_capacity: 50,
        })
    }

    fn snapshot(status: RunStatus, progress: u8) -> DevelopmentStatus {
        DevelopmentStatus {
            status,
            overall_progress: Progress::new(progress).unwrap(),
            ..Default::default()
        }
    }

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: "t".to_string(),
            level: LogLevel::Info,
            message: message.to_string(),
        }
    }

    /// Plays back scripted responses, repeating the last one forever.
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<DevelopmentStatus>>>,
        fallback: DevelopmentStatus,
        fetches: AtomicUsize,
        pauses: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<DevelopmentStatus>>, fallback: DevelopmentStatus) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                fallback,
                fetches: AtomicUsize::new(0),
                pauses: AtomicUsize::new(0),
            })
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch(&self, _project: &ProjectId) -> Result<DevelopmentStatus> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match self.script.lock().pop_front() {
                Some(next) => next,
                None => Ok(self.fallback.clone()),
            }
        }

        async fn pause(&self, _project: &ProjectId) -> Result<()> {
            self.pauses.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce(&DevelopmentStatus) + Send + 'static) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        (calls, move |_: &DevelopmentStatus| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_run_completes_after_ten_ticks() {
        let run = Arc::new(SimulatedRun::new());
        let (calls, on_complete) = counter();

        let handle = tracker().start(run.clone(), ProjectId::new("1"), on_complete);
        let mut view = handle.subscribe();
        handle.wait().await.unwrap();

        let view = view.borrow_and_update();
        let snapshot = view.snapshot.as_ref().unwrap();
        assert_eq!(snapshot.overall_progress, Progress::COMPLETE);
        assert_eq!(snapshot.status, RunStatus::Completed);
        assert_eq!(run.fetches(), 10);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(view.logs.len(), 10);
        assert!(view.finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_fires_once_and_stops_polling() {
        let source = ScriptedSource::new(Vec::new(), snapshot(RunStatus::Completed, 100));
        let (calls, on_complete) = counter();

        let handle = tracker().start(source.clone(), ProjectId::new("1"), on_complete);
        let mut view = handle.subscribe();
        view.wait_for(|v| v.finished).await.unwrap();

        tokio::time::sleep(INTERVAL * 5).await;
        assert_eq!(source.fetches(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_stops_polling() {
        let source = ScriptedSource::new(Vec::new(), snapshot(RunStatus::InProgress, 30));
        let (calls, on_complete) = counter();

        let handle = tracker().start(source.clone(), ProjectId::new("1"), on_complete);
        tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(100)).await;
        handle.close().await.unwrap();

        let after_close = source.fetches();
        assert!(after_close >= 2);
        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(source.fetches(), after_close);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_polling() {
        let source = ScriptedSource::new(Vec::new(), snapshot(RunStatus::InProgress, 30));
        let (_calls, on_complete) = counter();

        let handle = tracker().start(source.clone(), ProjectId::new("1"), on_complete);
        let mut view = handle.subscribe();
        view.wait_for(|v| v.polls >= 1).await.unwrap();
        drop(handle);

        view.wait_for(|v| v.finished).await.unwrap();
        let after_drop = source.fetches();
        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(source.fetches(), after_drop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_errors_keep_polling() {
        let source = ScriptedSource::new(
            vec![
                Err(DomainError::Internal("connection refused".to_string())),
                Err(DomainError::Internal("connection refused".to_string())),
            ],
            snapshot(RunStatus::Completed, 100),
        );
        let (calls, on_complete) = counter();

        let handle = tracker().start(source.clone(), ProjectId::new("1"), on_complete);
        let mut view = handle.subscribe();

        view.wait_for(|v| v.consecutive_failures == 2).await.unwrap();
        assert!(
            view.borrow()
                .last_error
                .as_deref()
                .is_some_and(|e| e.contains("connection refused"))
        );

        handle.wait().await.unwrap();
        let view = view.borrow();
        assert_eq!(source.fetches(), 3);
        assert_eq!(view.polls, 3);
        assert_eq!(view.consecutive_failures, 0);
        assert!(view.last_error.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_run_surfaces_error_and_keeps_polling() {
        let failed = DevelopmentStatus {
            error_message: Some("model quota exceeded".to_string()),
            ..snapshot(RunStatus::Failed, 40)
        };
        let source = ScriptedSource::new(Vec::new(), failed);
        let (calls, on_complete) = counter();

        let handle = tracker().start(source.clone(), ProjectId::new("1"), on_complete);
        let mut view = handle.subscribe();
        view.wait_for(|v| v.polls >= 3).await.unwrap();

        {
            let view = view.borrow();
            assert!(view.is_failed());
            assert!(!view.finished);
            let message = view.snapshot.as_ref().and_then(|s| s.error_message.as_deref());
            assert_eq!(message, Some("model quota exceeded"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        handle.close().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_refetches_immediately() {
        let source = ScriptedSource::new(Vec::new(), snapshot(RunStatus::InProgress, 20));
        let (_calls, on_complete) = counter();

        let handle = tracker().start(source.clone(), ProjectId::new("1"), on_complete);
        let mut view = handle.subscribe();
        view.wait_for(|v| v.polls >= 1).await.unwrap();

        let requested_at = tokio::time::Instant::now();
        handle.pause().unwrap();
        view.wait_for(|v| v.polls >= 2).await.unwrap();

        assert!(requested_at.elapsed() < INTERVAL);
        assert_eq!(source.pauses.load(Ordering::SeqCst), 1);
        assert!(
            view.borrow()
                .logs
                .iter()
                .any(|e| e.message == "Pause requested")
        );
        handle.close().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_after_stop_is_an_error() {
        let source = ScriptedSource::new(Vec::new(), snapshot(RunStatus::Completed, 100));
        let (_calls, on_complete) = counter();

        let handle = tracker().start(source, ProjectId::new("1"), on_complete);
        let mut view = handle.subscribe();
        view.wait_for(|v| v.finished).await.unwrap();
        tokio::task::yield_now().await;

        assert!(matches!(handle.pause(), Err(DomainError::TrackerStopped)));
    }

    #[test]
    fn test_log_cursor_appends_only_new_entries() {
        let mut cursor = LogCursor::default();
        let first = vec![entry("a"), entry("b")];
        assert_eq!(cursor.unseen(&first).len(), 2);

        let grown = vec![entry("a"), entry("b"), entry("c")];
        let fresh = cursor.unseen(&grown);
        assert_eq!(fresh, &[entry("c")]);

        assert!(cursor.unseen(&grown).is_empty());
    }

    #[test]
    fn test_log_cursor_resyncs_after_trim() {
        let mut cursor = LogCursor::default();
        cursor.unseen(&[entry("a"), entry("b"), entry("c")]);

        let trimmed = vec![entry("c"), entry("d")];
        assert_eq!(cursor.unseen(&trimmed), &[entry("d")]);

        let unrelated = vec![entry("x")];
        assert_eq!(cursor.unseen(&unrelated), &[entry("x")]);
    }
}
