use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pavotify_core::{Notice, Outcome, Phase, RejectReason};
use pavotify_engine::{
    EngineEvent, HistoryStore, MemorySlot, ProgressSink, SessionController, SessionResult,
    SessionSettings, SimulatedTransfer, Transfer, TransferFault, VirtualScheduler,
};
use pretty_assertions::assert_eq;

const START: i64 = 1_760_000_000_000;
const URL: &str = "https://open.example/track/AbCd1234EfGh";

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

struct FailingTransfer {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Transfer for FailingTransfer {
    async fn perform(&self, _url: &str, _dest: &str) -> Result<(), TransferFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TransferFault::Other("backend unavailable".to_string()))
    }
}

struct Harness {
    controller: Arc<SessionController>,
    slot: Arc<MemorySlot>,
    scheduler: Arc<VirtualScheduler>,
    sink: Arc<TestSink>,
}

fn harness_with(transfer: Option<Arc<dyn Transfer>>) -> Harness {
    pavotify_logging::initialize_for_tests();
    let slot = Arc::new(MemorySlot::new());
    let scheduler = Arc::new(VirtualScheduler::starting_at(START));
    let sink = Arc::new(TestSink::default());
    let history = Arc::new(HistoryStore::open(slot.clone()));
    let transfer = transfer.unwrap_or_else(|| {
        Arc::new(SimulatedTransfer::new(
            scheduler.clone(),
            Duration::from_millis(100),
        )) as Arc<dyn Transfer>
    });
    let controller = Arc::new(SessionController::new(
        history,
        transfer,
        scheduler.clone(),
        sink.clone(),
        SessionSettings::default(),
    ));
    Harness {
        controller,
        slot,
        scheduler,
        sink,
    }
}

fn harness() -> Harness {
    harness_with(None)
}

fn progress_percents(events: &[EngineEvent]) -> Vec<u8> {
    let mut percents: Vec<u8> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Progress(view)
                if matches!(view.phase, Phase::Running | Phase::Succeeded) =>
            {
                Some(view.progress_percent)
            }
            _ => None,
        })
        .collect();
    percents.dedup();
    percents
}

fn notices(events: &[EngineEvent]) -> Vec<Notice> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Notice(notice) => Some(notice.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn missing_inputs_are_rejected_without_touching_history() {
    let h = harness();
    for (url, dest) in [("", "/tmp"), ("url", "")] {
        let result = h.controller.start(url, dest).await;
        assert_eq!(result, SessionResult::Rejected(RejectReason::MissingInput));
    }
    assert!(h.controller.history().snapshot().is_empty());
    assert_eq!(h.slot.writes(), 0);
    assert!(h.scheduler.sleeps().is_empty());
    assert_eq!(
        notices(&h.sink.take()),
        vec![Notice::MissingInput, Notice::MissingInput]
    );
    assert_eq!(h.controller.view().phase, Phase::Idle);
}

#[tokio::test]
async fn successful_session_records_one_completed_entry() {
    let h = harness();
    let result = h.controller.start(URL, "/music").await;

    let entry = match result {
        SessionResult::Completed(entry) => entry,
        other => panic!("expected a settled session, got {other:?}"),
    };
    assert_eq!(entry.outcome(), Outcome::Completed);
    assert_eq!(entry.display_title(), "Track AbCd1234");
    assert_eq!(entry.source_url(), URL);
    assert_eq!(entry.destination_path(), "/music");

    let log = h.controller.history().snapshot();
    assert_eq!(log.len(), 1);
    assert_eq!(log.first(), Some(&entry));
    assert_eq!(h.slot.writes(), 1);
    assert_eq!(h.controller.view().phase, Phase::Idle);
}

#[tokio::test]
async fn progress_is_monotonic_in_steps_of_ten() {
    let h = harness();
    h.controller.start(URL, "/music").await;
    let events = h.sink.take();

    assert_eq!(
        progress_percents(&events),
        vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]
    );
    assert_eq!(
        notices(&events),
        vec![Notice::DownloadCompleted {
            title: "Track AbCd1234".to_string()
        }]
    );
    let last = events.last().unwrap();
    assert!(matches!(last, EngineEvent::Progress(view) if view.phase == Phase::Idle && !view.busy));
}

#[tokio::test]
async fn timings_follow_transfer_steps_and_settle_delay() {
    let h = harness();
    let result = h.controller.start(URL, "/music").await;

    let mut expected = vec![Duration::from_millis(100)];
    expected.extend(std::iter::repeat(Duration::from_millis(200)).take(11));
    expected.push(Duration::from_millis(2000));
    assert_eq!(h.scheduler.sleeps(), expected);

    // Entry is stamped when the session settles, before the settle delay.
    let settled_at = START + 100 + 11 * 200;
    assert_eq!(result.entry().unwrap().created_at(), settled_at);
    assert_eq!(result.entry().unwrap().id().to_string(), settled_at.to_string());
}

#[tokio::test]
async fn transfer_fault_records_one_failed_entry_and_skips_settle_delay() {
    let transfer = Arc::new(FailingTransfer {
        calls: AtomicUsize::new(0),
    });
    let h = harness_with(Some(transfer.clone() as Arc<dyn Transfer>));

    let result = h.controller.start(URL, "/music").await;

    assert_eq!(transfer.calls.load(Ordering::SeqCst), 1);
    let entry = result.entry().expect("failed sessions still settle");
    assert_eq!(entry.outcome(), Outcome::Failed);
    assert_eq!(h.controller.history().snapshot().len(), 1);
    assert!(h.scheduler.sleeps().is_empty());
    assert_eq!(h.controller.view().phase, Phase::Idle);
    assert_eq!(
        notices(&h.sink.take()),
        vec![Notice::DownloadFailed {
            reason: "backend unavailable".to_string()
        }]
    );
}

#[tokio::test]
async fn consecutive_sessions_get_distinct_ids() {
    let h = harness();
    let first = h.controller.start(URL, "/a").await;
    let second = h.controller.start(URL, "/b").await;
    let (a, b) = (first.entry().unwrap(), second.entry().unwrap());
    assert_ne!(a.id(), b.id());

    let log = h.controller.history().snapshot();
    assert_eq!(log.len(), 2);
    assert_eq!(log.first().unwrap().destination_path(), "/b");
}

struct GateTransfer {
    release: tokio::sync::Notify,
    entered: tokio::sync::Notify,
}

#[async_trait::async_trait]
impl Transfer for GateTransfer {
    async fn perform(&self, _url: &str, _dest: &str) -> Result<(), TransferFault> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

#[tokio::test]
async fn start_while_running_is_rejected() {
    let gate = Arc::new(GateTransfer {
        release: tokio::sync::Notify::new(),
        entered: tokio::sync::Notify::new(),
    });
    let h = harness_with(Some(gate.clone() as Arc<dyn Transfer>));

    let controller = h.controller.clone();
    let running = tokio::spawn(async move { controller.start(URL, "/music").await });
    gate.entered.notified().await;

    assert!(h.controller.view().busy);
    let second = h.controller.start("https://other/track/X", "/other").await;
    assert_eq!(second, SessionResult::Rejected(RejectReason::AlreadyRunning));

    gate.release.notify_one();
    let first = running.await.unwrap();
    assert_eq!(first.entry().unwrap().outcome(), Outcome::Completed);
    assert_eq!(h.controller.history().snapshot().len(), 1);
}

/// Hangs on the first call, succeeds afterwards.
struct StallOnceTransfer {
    stalled: AtomicUsize,
}

#[async_trait::async_trait]
impl Transfer for StallOnceTransfer {
    async fn perform(&self, _url: &str, _dest: &str) -> Result<(), TransferFault> {
        if self.stalled.fetch_add(1, Ordering::SeqCst) == 0 {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

#[tokio::test]
async fn dropping_a_running_session_returns_controller_to_idle() {
    let transfer = Arc::new(StallOnceTransfer {
        stalled: AtomicUsize::new(0),
    });
    let h = harness_with(Some(transfer as Arc<dyn Transfer>));

    let timed_out =
        tokio::time::timeout(Duration::from_millis(10), h.controller.start(URL, "/music")).await;
    assert!(timed_out.is_err());

    let view = h.controller.view();
    assert_eq!(view.phase, Phase::Idle);
    assert!(!view.busy);
    assert!(h.controller.history().snapshot().is_empty());
    let last = h.sink.take().pop().unwrap();
    assert!(matches!(last, EngineEvent::Progress(view) if view.phase == Phase::Idle));

    let retry = h.controller.start(URL, "/music").await;
    assert_eq!(retry.entry().unwrap().outcome(), Outcome::Completed);
    assert_eq!(h.controller.history().snapshot().len(), 1);
}
