#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use embassy_time::{Duration, Instant, Timer};
use myrtio_ir_remote::{
    Command, CommandQueue, DeviceShadowState, Frame, KeyValueStore, NecEncoder, Notice, Notifier,
    PersistenceError, QueueConfig, ReconcilerConfig, SettleTimings, StoreValue, Transport,
    TransportError,
};

/// Transmission seen by the fake transmitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Named(Command, u8),
    Frame(Vec<u8>, u8),
}

#[derive(Debug, Clone)]
pub struct Transmission {
    pub started: Instant,
    pub finished: Instant,
    pub sent: Sent,
}

/// Transmitter recording every successful transmission.
///
/// Failures are scripted by attempt index, counting failed attempts too.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    log: Rc<RefCell<Vec<Transmission>>>,
    failures: Rc<RefCell<HashMap<usize, TransportError>>>,
    attempts: Rc<Cell<usize>>,
    active: Rc<Cell<bool>>,
    delay: Duration,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn fail_at(&self, attempt: usize, error: TransportError) {
        self.failures.borrow_mut().insert(attempt, error);
    }

    pub fn transmissions(&self) -> Vec<Transmission> {
        self.log.borrow().clone()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.log.borrow().iter().map(|t| t.sent.clone()).collect()
    }

    /// Named commands sent so far, repeat bursts included
    pub fn commands(&self) -> Vec<Command> {
        self.log
            .borrow()
            .iter()
            .filter_map(|t| match t.sent {
                Sent::Named(command, _) => Some(command),
                Sent::Frame(..) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    async fn record(&mut self, sent: Sent) -> Result<(), TransportError> {
        assert!(!self.active.get(), "overlapping transmissions");
        let attempt = self.attempts.get();
        self.attempts.set(attempt + 1);
        if let Some(error) = self.failures.borrow_mut().remove(&attempt) {
            return Err(error);
        }

        let _active = ActiveGuard::enter(&self.active);
        let started = Instant::now();
        if self.delay > Duration::from_ticks(0) {
            Timer::after(self.delay).await;
        }
        self.log.borrow_mut().push(Transmission {
            started,
            finished: Instant::now(),
            sent,
        });
        Ok(())
    }
}

/// Clears the active flag even if the transmission future is dropped
struct ActiveGuard(Rc<Cell<bool>>);

impl ActiveGuard {
    fn enter(active: &Rc<Cell<bool>>) -> Self {
        active.set(true);
        Self(active.clone())
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Transport for RecordingTransport {
    async fn transmit(&mut self, frame: &Frame, repetitions: u8) -> Result<(), TransportError> {
        self.record(Sent::Frame(frame.symbols().to_vec(), repetitions))
            .await
    }

    async fn transmit_named(
        &mut self,
        command: Command,
        repetitions: u8,
    ) -> Result<(), TransportError> {
        self.record(Sent::Named(command, repetitions)).await
    }
}

/// In-memory store shared between the test and the reconciler
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, StoreValue>>>,
    failing: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `state` as if a previous run had saved it
    pub fn seeded(state: &DeviceShadowState) -> Self {
        let mut store = Self::new();
        state.persist(&mut store).expect("seeding store");
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn value(&self, key: &str) -> Option<StoreValue> {
        self.values.borrow().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoreValue> {
        self.value(key)
    }

    fn set(&mut self, key: &str, value: StoreValue) -> Result<(), PersistenceError> {
        if self.failing.get() {
            return Err(PersistenceError::DriverError);
        }
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct CollectingNotifier {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

/// Queue settings short enough for tests
pub fn fast_queue_config() -> QueueConfig {
    QueueConfig {
        min_interval: Duration::from_millis(2),
        long_press_settle: Duration::from_millis(1),
        rate_limit_backoff: Duration::from_millis(5),
        ..QueueConfig::DEFAULT
    }
}

pub fn fast_queue(transport: RecordingTransport) -> CommandQueue<RecordingTransport, NecEncoder> {
    CommandQueue::new(transport, NecEncoder::default(), fast_queue_config())
}

/// Reconciler settings short enough for tests
pub fn fast_reconciler_config() -> ReconcilerConfig {
    let settle = Duration::from_millis(1);
    ReconcilerConfig {
        timings: SettleTimings {
            step: settle,
            timer_press: settle,
            boot: settle,
            stage: settle,
            star_stage: settle,
        },
        auto_off_delay: Duration::from_millis(0),
    }
}
