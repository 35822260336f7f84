//! Serialized, paced transmission queue.
//!
//! Every transmission goes through a single [`CommandQueue`]. The queue keeps
//! at most one transmission in flight, serves entries strictly in submission
//! order and keeps consecutive transmissions at least `min_interval` apart.
//! It holds at most [`MAX_QUEUE_DEPTH`] entries, the one in flight included.
//! The bookkeeping lives behind a critical section, so senders on different
//! tasks share one queue by reference.

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::{Context, Poll};

use critical_section::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex as AsyncMutex;
use embassy_sync::waitqueue::MultiWakerRegistration;
use embassy_time::{Duration, Instant, Timer};
use heapless::Deque;

use crate::command::{Command, CommandFrame, Frame};
use crate::encoder::FrameEncoder;
use crate::error::Error;
use crate::transport::{Transport, TransportError};

/// Maximum number of entries in the queue, the one in flight included
pub const MAX_QUEUE_DEPTH: usize = 5;

/// Minimum pause between the end of one transmission and the next
pub const MIN_INTERVAL: Duration = Duration::from_millis(250);

const DEFAULT_REPETITIONS: u8 = 3;
const LONG_PRESS_MIN_REPETITIONS: u8 = 8;
const LONG_PRESS_SETTLE: Duration = Duration::from_millis(200);
const RATE_LIMIT_BACKOFF: Duration = Duration::from_millis(1000);

/// Timing and repetition settings of the queue
#[derive(Debug, Clone, Copy)]
pub struct QueueConfig {
    /// Minimum pause between two transmissions
    pub min_interval: Duration,
    /// How many times the transmitter repeats each frame
    pub repetitions: u8,
    /// Lower bound for the repeat burst of a long press
    pub long_press_min_repetitions: u8,
    /// Pause after a repeat burst
    pub long_press_settle: Duration,
    /// Backoff after a rate-limited transmission
    pub rate_limit_backoff: Duration,
}

impl QueueConfig {
    pub const DEFAULT: Self = Self {
        min_interval: MIN_INTERVAL,
        repetitions: DEFAULT_REPETITIONS,
        long_press_min_repetitions: LONG_PRESS_MIN_REPETITIONS,
        long_press_settle: LONG_PRESS_SETTLE,
        rate_limit_backoff: RATE_LIMIT_BACKOFF,
    };

    /// Repetition count of the long-press repeat burst
    pub const fn burst_repetitions(&self) -> u8 {
        if self.repetitions > self.long_press_min_repetitions {
            self.repetitions
        } else {
            self.long_press_min_repetitions
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

struct QueueState {
    pending: Deque<u32, MAX_QUEUE_DEPTH>,
    in_flight: Option<u32>,
    next_ticket: u32,
    last_completed: Option<Instant>,
    waiters: MultiWakerRegistration<MAX_QUEUE_DEPTH>,
}

impl QueueState {
    const fn new() -> Self {
        Self {
            pending: Deque::new(),
            in_flight: None,
            next_ticket: 0,
            last_completed: None,
            waiters: MultiWakerRegistration::new(),
        }
    }

    fn len(&self) -> usize {
        self.pending.len() + usize::from(self.in_flight.is_some())
    }

    /// Reserve a place at the back of the queue
    ///
    /// Returns None if the queue is full
    fn enqueue(&mut self) -> Option<u32> {
        if self.len() >= MAX_QUEUE_DEPTH {
            return None;
        }
        let ticket = self.next_ticket;
        self.pending.push_back(ticket).ok()?;
        self.next_ticket = self.next_ticket.wrapping_add(1);
        Some(ticket)
    }

    /// Ready once the ticket is at the front and nothing is in flight
    fn poll_turn(&mut self, ticket: u32, cx: &Context<'_>) -> Poll<()> {
        if self.in_flight.is_none() && self.pending.front() == Some(&ticket) {
            self.pending.pop_front();
            self.in_flight = Some(ticket);
            return Poll::Ready(());
        }
        self.waiters.register(cx.waker());
        Poll::Pending
    }

    /// Release the ticket, whether it was served or abandoned while waiting
    fn finish(&mut self, ticket: u32, now: Instant) {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            self.last_completed = Some(now);
        } else {
            for _ in 0..self.pending.len() {
                if let Some(waiting) = self.pending.pop_front() {
                    if waiting != ticket {
                        let _ = self.pending.push_back(waiting);
                    }
                }
            }
        }
        self.waiters.wake();
    }
}

/// Completion handle of a queue entry.
///
/// Dropping it hands the transmitter to the next entry, so neither a failed
/// transmission nor a dropped caller can stall the queue.
struct EntryHandle<'a> {
    state: &'a Mutex<RefCell<QueueState>>,
    ticket: u32,
}

impl Drop for EntryHandle<'_> {
    fn drop(&mut self) {
        let now = Instant::now();
        critical_section::with(|cs| {
            self.state.borrow(cs).borrow_mut().finish(self.ticket, now);
        });
    }
}

/// Single shared queue in front of the IR transmitter
pub struct CommandQueue<T: Transport, E: FrameEncoder> {
    state: Mutex<RefCell<QueueState>>,
    transport: AsyncMutex<CriticalSectionRawMutex, T>,
    encoder: E,
    config: QueueConfig,
}

impl<T: Transport, E: FrameEncoder> CommandQueue<T, E> {
    pub const fn new(transport: T, encoder: E, config: QueueConfig) -> Self {
        Self {
            state: Mutex::new(RefCell::new(QueueState::new())),
            transport: AsyncMutex::new(transport),
            encoder,
            config,
        }
    }

    pub const fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Number of entries waiting behind the one in flight
    pub fn pending(&self) -> usize {
        critical_section::with(|cs| self.state.borrow(cs).borrow().pending.len())
    }

    /// Returns true while a transmission is in flight
    pub fn is_busy(&self) -> bool {
        critical_section::with(|cs| self.state.borrow(cs).borrow().in_flight.is_some())
    }

    /// Resolve a symbolic command name and submit it.
    ///
    /// Unknown names fail before touching the queue.
    pub async fn submit_named(&self, name: &str, long_press: bool) -> Result<(), Error> {
        let Some(command) = Command::parse_from_str(name) else {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("queue: unknown command {}", name);
            return Err(Error::UnknownCommand);
        };
        self.submit_command(command, long_press).await
    }

    /// Submit a symbolic command, followed by a repeat burst on long press
    pub async fn submit_command(&self, command: Command, long_press: bool) -> Result<(), Error> {
        self.submit(CommandFrame::Named {
            command,
            long_press,
        })
        .await
    }

    /// Submit a pre-encoded frame, followed by a repeat burst if requested
    pub async fn submit_raw(&self, frame: Frame, repeat: bool) -> Result<(), Error> {
        self.submit(CommandFrame::Raw { frame, repeat }).await
    }

    /// Encode a bare command code and submit the resulting frame.
    ///
    /// Codes without an encoder mapping fail before touching the queue.
    pub async fn submit_code(&self, code: u32) -> Result<(), Error> {
        let frame = self.encoder.encode(code).map_err(|_e| {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("queue: failed to encode 0x{:X}: {:?}", code, _e);
            Error::from(_e)
        })?;
        self.submit(CommandFrame::Single(frame)).await
    }

    /// Wait for the turn of the entry, pace, and transmit it.
    ///
    /// Fails immediately with [`Error::QueueFull`] if the queue already holds
    /// [`MAX_QUEUE_DEPTH`] entries. A rejected entry leaves pacing untouched.
    pub async fn submit(&self, frame: CommandFrame) -> Result<(), Error> {
        let ticket = critical_section::with(|cs| self.state.borrow(cs).borrow_mut().enqueue());
        let Some(ticket) = ticket else {
            #[cfg(feature = "esp32-log")]
            esp_println::println!(
                "queue: queue full ({}), dropping {:?}",
                MAX_QUEUE_DEPTH,
                frame
            );
            return Err(Error::QueueFull);
        };
        let _entry = EntryHandle {
            state: &self.state,
            ticket,
        };

        poll_fn(|cx| {
            critical_section::with(|cs| self.state.borrow(cs).borrow_mut().poll_turn(ticket, cx))
        })
        .await;

        self.pace().await;

        let mut transport = self.transport.lock().await;
        self.transmit(&mut transport, &frame).await
    }

    /// Suspend until `min_interval` has passed since the last completion
    async fn pace(&self) {
        let last = critical_section::with(|cs| self.state.borrow(cs).borrow().last_completed);
        let Some(last) = last else {
            return;
        };
        let elapsed = Instant::now().saturating_duration_since(last);
        if elapsed < self.config.min_interval {
            let wait = self.config.min_interval - elapsed;
            #[cfg(feature = "esp32-log")]
            esp_println::println!("queue: rate limiting, waiting {}ms", wait.as_millis());
            Timer::after(wait).await;
        }
    }

    async fn transmit(&self, transport: &mut T, frame: &CommandFrame) -> Result<(), Error> {
        #[cfg(feature = "esp32-log")]
        esp_println::println!("queue: sending {:?}", frame);

        let repetitions = self.config.repetitions;
        let mut result = match frame {
            CommandFrame::Named { command, .. } => {
                transport.transmit_named(*command, repetitions).await
            }
            CommandFrame::Raw { frame, .. } | CommandFrame::Single(frame) => {
                transport.transmit(frame, repetitions).await
            }
        };
        if result.is_ok() && frame.has_burst() {
            result = self.repeat_burst(transport).await;
        }

        match result {
            Ok(()) => Ok(()),
            Err(TransportError::RateLimited) => {
                let backoff = self.config.rate_limit_backoff;
                #[cfg(feature = "esp32-log")]
                esp_println::println!(
                    "queue: rate limit exceeded, backing off {}ms",
                    backoff.as_millis()
                );
                Timer::after(backoff).await;
                Err(Error::RateLimited)
            }
            Err(error) => {
                #[cfg(feature = "esp32-log")]
                esp_println::println!("queue: failed to send {:?}: {:?}", frame, error);
                Err(error.into())
            }
        }
    }

    async fn repeat_burst(&self, transport: &mut T) -> Result<(), TransportError> {
        transport
            .transmit_named(Command::Repeat, self.config.burst_repetitions())
            .await?;
        Timer::after(self.config.long_press_settle).await;
        Ok(())
    }
}
