#![no_std]

pub mod axis;
pub mod command;
pub mod encoder;
pub mod error;
pub mod intent;
pub mod notify;
pub mod persistence;
pub mod queue;
pub mod reconciler;
pub mod remote;
pub mod schedule;
pub mod shadow;
pub mod timer_mode;
pub mod transport;

pub use axis::{AxisId, AxisState, StepPlan};
pub use command::{Command, CommandFrame, Frame};
pub use encoder::{EncodeError, FrameEncoder, NecEncoder};
pub use error::Error;
pub use intent::{CapabilityWrite, Event, Intent, Outcome};
pub use notify::{Notice, Notifier};
pub use persistence::{KeyValueStore, PersistenceError, StoreValue};
pub use queue::{CommandQueue, QueueConfig, MAX_QUEUE_DEPTH, MIN_INTERVAL};
pub use reconciler::{Reconciler, ReconcilerConfig, SettleTimings};
pub use remote::{CandleMode, CommandSet, DimDirection, Remote, RemoteConfig, TimerDuration};
pub use schedule::ScheduledTask;
pub use shadow::{DeviceShadowState, Switch};
pub use timer_mode::{TimerMode, TimerPlan};
pub use transport::{Transport, TransportError};

pub use embassy_time::{Duration, Instant};
