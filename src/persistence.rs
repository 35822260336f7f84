use heapless::String;

/// Maximum length of a textual value in the store
pub const TEXT_CAPACITY: usize = 16;

/// Error type for the persistence operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceError {
    Busy,
    DriverError,
}

/// Scalar value kept per key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreValue {
    Flag(bool),
    Level(i32),
    Text(String<TEXT_CAPACITY>),
}

impl StoreValue {
    pub fn text(value: &str) -> Option<Self> {
        String::try_from(value).ok().map(Self::Text)
    }

    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            _ => None,
        }
    }

    pub const fn as_level(&self) -> Option<i32> {
        match self {
            Self::Level(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Key/value store that survives restarts
pub trait KeyValueStore {
    /// Get the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<StoreValue>;

    /// Store `value` under `key`
    fn set(&mut self, key: &str, value: StoreValue) -> Result<(), PersistenceError>;
}
