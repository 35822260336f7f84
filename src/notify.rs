/// User-facing notices raised by the reconciler and remotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A change was recorded while the projector is off
    ProjectorOff,
    /// A nebula brightness change was recorded while the projector is off
    ProjectorOffBrightness,
    /// A nebula on/off change was recorded while the projector is off
    ProjectorOffNebula,
    /// A star on/off change was recorded while the projector is off
    ProjectorOffStars,
    /// A command code or name without encoder mapping was requested
    UnknownCommand(Option<u32>),
}

impl Notice {
    pub const fn message(self) -> &'static str {
        match self {
            Self::ProjectorOff => "The projector is off. The change will be applied when it is turned on.",
            Self::ProjectorOffBrightness => {
                "The projector is off. The brightness will be applied when it is turned on."
            }
            Self::ProjectorOffNebula => {
                "The projector is off. The nebula setting will be applied when it is turned on."
            }
            Self::ProjectorOffStars => {
                "The projector is off. The star setting will be applied when it is turned on."
            }
            Self::UnknownCommand(_) => "Unknown IR command",
        }
    }
}

/// Fire-and-forget sink for user notices.
///
/// Delivery is best effort: implementations log their own failures and
/// never report them back.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}
