//! Registered notification names.
//!
//! MultiClamp Commander and its clients register these strings with the host
//! OS to obtain broadcast message ids. They must match byte-for-byte.

use std::fmt;
use std::str::FromStr;

/// Client asks a server to start sending telegraphs for a channel.
pub const OPEN_MESSAGE: &str = "MultiClampTelegraphOpenMsg";
/// Client stops receiving telegraphs for a channel.
pub const CLOSE_MESSAGE: &str = "MultiClampTelegraphCloseMsg";
/// Client asks for one telegraph record immediately.
pub const REQUEST_MESSAGE: &str = "MultiClampTelegraphRequestMsg";
/// Client scans for 700A servers.
pub const SCAN_MESSAGE: &str = "MultiClampTelegraphScanMsg";
/// Server restarted; clients should re-open their channels.
pub const RECONNECT_MESSAGE: &str = "MultiClampTelegraphReconnectMsg";
/// Client asks every server to identify itself.
pub const BROADCAST_MESSAGE: &str = "MultiClampTelegraphBroadcastMsg";
/// Server identifies one channel in reply to a scan or broadcast.
pub const ID_MESSAGE: &str = "MultiClampTelegraphIdMsg";
/// Client requests the amplifier configuration.
pub const CONFIG_REQUEST_MESSAGE: &str = "MultiClampConfigRequestMsg";
/// Server has sent the amplifier configuration.
pub const CONFIG_SENT_MESSAGE: &str = "MultiClampConfigSentMsg";
/// Commander lock state changed.
pub const COMMANDER_LOCK_MESSAGE: &str = "MultiClampCommanderLock";

/// Kinds of telegraph notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelegraphMessage {
    Open,
    Close,
    Request,
    Scan,
    Reconnect,
    Broadcast,
    Id,
    ConfigRequest,
    ConfigSent,
    CommanderLock,
}

impl TelegraphMessage {
    pub const ALL: [TelegraphMessage; 10] = [
        TelegraphMessage::Open,
        TelegraphMessage::Close,
        TelegraphMessage::Request,
        TelegraphMessage::Scan,
        TelegraphMessage::Reconnect,
        TelegraphMessage::Broadcast,
        TelegraphMessage::Id,
        TelegraphMessage::ConfigRequest,
        TelegraphMessage::ConfigSent,
        TelegraphMessage::CommanderLock,
    ];

    /// The registered message string.
    pub fn as_str(self) -> &'static str {
        match self {
            TelegraphMessage::Open => OPEN_MESSAGE,
            TelegraphMessage::Close => CLOSE_MESSAGE,
            TelegraphMessage::Request => REQUEST_MESSAGE,
            TelegraphMessage::Scan => SCAN_MESSAGE,
            TelegraphMessage::Reconnect => RECONNECT_MESSAGE,
            TelegraphMessage::Broadcast => BROADCAST_MESSAGE,
            TelegraphMessage::Id => ID_MESSAGE,
            TelegraphMessage::ConfigRequest => CONFIG_REQUEST_MESSAGE,
            TelegraphMessage::ConfigSent => CONFIG_SENT_MESSAGE,
            TelegraphMessage::CommanderLock => COMMANDER_LOCK_MESSAGE,
        }
    }

    /// Returns true if the notification payload is a packed channel id.
    pub fn carries_channel_id(self) -> bool {
        matches!(
            self,
            TelegraphMessage::Open
                | TelegraphMessage::Close
                | TelegraphMessage::Request
                | TelegraphMessage::Reconnect
                | TelegraphMessage::Id
        )
    }
}

impl fmt::Display for TelegraphMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised notification name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown telegraph message: {0}")]
pub struct UnknownMessage(pub String);

impl FromStr for TelegraphMessage {
    type Err = UnknownMessage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TelegraphMessage::ALL
            .into_iter()
            .find(|msg| msg.as_str() == s)
            .ok_or_else(|| UnknownMessage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_parse_back() {
        for msg in TelegraphMessage::ALL {
            assert_eq!(msg.as_str().parse::<TelegraphMessage>().unwrap(), msg);
        }

        let mut names: Vec<_> = TelegraphMessage::ALL.iter().map(|m| m.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TelegraphMessage::ALL.len());
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "MultiClampTelegraphOpen".parse::<TelegraphMessage>().unwrap_err();
        assert_eq!(err, UnknownMessage("MultiClampTelegraphOpen".to_string()));
    }

    #[test]
    fn only_channel_messages_carry_ids() {
        assert!(TelegraphMessage::Open.carries_channel_id());
        assert!(TelegraphMessage::Id.carries_channel_id());
        assert!(!TelegraphMessage::Broadcast.carries_channel_id());
        assert!(!TelegraphMessage::Scan.carries_channel_id());
        assert!(!TelegraphMessage::CommanderLock.carries_channel_id());
    }
}
