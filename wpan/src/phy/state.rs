//! Transceiver states and confirm statuses.

/// The operating state of the transceiver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrxState {
    /// The transceiver is disabled.
    #[default]
    Off,
    /// The receiver is enabled.
    RxOn,
    /// The transmitter is enabled.
    TxOn,
    /// The transceiver is receiving a frame.
    BusyRx,
    /// The transceiver is transmitting a frame.
    BusyTx,
    /// The transceiver was switched off immediately.
    ForceOff,
}

impl TrxState {
    /// Return `true` when this state may be requested through the
    /// Set-Trx-State service.
    pub fn is_requestable(&self) -> bool {
        matches!(
            self,
            TrxState::RxOn | TrxState::Off | TrxState::TxOn | TrxState::ForceOff
        )
    }
}

/// The status carried by a confirm primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// The request completed.
    Success,
    /// CCA found the channel busy.
    ChannelBusy,
    /// CCA found the channel idle.
    Idle,
    /// The transceiver is receiving.
    BusyRx,
    /// The transceiver is transmitting.
    BusyTx,
    /// The transceiver is off.
    TrxOff,
    /// The receiver is on.
    RxOn,
    /// The transmitter is on.
    TxOn,
    /// The transceiver was forced off.
    ForceTrxOff,
    /// A PIB attribute value is out of range.
    InvalidParameter,
    /// The PIB attribute is not known.
    UnsupportedAttribute,
    /// The MSDU does not fit in a frame.
    FrameTooLong,
    /// No room is left to track another transaction.
    TransactionOverflow,
    /// No pending transaction carries the given handle.
    InvalidHandle,
}

impl Status {
    /// Return the state this status reports, if any.
    pub fn as_state(&self) -> Option<TrxState> {
        Some(match self {
            Status::TrxOff => TrxState::Off,
            Status::RxOn => TrxState::RxOn,
            Status::TxOn => TrxState::TxOn,
            Status::BusyRx => TrxState::BusyRx,
            Status::BusyTx => TrxState::BusyTx,
            Status::ForceTrxOff => TrxState::ForceOff,
            _ => return None,
        })
    }
}

impl From<TrxState> for Status {
    fn from(state: TrxState) -> Self {
        match state {
            TrxState::Off => Status::TrxOff,
            TrxState::RxOn => Status::RxOn,
            TrxState::TxOn => Status::TxOn,
            TrxState::BusyRx => Status::BusyRx,
            TrxState::BusyTx => Status::BusyTx,
            TrxState::ForceOff => Status::ForceTrxOff,
        }
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::ChannelBusy => write!(f, "channel busy"),
            Status::Idle => write!(f, "idle"),
            Status::BusyRx => write!(f, "busy receiving"),
            Status::BusyTx => write!(f, "busy transmitting"),
            Status::TrxOff => write!(f, "transceiver off"),
            Status::RxOn => write!(f, "receiver on"),
            Status::TxOn => write!(f, "transmitter on"),
            Status::ForceTrxOff => write!(f, "transceiver forced off"),
            Status::InvalidParameter => write!(f, "invalid parameter"),
            Status::UnsupportedAttribute => write!(f, "unsupported attribute"),
            Status::FrameTooLong => write!(f, "frame too long"),
            Status::TransactionOverflow => write!(f, "transaction overflow"),
            Status::InvalidHandle => write!(f, "invalid handle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_status_mapping() {
        for state in [
            TrxState::Off,
            TrxState::RxOn,
            TrxState::TxOn,
            TrxState::BusyRx,
            TrxState::BusyTx,
            TrxState::ForceOff,
        ] {
            assert_eq!(Status::from(state).as_state(), Some(state));
        }

        assert_eq!(Status::Success.as_state(), None);
        assert_eq!(Status::InvalidParameter.as_state(), None);
    }

    #[test]
    fn requestable_states() {
        assert!(TrxState::RxOn.is_requestable());
        assert!(TrxState::ForceOff.is_requestable());
        assert!(!TrxState::BusyRx.is_requestable());
        assert!(!TrxState::BusyTx.is_requestable());
    }
}
