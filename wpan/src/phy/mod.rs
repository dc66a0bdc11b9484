//! The PHY service layer.
//!
//! [`Phy`] sits between an upper layer, usually the MAC, and a radio driver.
//! Both neighbours talk to it through [`ServiceRegistry`]s:
//!
//! - the upper registry holds the handlers receiving confirms and
//!   indications,
//! - the lower registry holds the driver handlers receiving requests.
//!
//! The upper layer calls the `*_request` methods, the driver calls the
//! `*_confirm` methods and [`Phy::data_indication`]. Every call runs to
//! completion. A driver may confirm from within its request handler, or
//! later.

mod pib;
pub use pib::*;

mod sap;
pub use sap::*;

mod state;
pub use state::*;

use core::cell::{Cell, RefCell};

use critical_section::Mutex;
use wpan_frame::{
    decode, emit_ppdu, DataRequest, FcsMode, FrameEncoder, PpduBuffer, MAX_PHY_PACKET_SIZE,
};

use crate::mac::constants::{PENDING_TRANSACTION_CAPACITY, SOFTWARE_FCS};
use crate::mac::transaction::{PendingTransactions, TransactionKind};
use crate::time::{Duration, Instant};
use crate::Error;

/// A driver handler reporting the actual transceiver state.
pub type StateQuery<'a> = &'a (dyn Fn() -> TrxState + Sync);

/// The handles of pending transactions.
pub type Handles = heapless::Vec<u8, PENDING_TRANSACTION_CAPACITY>;

/// An encoded frame waiting for the transmitter to be enabled.
struct Staged {
    handle: u8,
    ppdu: PpduBuffer,
}

struct Inner {
    state: TrxState,
    /// Target of the outstanding Set-Trx-State request.
    trx_request: Option<TrxState>,
    pib: Pib,
    encoder: FrameEncoder,
    pending: PendingTransactions<PENDING_TRANSACTION_CAPACITY>,
    staged: Option<Staged>,
    in_flight: Option<u8>,
}

/// What follows a Set-Trx-State confirm for a staged frame.
enum AfterTrxConfirm {
    Transmit(Staged),
    Refuse { handle: u8, status: Status },
    Nothing,
}

/// The PHY context: transceiver state, PIB, sequence number and pending
/// transactions, plus the handlers of both neighbouring layers.
pub struct Phy<'a> {
    upper: ServiceRegistry<'a>,
    lower: ServiceRegistry<'a>,
    state_query: Mutex<Cell<Option<StateQuery<'a>>>>,
    inner: Mutex<RefCell<Inner>>,
}

impl Default for Phy<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Phy<'a> {
    /// Create a PHY with the configured FCS mode.
    pub fn new() -> Self {
        Self::with_fcs_mode(if SOFTWARE_FCS {
            FcsMode::Software
        } else {
            FcsMode::Hardware
        })
    }

    /// Create a PHY computing the FCS as given.
    pub fn with_fcs_mode(fcs_mode: FcsMode) -> Self {
        Self {
            upper: ServiceRegistry::new(),
            lower: ServiceRegistry::new(),
            state_query: Mutex::new(Cell::new(None)),
            inner: Mutex::new(RefCell::new(Inner {
                state: TrxState::Off,
                trx_request: None,
                pib: Pib::default(),
                encoder: FrameEncoder::new(fcs_mode),
                pending: PendingTransactions::new(),
                staged: None,
                in_flight: None,
            })),
        }
    }

    /// The handlers of the upper layer: confirms and indications.
    pub fn upper(&self) -> &ServiceRegistry<'a> {
        &self.upper
    }

    /// The handlers of the radio driver: requests.
    pub fn lower(&self) -> &ServiceRegistry<'a> {
        &self.lower
    }

    /// Bind the driver handler reporting the transceiver state.
    pub fn bind_state_query(&self, query: StateQuery<'a>) {
        critical_section::with(|cs| self.state_query.borrow(cs).set(Some(query)));
    }

    /// Clear the state query handler.
    pub fn unbind_state_query(&self) {
        critical_section::with(|cs| self.state_query.borrow(cs).set(None));
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }

    /// Return the tracked transceiver state.
    pub fn state(&self) -> TrxState {
        self.with(|inner| inner.state)
    }

    /// Refresh the tracked state from the driver's state query.
    ///
    /// Without a state query the tracked state is returned unchanged.
    pub fn sync_state(&self) -> TrxState {
        let query = critical_section::with(|cs| self.state_query.borrow(cs).get());

        match query {
            Some(query) => {
                let state = query();
                self.with(|inner| inner.state = state);
                state
            }
            None => self.state(),
        }
    }

    /// Return a copy of the PIB.
    pub fn pib(&self) -> Pib {
        self.with(|inner| inner.pib.clone())
    }

    /// Return the sequence number the next data frame will carry.
    pub fn sequence_number(&self) -> u8 {
        self.with(|inner| inner.encoder.sequence_number())
    }

    /// Return the handles of the pending transactions, oldest first.
    pub fn pending_transactions(&self) -> Handles {
        self.with(|inner| inner.pending.iter().map(|t| t.handle).collect())
    }

    /// Return the handles of the transactions pending for longer than
    /// `persistence`. They are left in place.
    pub fn expired_transactions(&self, now: Instant, persistence: Duration) -> Handles {
        self.with(|inner| {
            inner
                .pending
                .expired(now, persistence)
                .map(|t| t.handle)
                .collect()
        })
    }

    /// PLME-SET-TRX-STATE.request
    ///
    /// Only [`TrxState::RxOn`], [`TrxState::Off`], [`TrxState::TxOn`] and
    /// [`TrxState::ForceOff`] can be requested. Any other target is confirmed
    /// at once with [`Status::BusyRx`].
    ///
    /// Only one request may be outstanding. Issuing another one before the
    /// driver confirms replaces the target: the next confirm applies to the
    /// latest request.
    pub fn set_trx_state_request(&self, state: TrxState) {
        if !state.is_requestable() {
            warn!("refusing transceiver state {:?}", state);
            self.upper.dispatch(Primitive::SetTrxStateConfirm {
                status: Status::BusyRx,
            });
            return;
        }

        let previous = self.with(|inner| inner.trx_request.replace(state));
        if let Some(previous) = previous {
            warn!(
                "transceiver state {:?} requested while {:?} is outstanding",
                state, previous
            );
        }

        debug!("requesting transceiver state {:?}", state);
        self.lower
            .dispatch(Primitive::SetTrxStateRequest { state });
    }

    /// PLME-SET-TRX-STATE.confirm, issued by the driver.
    ///
    /// [`Status::Success`] moves the tracked state to the requested one. A
    /// status naming a state moves the tracked state there. Any other status
    /// leaves it unchanged. The confirm is always forwarded upward, before a
    /// staged frame is transmitted or refused.
    pub fn set_trx_state_confirm(&self, status: Status) {
        let next = self.with(|inner| {
            let request = inner.trx_request.take();

            match (status, request) {
                (Status::Success, Some(target)) => inner.state = target,
                _ => {
                    if let Some(state) = status.as_state() {
                        inner.state = state;
                    }
                }
            }

            trace!("transceiver state {:?}", inner.state);

            match inner.staged.take() {
                Some(staged) if inner.state == TrxState::TxOn => {
                    inner.in_flight = Some(staged.handle);
                    AfterTrxConfirm::Transmit(staged)
                }
                Some(staged) => {
                    inner.pending.remove(staged.handle);
                    AfterTrxConfirm::Refuse {
                        handle: staged.handle,
                        status: inner.state.into(),
                    }
                }
                None => AfterTrxConfirm::Nothing,
            }
        });

        self.upper
            .dispatch(Primitive::SetTrxStateConfirm { status });

        match next {
            AfterTrxConfirm::Transmit(staged) => {
                self.lower.dispatch(Primitive::DataRequest {
                    ppdu: &staged.ppdu,
                });
            }
            AfterTrxConfirm::Refuse { handle, status } => {
                debug!("transmitter not enabled for handle {}: {:?}", handle, status);
                self.upper.dispatch(Primitive::DataConfirm {
                    handle: Some(handle),
                    status,
                });
            }
            AfterTrxConfirm::Nothing => {}
        }
    }

    /// PD-DATA.request
    ///
    /// Only accepted while the transceiver is off. The frame is encoded,
    /// recorded as pending and transmitted once the driver confirms the
    /// transmitter is on. A refused request is confirmed at once with the
    /// reason as status and nothing is sent.
    pub fn data_request(&self, request: &DataRequest<'_>, now: Instant) {
        let handle = request.msdu_handle;

        let refused = self.with(|inner| {
            if inner.state != TrxState::Off {
                return Some(Status::from(inner.state));
            }

            if inner.staged.is_some() || inner.in_flight.is_some() {
                return Some(Status::BusyTx);
            }

            if request.msdu.len() > MAX_PHY_PACKET_SIZE {
                return Some(Status::FrameTooLong);
            }

            if inner.pending.is_full() {
                return Some(Status::TransactionOverflow);
            }

            let Ok(psdu) = inner.encoder.encode(request) else {
                return Some(Status::FrameTooLong);
            };

            let Ok(ppdu) = emit_ppdu(&psdu, inner.encoder.fcs_mode()) else {
                return Some(Status::FrameTooLong);
            };

            if inner
                .pending
                .add(handle, TransactionKind::Data, request.ack_requested(), now)
                .is_err()
            {
                return Some(Status::TransactionOverflow);
            }

            inner.staged = Some(Staged { handle, ppdu });
            None
        });

        match refused {
            Some(status) => {
                debug!("refusing data request {}: {:?}", handle, status);
                self.upper.dispatch(Primitive::DataConfirm {
                    handle: Some(handle),
                    status,
                });
            }
            None => self.set_trx_state_request(TrxState::TxOn),
        }
    }

    /// PD-DATA.confirm, issued by the driver once the transmission is over.
    ///
    /// The receiver is enabled again and `status` is forwarded upward, with
    /// the handle of the frame in flight. Without a frame in flight the
    /// confirm carries no handle.
    pub fn data_confirm(&self, status: Status) {
        let handle = self.with(|inner| {
            let handle = inner.in_flight.take();
            if let Some(handle) = handle {
                inner.pending.remove(handle);
            }
            handle
        });

        if handle.is_none() {
            warn!("data confirm without a transmission in flight");
        }

        self.set_trx_state_request(TrxState::RxOn);
        self.upper
            .dispatch(Primitive::DataConfirm { handle, status });
    }

    /// MCPS-PURGE.request
    ///
    /// Forget the pending transaction with `handle`. A frame still waiting
    /// for the transmitter is dropped.
    pub fn purge_request(&self, handle: u8) -> Status {
        self.with(|inner| {
            if inner.staged.as_ref().is_some_and(|s| s.handle == handle) {
                inner.staged = None;
            }

            match inner.pending.remove(handle) {
                Some(_) => Status::Success,
                None => Status::InvalidHandle,
            }
        })
    }

    /// PD-DATA.indication, issued by the driver with a received PSDU followed
    /// by the link quality and signal strength octets.
    ///
    /// # Errors
    ///
    /// Returns the decode error when the frame is malformed. Nothing is
    /// forwarded in that case.
    pub fn data_indication(&self, buffer: &[u8], declared_length: u8) -> Result<(), Error> {
        let received = decode(buffer, declared_length).map_err(|err| {
            warn!("dropping received frame: {}", err);
            Error::Frame(err)
        })?;

        if !received.fcs_valid {
            debug!("received frame with invalid FCS");
        }

        self.upper
            .dispatch(Primitive::DataIndication(DataIndication::from(&received)));

        Ok(())
    }

    /// Return the status a request needing the receiver is refused with.
    fn refusal_unless_rx_on(&self) -> Option<Status> {
        match self.state() {
            TrxState::RxOn => None,
            state => Some(state.into()),
        }
    }

    /// PLME-CCA.request, only accepted while the receiver is on.
    pub fn cca_request(&self) {
        match self.refusal_unless_rx_on() {
            Some(status) => self.upper.dispatch(Primitive::CcaConfirm { status }),
            None => self.lower.dispatch(Primitive::CcaRequest),
        }
    }

    /// PLME-CCA.confirm, issued by the driver.
    pub fn cca_confirm(&self, status: Status) {
        self.upper.dispatch(Primitive::CcaConfirm { status });
    }

    /// PLME-ED.request, only accepted while the receiver is on.
    pub fn ed_request(&self) {
        match self.refusal_unless_rx_on() {
            Some(status) => self.upper.dispatch(Primitive::EdConfirm {
                status,
                energy_level: 0,
            }),
            None => self.lower.dispatch(Primitive::EdRequest),
        }
    }

    /// PLME-ED.confirm, issued by the driver.
    pub fn ed_confirm(&self, status: Status, energy_level: u8) {
        self.upper.dispatch(Primitive::EdConfirm {
            status,
            energy_level,
        });
    }

    /// PLME-GET.request
    ///
    /// Unknown attributes are confirmed at once with
    /// [`Status::UnsupportedAttribute`]. Other requests go to the driver.
    pub fn get_request(&self, attribute: PibAttributeId) {
        match attribute {
            PibAttributeId::Unknown(_) => self.upper.dispatch(Primitive::GetConfirm {
                status: Status::UnsupportedAttribute,
                attribute,
                value: 0,
            }),
            _ => self.lower.dispatch(Primitive::GetRequest { attribute }),
        }
    }

    /// PLME-GET.confirm, issued by the driver.
    pub fn get_confirm(&self, status: Status, attribute: PibAttributeId, value: u32) {
        self.upper.dispatch(Primitive::GetConfirm {
            status,
            attribute,
            value,
        });
    }

    /// PLME-SET.request
    ///
    /// The value is validated and stored, then the driver is told about it.
    /// A rejected value is confirmed without reaching the driver.
    pub fn set_request(&self, attribute: PibAttributeId, value: u32) {
        let status = self.with(|inner| inner.pib.set(attribute, value));

        if status == Status::Success {
            self.lower
                .dispatch(Primitive::SetRequest { attribute, value });
        } else {
            warn!("rejected {:?} = {}: {:?}", attribute, value, status);
        }

        self.upper
            .dispatch(Primitive::SetConfirm { status, attribute });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::vec::Vec;

    use wpan_frame::{Address, AddressingMode, TxOptions};

    use super::*;
    use crate::mac::constants::DEFAULT_TRANSACTION_PERSISTENCE;

    fn setup() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Transmit(Vec<u8>),
        Received {
            payload: Vec<u8>,
            sequence_number: u8,
            src_address: Address,
            dst_pan_id: Option<u16>,
            link_quality: u8,
        },
        Other(Primitive<'static>),
    }

    impl From<Primitive<'_>> for Event {
        fn from(primitive: Primitive<'_>) -> Self {
            use Primitive::*;

            Event::Other(match primitive {
                DataRequest { ppdu } => return Event::Transmit(ppdu.to_vec()),
                DataIndication(indication) => {
                    return Event::Received {
                        payload: indication.payload.to_vec(),
                        sequence_number: indication.sequence_number,
                        src_address: indication.src_address,
                        dst_pan_id: indication.dst_pan_id,
                        link_quality: indication.link_quality,
                    }
                }
                DataConfirm { handle, status } => DataConfirm { handle, status },
                CcaRequest => CcaRequest,
                CcaConfirm { status } => CcaConfirm { status },
                EdRequest => EdRequest,
                EdConfirm {
                    status,
                    energy_level,
                } => EdConfirm {
                    status,
                    energy_level,
                },
                GetRequest { attribute } => GetRequest { attribute },
                GetConfirm {
                    status,
                    attribute,
                    value,
                } => GetConfirm {
                    status,
                    attribute,
                    value,
                },
                SetTrxStateRequest { state } => SetTrxStateRequest { state },
                SetTrxStateConfirm { status } => SetTrxStateConfirm { status },
                SetRequest { attribute, value } => SetRequest { attribute, value },
                SetConfirm { status, attribute } => SetConfirm { status, attribute },
            })
        }
    }

    /// Records every primitive it receives.
    #[derive(Default)]
    struct Spy {
        events: Mutex<Vec<Event>>,
    }

    impl Spy {
        fn record(&self, primitive: Primitive<'_>) {
            self.events.lock().unwrap().push(primitive.into());
        }

        fn take(&self) -> Vec<Event> {
            core::mem::take(&mut *self.events.lock().unwrap())
        }
    }

    fn bind_all<'a>(registry: &ServiceRegistry<'a>, handler: Handler<'a>) {
        for service in [
            ServiceId::Data,
            ServiceId::Cca,
            ServiceId::Ed,
            ServiceId::Get,
            ServiceId::SetTrxState,
            ServiceId::Set,
        ] {
            for role in [Role::Request, Role::Confirm, Role::Indication] {
                if service.defines(role) {
                    registry.bind(service, role, handler).unwrap();
                }
            }
        }
    }

    fn other(primitive: Primitive<'static>) -> Event {
        Event::Other(primitive)
    }

    fn request(msdu: &[u8]) -> DataRequest<'_> {
        DataRequest {
            dst_addr_mode: AddressingMode::Short,
            dst_pan_id: 0xabcd,
            dst_address: 0xffff,
            src_addr_mode: AddressingMode::Extended,
            src_address: 0x0012_4b00_14b5_d9c7,
            intra_pan: true,
            msdu,
            msdu_handle: 7,
            ..Default::default()
        }
    }

    const T0: Instant = Instant::from_us(0);

    #[test]
    fn trx_state_follows_confirm() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);
        let on_driver = |p: Primitive<'_>| driver.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        phy.set_trx_state_request(TrxState::RxOn);
        assert_eq!(
            driver.take(),
            [other(Primitive::SetTrxStateRequest {
                state: TrxState::RxOn
            })]
        );
        // Nothing changes before the driver confirms.
        assert_eq!(phy.state(), TrxState::Off);
        assert!(upper.take().is_empty());

        phy.set_trx_state_confirm(Status::Success);
        assert_eq!(phy.state(), TrxState::RxOn);
        assert_eq!(
            upper.take(),
            [other(Primitive::SetTrxStateConfirm {
                status: Status::Success
            })]
        );
    }

    #[test]
    fn trx_confirm_status_naming_a_state() {
        setup();
        let upper = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);

        phy.set_trx_state_request(TrxState::TxOn);
        phy.set_trx_state_confirm(Status::BusyTx);
        assert_eq!(phy.state(), TrxState::BusyTx);

        phy.set_trx_state_confirm(Status::InvalidParameter);
        assert_eq!(phy.state(), TrxState::BusyTx);

        assert_eq!(
            upper.take(),
            [
                other(Primitive::SetTrxStateConfirm {
                    status: Status::BusyTx
                }),
                other(Primitive::SetTrxStateConfirm {
                    status: Status::InvalidParameter
                }),
            ]
        );
    }

    #[test]
    fn busy_states_cannot_be_requested() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);
        let on_driver = |p: Primitive<'_>| driver.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        for state in [TrxState::BusyRx, TrxState::BusyTx] {
            phy.set_trx_state_request(state);
            assert_eq!(
                upper.take(),
                [other(Primitive::SetTrxStateConfirm {
                    status: Status::BusyRx
                })]
            );
        }

        assert!(driver.take().is_empty());
        assert_eq!(phy.state(), TrxState::Off);
    }

    #[test]
    fn data_request_transmits_with_synchronous_driver() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);

        let phy = Phy::new();
        let on_driver = |p: Primitive<'_>| {
            driver.record(p);
            match p {
                Primitive::SetTrxStateRequest { .. } => phy.set_trx_state_confirm(Status::Success),
                Primitive::DataRequest { .. } => phy.data_confirm(Status::Success),
                _ => {}
            }
        };
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        phy.data_request(&request(&[0x2b, 0x00, 0x00, 0x00]), T0);

        let ppdu = hex::decode("00000000a71541c800cdabffffc7d9b514004b12002b000000").unwrap();
        assert_eq!(
            driver.take(),
            [
                other(Primitive::SetTrxStateRequest {
                    state: TrxState::TxOn
                }),
                Event::Transmit(ppdu),
                other(Primitive::SetTrxStateRequest {
                    state: TrxState::RxOn
                }),
            ]
        );

        // Both state changes are confirmed, the receiver is back on before
        // the data confirm.
        assert_eq!(
            upper.take(),
            [
                other(Primitive::SetTrxStateConfirm {
                    status: Status::Success
                }),
                other(Primitive::SetTrxStateConfirm {
                    status: Status::Success
                }),
                other(Primitive::DataConfirm {
                    handle: Some(7),
                    status: Status::Success
                }),
            ]
        );

        assert_eq!(phy.state(), TrxState::RxOn);
        assert_eq!(phy.sequence_number(), 1);
        assert!(phy.pending_transactions().is_empty());
    }

    #[test]
    fn data_request_needs_trx_off() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);

        let phy = Phy::new();
        let on_driver = |p: Primitive<'_>| {
            driver.record(p);
            match p {
                Primitive::SetTrxStateRequest { .. } => phy.set_trx_state_confirm(Status::Success),
                Primitive::DataRequest { .. } => phy.data_confirm(Status::Success),
                _ => {}
            }
        };
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        phy.data_request(&request(b"first"), T0);
        upper.take();
        driver.take();

        // The receiver is on after the first transmission.
        phy.data_request(&request(b"second"), T0);
        assert_eq!(
            upper.take(),
            [other(Primitive::DataConfirm {
                handle: Some(7),
                status: Status::RxOn
            })]
        );
        assert!(driver.take().is_empty());
        assert_eq!(phy.sequence_number(), 1);

        phy.set_trx_state_request(TrxState::Off);
        phy.data_request(&request(b"third"), T0);

        let events = driver.take();
        let Some(Event::Transmit(ppdu)) = events.get(2) else {
            panic!("no transmission in {events:?}");
        };
        // Sequence number of the second frame sent.
        assert_eq!(ppdu[8], 1);
    }

    #[test]
    fn data_request_refused_when_transmitter_stays_off() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);
        let on_driver = |p: Primitive<'_>| driver.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        phy.data_request(&request(b"hello"), T0);
        assert_eq!(phy.pending_transactions(), [7]);

        // A second request while the first one waits for the transmitter.
        phy.data_request(&request(b"again"), T0);
        assert_eq!(
            upper.take(),
            [other(Primitive::DataConfirm {
                handle: Some(7),
                status: Status::BusyTx
            })]
        );

        phy.set_trx_state_confirm(Status::BusyRx);

        assert_eq!(
            driver.take(),
            [other(Primitive::SetTrxStateRequest {
                state: TrxState::TxOn
            })]
        );
        assert_eq!(
            upper.take(),
            [
                other(Primitive::SetTrxStateConfirm {
                    status: Status::BusyRx
                }),
                other(Primitive::DataConfirm {
                    handle: Some(7),
                    status: Status::BusyRx
                }),
            ]
        );
        assert!(phy.pending_transactions().is_empty());
    }

    #[test]
    fn oversized_msdu() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);
        let on_driver = |p: Primitive<'_>| driver.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        // Too long for a PSDU.
        phy.data_request(&request(&[0u8; 128]), T0);
        // Too long with this header.
        phy.data_request(&request(&[0u8; 120]), T0);

        let confirm = other(Primitive::DataConfirm {
            handle: Some(7),
            status: Status::FrameTooLong,
        });
        assert_eq!(upper.take(), [confirm.clone(), confirm]);
        assert!(driver.take().is_empty());
        assert_eq!(phy.sequence_number(), 0);
        assert!(phy.pending_transactions().is_empty());
    }

    #[test]
    fn purge_pending_transaction() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);
        let on_driver = |p: Primitive<'_>| driver.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        let mut request = request(b"hello");
        request.tx_options = TxOptions::ACKNOWLEDGED;
        phy.data_request(&request, T0);

        assert_eq!(phy.purge_request(7), Status::Success);
        assert_eq!(phy.purge_request(7), Status::InvalidHandle);

        // The transmitter comes up but the frame is gone. The upper layer
        // still learns about the new state.
        phy.set_trx_state_confirm(Status::Success);
        assert_eq!(phy.state(), TrxState::TxOn);
        assert_eq!(
            driver.take(),
            [other(Primitive::SetTrxStateRequest {
                state: TrxState::TxOn
            })]
        );
        assert_eq!(
            upper.take(),
            [other(Primitive::SetTrxStateConfirm {
                status: Status::Success
            })]
        );

        // Later data requests are refused with that state.
        phy.data_request(&request, T0);
        assert_eq!(
            upper.take(),
            [other(Primitive::DataConfirm {
                handle: Some(7),
                status: Status::TxOn
            })]
        );
    }

    #[test]
    fn data_confirm_without_transmission() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);
        let on_driver = |p: Primitive<'_>| driver.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        phy.data_confirm(Status::Success);

        assert_eq!(
            driver.take(),
            [other(Primitive::SetTrxStateRequest {
                state: TrxState::RxOn
            })]
        );
        assert_eq!(
            upper.take(),
            [other(Primitive::DataConfirm {
                handle: None,
                status: Status::Success
            })]
        );
    }

    #[test]
    fn second_trx_request_replaces_outstanding_one() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);
        let on_driver = |p: Primitive<'_>| driver.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        // Issuing a request before the previous one is confirmed is a caller
        // error. Both reach the driver and the first confirm applies the
        // latest target.
        phy.set_trx_state_request(TrxState::RxOn);
        phy.set_trx_state_request(TrxState::TxOn);
        assert_eq!(
            driver.take(),
            [
                other(Primitive::SetTrxStateRequest {
                    state: TrxState::RxOn
                }),
                other(Primitive::SetTrxStateRequest {
                    state: TrxState::TxOn
                }),
            ]
        );

        phy.set_trx_state_confirm(Status::Success);
        assert_eq!(phy.state(), TrxState::TxOn);

        // Nothing is outstanding anymore: a second success changes nothing.
        phy.set_trx_state_confirm(Status::Success);
        assert_eq!(phy.state(), TrxState::TxOn);

        let confirm = other(Primitive::SetTrxStateConfirm {
            status: Status::Success,
        });
        assert_eq!(upper.take(), [confirm.clone(), confirm]);
    }

    #[test]
    fn expired_transactions_are_reported() {
        setup();
        let on_driver = |_: Primitive<'_>| {};

        let phy = Phy::new();
        bind_all(phy.lower(), &on_driver);

        phy.data_request(&request(b"hello"), Instant::from_us(1_000));

        let persistence = DEFAULT_TRANSACTION_PERSISTENCE;
        assert!(phy
            .expired_transactions(Instant::from_us(1_000) + persistence, persistence)
            .is_empty());

        let later = Instant::from_us(1_001) + persistence;
        assert_eq!(phy.expired_transactions(later, persistence), [7]);
        assert_eq!(phy.pending_transactions(), [7]);
    }

    #[test]
    fn cca_and_ed_need_rx_on() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);
        let on_driver = |p: Primitive<'_>| driver.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        for (state, status) in [
            (TrxState::Off, Status::TrxOff),
            (TrxState::TxOn, Status::TxOn),
            (TrxState::BusyRx, Status::BusyRx),
        ] {
            phy.set_trx_state_confirm(status);
            upper.take();
            assert_eq!(phy.state(), state);

            phy.cca_request();
            phy.ed_request();
            assert_eq!(
                upper.take(),
                [
                    other(Primitive::CcaConfirm { status }),
                    other(Primitive::EdConfirm {
                        status,
                        energy_level: 0
                    }),
                ]
            );
        }
        assert!(driver.take().is_empty());

        phy.set_trx_state_confirm(Status::RxOn);
        upper.take();

        phy.cca_request();
        phy.ed_request();
        assert_eq!(
            driver.take(),
            [other(Primitive::CcaRequest), other(Primitive::EdRequest)]
        );

        phy.cca_confirm(Status::Idle);
        phy.ed_confirm(Status::Success, 0x42);
        assert_eq!(
            upper.take(),
            [
                other(Primitive::CcaConfirm {
                    status: Status::Idle
                }),
                other(Primitive::EdConfirm {
                    status: Status::Success,
                    energy_level: 0x42
                }),
            ]
        );
    }

    #[test]
    fn get_attribute() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);
        let on_driver = |p: Primitive<'_>| driver.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        phy.get_request(PibAttributeId::from(9));
        assert_eq!(
            upper.take(),
            [other(Primitive::GetConfirm {
                status: Status::UnsupportedAttribute,
                attribute: PibAttributeId::Unknown(9),
                value: 0,
            })]
        );
        assert!(driver.take().is_empty());

        phy.get_request(PibAttributeId::CurrentChannel);
        assert_eq!(
            driver.take(),
            [other(Primitive::GetRequest {
                attribute: PibAttributeId::CurrentChannel
            })]
        );

        phy.get_confirm(Status::Success, PibAttributeId::CurrentChannel, 11);
        assert_eq!(
            upper.take(),
            [other(Primitive::GetConfirm {
                status: Status::Success,
                attribute: PibAttributeId::CurrentChannel,
                value: 11,
            })]
        );
    }

    #[test]
    fn set_attribute() {
        setup();
        let upper = Spy::default();
        let driver = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);
        let on_driver = |p: Primitive<'_>| driver.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);
        bind_all(phy.lower(), &on_driver);

        phy.set_request(PibAttributeId::TransmitPower, 0xc0);
        assert_eq!(
            upper.take(),
            [other(Primitive::SetConfirm {
                status: Status::InvalidParameter,
                attribute: PibAttributeId::TransmitPower,
            })]
        );
        assert!(driver.take().is_empty());
        assert_eq!(phy.pib().tx_power().raw(), 0);

        phy.set_request(PibAttributeId::TransmitPower, 0xbf);
        assert_eq!(
            driver.take(),
            [other(Primitive::SetRequest {
                attribute: PibAttributeId::TransmitPower,
                value: 0xbf,
            })]
        );
        assert_eq!(
            upper.take(),
            [other(Primitive::SetConfirm {
                status: Status::Success,
                attribute: PibAttributeId::TransmitPower,
            })]
        );
        assert_eq!(phy.pib().tx_power().raw(), 0xbf);

        phy.set_request(PibAttributeId::Unknown(7), 0);
        assert_eq!(
            upper.take(),
            [other(Primitive::SetConfirm {
                status: Status::UnsupportedAttribute,
                attribute: PibAttributeId::Unknown(7),
            })]
        );
    }

    #[test]
    fn received_frames_go_upward() {
        setup();
        let upper = Spy::default();
        let on_upper = |p: Primitive<'_>| upper.record(p);

        let phy = Phy::new();
        bind_all(phy.upper(), &on_upper);

        let rx = hex::decode("41c801cdabffffc7d9b514004b12002b0000000fab80d0").unwrap();
        phy.data_indication(&rx, 21).unwrap();

        assert_eq!(
            upper.take(),
            [Event::Received {
                payload: std::vec![0x2b, 0x00, 0x00, 0x00],
                sequence_number: 1,
                src_address: Address::extended(0x0012_4b00_14b5_d9c7),
                dst_pan_id: Some(0xabcd),
                link_quality: 0x80,
            }]
        );

        let rx = hex::decode("0104052a2a0000ffc4").unwrap();
        assert_eq!(
            phy.data_indication(&rx, 7),
            Err(Error::Frame(wpan_frame::Error::ReservedAddressingMode))
        );
        assert!(upper.take().is_empty());
    }

    #[test]
    fn unbound_handlers_are_silent() {
        setup();
        let phy = Phy::new();

        phy.set_trx_state_request(TrxState::RxOn);
        phy.set_trx_state_confirm(Status::Success);
        phy.cca_request();
        phy.ed_request();
        phy.get_request(PibAttributeId::CcaMode);
        phy.set_request(PibAttributeId::CcaMode, 2);

        assert_eq!(phy.state(), TrxState::RxOn);
        assert_eq!(phy.pib().cca_mode(), 2);
    }

    #[test]
    fn state_query() {
        setup();
        let query = || TrxState::BusyRx;

        let phy = Phy::new();
        assert_eq!(phy.sync_state(), TrxState::Off);

        phy.bind_state_query(&query);
        assert_eq!(phy.sync_state(), TrxState::BusyRx);
        assert_eq!(phy.state(), TrxState::BusyRx);

        phy.unbind_state_query();
        phy.set_trx_state_confirm(Status::RxOn);
        assert_eq!(phy.sync_state(), TrxState::RxOn);
    }
}
