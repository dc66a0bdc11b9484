//! Service access points between the PHY and its neighbouring layers.
//!
//! Each service has a request, a confirm and, for the data service, an
//! indication. A [`ServiceRegistry`] holds at most one handler per
//! (service, role) slot. Dispatching to an empty slot does nothing.

use core::cell::RefCell;

use critical_section::Mutex;
use wpan_frame::{Address, AddressingMode, ReceivedFrame};

use super::{PibAttributeId, Status, TrxState};
use crate::Error;

/// A PHY service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceId {
    /// PD-DATA
    Data,
    /// PLME-CCA
    Cca,
    /// PLME-ED
    Ed,
    /// PLME-GET
    Get,
    /// PLME-SET-TRX-STATE
    SetTrxState,
    /// PLME-SET
    Set,
}

impl ServiceId {
    const COUNT: usize = 6;

    /// Return `true` when the service has a primitive for `role`.
    pub fn defines(&self, role: Role) -> bool {
        match role {
            Role::Request | Role::Confirm => true,
            Role::Indication => *self == ServiceId::Data,
        }
    }
}

/// The role of a primitive within its service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Issued by the layer using the service.
    Request,
    /// Completes a request.
    Confirm,
    /// Issued by the layer providing the service on its own initiative.
    Indication,
}

impl Role {
    const COUNT: usize = 3;
}

/// A received frame, as handed to the upper layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataIndication<'p> {
    /// Source addressing mode.
    pub src_addr_mode: AddressingMode,
    /// Source PAN identifier, the destination one for intra-PAN frames.
    pub src_pan_id: Option<u16>,
    /// Source address.
    pub src_address: Address,
    /// Destination addressing mode.
    pub dst_addr_mode: AddressingMode,
    /// Destination PAN identifier.
    pub dst_pan_id: Option<u16>,
    /// Destination address.
    pub dst_address: Address,
    /// The MSDU.
    pub payload: &'p [u8],
    /// Link quality indicator.
    pub link_quality: u8,
    /// Received signal strength indicator.
    pub rssi: u8,
    /// Data sequence number.
    pub sequence_number: u8,
    /// The security enabled bit of the frame control field.
    pub security_used: bool,
    /// `false` when the FCS did not match the frame content.
    pub fcs_valid: bool,
}

impl<'p> From<&'p ReceivedFrame> for DataIndication<'p> {
    fn from(received: &'p ReceivedFrame) -> Self {
        let header = &received.frame.header;

        Self {
            src_addr_mode: header.frame_control.src_addressing_mode,
            src_pan_id: header.src_pan_id,
            src_address: header.src_address,
            dst_addr_mode: header.frame_control.dst_addressing_mode,
            dst_pan_id: header.dst_pan_id,
            dst_address: header.dst_address,
            payload: &received.frame.payload,
            link_quality: received.link_quality,
            rssi: received.rssi,
            sequence_number: header.sequence_number,
            security_used: header.frame_control.security_enabled,
            fcs_valid: received.fcs_valid,
        }
    }
}

/// A primitive travelling through a service access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Primitive<'p> {
    /// Transmit an encoded PPDU.
    DataRequest { ppdu: &'p [u8] },
    /// Outcome of the transmission of the MSDU with `handle`. The handle is
    /// `None` when the driver confirms without a frame in flight.
    DataConfirm { handle: Option<u8>, status: Status },
    /// A frame was received.
    DataIndication(DataIndication<'p>),
    /// Perform a clear channel assessment.
    CcaRequest,
    /// Outcome of a clear channel assessment, or the reason it was refused.
    CcaConfirm { status: Status },
    /// Perform an energy detection.
    EdRequest,
    /// Outcome of an energy detection. `energy_level` is `0` when refused.
    EdConfirm { status: Status, energy_level: u8 },
    /// Read a PIB attribute from the radio.
    GetRequest { attribute: PibAttributeId },
    /// The value of a PIB attribute.
    GetConfirm {
        status: Status,
        attribute: PibAttributeId,
        value: u32,
    },
    /// Change the transceiver state.
    SetTrxStateRequest { state: TrxState },
    /// Outcome of a transceiver state change.
    SetTrxStateConfirm { status: Status },
    /// A PIB attribute changed and the radio should follow.
    SetRequest { attribute: PibAttributeId, value: u32 },
    /// Outcome of a PIB attribute write.
    SetConfirm {
        status: Status,
        attribute: PibAttributeId,
    },
}

impl Primitive<'_> {
    /// Return the service this primitive belongs to.
    pub fn service(&self) -> ServiceId {
        match self {
            Primitive::DataRequest { .. }
            | Primitive::DataConfirm { .. }
            | Primitive::DataIndication(_) => ServiceId::Data,
            Primitive::CcaRequest | Primitive::CcaConfirm { .. } => ServiceId::Cca,
            Primitive::EdRequest | Primitive::EdConfirm { .. } => ServiceId::Ed,
            Primitive::GetRequest { .. } | Primitive::GetConfirm { .. } => ServiceId::Get,
            Primitive::SetTrxStateRequest { .. } | Primitive::SetTrxStateConfirm { .. } => {
                ServiceId::SetTrxState
            }
            Primitive::SetRequest { .. } | Primitive::SetConfirm { .. } => ServiceId::Set,
        }
    }

    /// Return the role of this primitive.
    pub fn role(&self) -> Role {
        match self {
            Primitive::DataRequest { .. }
            | Primitive::CcaRequest
            | Primitive::EdRequest
            | Primitive::GetRequest { .. }
            | Primitive::SetTrxStateRequest { .. }
            | Primitive::SetRequest { .. } => Role::Request,
            Primitive::DataIndication(_) => Role::Indication,
            _ => Role::Confirm,
        }
    }
}

/// A handler bound to a slot.
pub type Handler<'a> = &'a (dyn Fn(Primitive<'_>) + Sync);

const SLOTS: usize = ServiceId::COUNT * Role::COUNT;

fn slot(service: ServiceId, role: Role) -> usize {
    service as usize * Role::COUNT + role as usize
}

/// The handlers one layer registered for the primitives it receives.
pub struct ServiceRegistry<'a> {
    handlers: Mutex<RefCell<[Option<Handler<'a>>; SLOTS]>>,
}

impl Default for ServiceRegistry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ServiceRegistry<'a> {
    /// Create a registry with every slot empty.
    pub const fn new() -> Self {
        Self {
            handlers: Mutex::new(RefCell::new([None; SLOTS])),
        }
    }

    /// Bind `handler` to a slot, replacing any previous handler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedRole`] when the service has no primitive
    /// for `role`. No slot is changed in that case.
    pub fn bind(&self, service: ServiceId, role: Role, handler: Handler<'a>) -> Result<(), Error> {
        self.replace(service, role, Some(handler))
    }

    /// Clear a slot.
    pub fn unbind(&self, service: ServiceId, role: Role) -> Result<(), Error> {
        self.replace(service, role, None)
    }

    /// Return `true` when a handler is bound to the slot.
    pub fn is_bound(&self, service: ServiceId, role: Role) -> bool {
        service.defines(role) && self.handler(service, role).is_some()
    }

    /// Call the handler bound to the slot of `primitive`, if any.
    ///
    /// The handler runs outside the critical section, so it may call back
    /// into the PHY.
    pub fn dispatch(&self, primitive: Primitive<'_>) {
        let (service, role) = (primitive.service(), primitive.role());

        match self.handler(service, role) {
            Some(handler) => handler(primitive),
            None => {
                trace!("no handler for {:?} {:?}", service, role);
            }
        }
    }

    fn handler(&self, service: ServiceId, role: Role) -> Option<Handler<'a>> {
        critical_section::with(|cs| self.handlers.borrow(cs).borrow()[slot(service, role)])
    }

    fn replace(
        &self,
        service: ServiceId,
        role: Role,
        handler: Option<Handler<'a>>,
    ) -> Result<(), Error> {
        if !service.defines(role) {
            warn!("{:?} has no {:?} primitive", service, role);
            return Err(Error::UnsupportedRole);
        }

        critical_section::with(|cs| {
            self.handlers.borrow(cs).borrow_mut()[slot(service, role)] = handler;
        });

        Ok(())
    }
}
