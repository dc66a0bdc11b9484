/// MAC command frame identifiers.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandId {
    /// Association request.
    AssociationRequest = 0x01,
    /// Association response.
    AssociationResponse = 0x02,
    /// Disassociation notification.
    DisassociationNotification = 0x03,
    /// Data request.
    DataRequest = 0x04,
    /// PAN identifier conflict notification.
    PanIdConflictNotification = 0x05,
    /// Orphan notification.
    OrphanNotification = 0x06,
    /// Beacon request.
    BeaconRequest = 0x07,
    /// Coordinator realignment.
    CoordinatorRealignment = 0x08,
    /// GTS request.
    GtsRequest = 0x09,
    /// A reserved command identifier.
    Unknown = 0xff,
}

impl From<u8> for CommandId {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::AssociationRequest,
            0x02 => Self::AssociationResponse,
            0x03 => Self::DisassociationNotification,
            0x04 => Self::DataRequest,
            0x05 => Self::PanIdConflictNotification,
            0x06 => Self::OrphanNotification,
            0x07 => Self::BeaconRequest,
            0x08 => Self::CoordinatorRealignment,
            0x09 => Self::GtsRequest,
            _ => Self::Unknown,
        }
    }
}
