//! MAC sublayer pieces the PHY service layer relies on.

pub mod constants;
pub mod transaction;
