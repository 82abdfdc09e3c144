use crate::frontend::sys::{
    FeDeliverySystem, FeModulation, FeSpectralInversion,
    property::{Command, DtvProperty},
};

//
// ----- Common trait
pub trait SetPropertyQuery {
    fn property(self) -> DtvProperty;
}

//
// ----- Individual queries

pub struct Tune {}
impl SetPropertyQuery for Tune {
    fn property(self) -> DtvProperty {
        DtvProperty::new_empty(Command::DTV_TUNE)
    }
}

// --

pub struct Clear {}
impl SetPropertyQuery for Clear {
    fn property(self) -> DtvProperty {
        DtvProperty::new_empty(Command::DTV_CLEAR)
    }
}

// --

pub struct Frequency(u32);
impl Frequency {
    pub fn new(frequency: u32) -> Frequency {
        Frequency(frequency)
    }
}
impl SetPropertyQuery for Frequency {
    fn property(self) -> DtvProperty {
        DtvProperty::new_data(Command::DTV_FREQUENCY, self.0)
    }
}

// --

pub struct Modulation(FeModulation);
impl Modulation {
    pub fn new(modulation: FeModulation) -> Modulation {
        Modulation(modulation)
    }
}
impl SetPropertyQuery for Modulation {
    fn property(self) -> DtvProperty {
        DtvProperty::new_data(Command::DTV_MODULATION, self.0 as u32)
    }
}

// --

/// Bandwidth of the transponder, in Hz.
///
/// The DVB-API takes this as a raw Hz value rather than an enumeration of the
/// "traditional" 6/7/8 MHz slots, so a transponder description coming from a
/// [`Transponder`](crate::controller::Transponder) can be applied directly.
pub struct BandwidthHz(u32);
impl BandwidthHz {
    pub fn new(hz: u32) -> BandwidthHz {
        BandwidthHz(hz)
    }
}
impl SetPropertyQuery for BandwidthHz {
    fn property(self) -> DtvProperty {
        DtvProperty::new_data(Command::DTV_BANDWIDTH_HZ, self.0)
    }
}

// --

pub struct Inversion(FeSpectralInversion);
impl Inversion {
    pub fn new(inversion: FeSpectralInversion) -> Inversion {
        Inversion(inversion)
    }
}
impl SetPropertyQuery for Inversion {
    fn property(self) -> DtvProperty {
        DtvProperty::new_data(Command::DTV_INVERSION, self.0 as u32)
    }
}

// --

pub struct SymbolRate {}

// --

pub struct InnerFec {}

// --

pub struct Pilot {}

// --

pub struct Rolloff {}

// --

pub struct DeliverySystem(FeDeliverySystem);
impl DeliverySystem {
    pub fn new(system: FeDeliverySystem) -> DeliverySystem {
        DeliverySystem(system)
    }
}
impl SetPropertyQuery for DeliverySystem {
    fn property(self) -> DtvProperty {
        DtvProperty::new_data(Command::DTV_DELIVERY_SYSTEM, self.0 as u32)
    }
}

// --

// Special
pub struct Voltage {}

// --

// Special
pub struct Tone {}

// --

pub struct CodeRateHp {}

// --

pub struct CodeRateLp {}

// --

pub struct GuardInterval {}

// --

pub struct TransmissionMode {}

// --

pub struct Hierarchy {}

// --

pub struct Interleaving {}

// TODO: ISDB-T, Multistream, Physical layer scrambling, ATSC-MH
