//! Tuner/Demux/Player abstraction (C2): the opaque hardware façade the core
//! depends on, defined only by its contract (§4.2). Two concrete bodies live
//! in this crate: [`linux`] (backed by the Linux DVB-API character devices)
//! and [`fake`] (an in-memory double used by the rest of this crate's tests).
//!
//! Callbacks may be delivered on threads other than the caller's; every
//! implementation must assume concurrent delivery. The core never issues a
//! second filter registration before the coordinator has observed the first
//! one's signal (§4.4, §5), so implementations are free to assume at most one
//! filter is ever live at a time.

pub mod fake;
pub mod linux;

use crate::codec::StreamKind;
use crate::error::TdpError;

/// Modulation scheme for a transponder (§3). Maps onto the Linux DVB-API's
/// `fe_modulation` in [`linux`]; kept independent of that type so the fake
/// and the public [`crate::controller::Config`] surface don't need the
/// `nix`-backed sys layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modulation {
    Qpsk,
    Qam16,
    Qam32,
    Qam64,
    Qam128,
    Qam256,
    Vsb8,
    Vsb16,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Locked,
    NotLocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterHandle(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(pub(crate) u64);

pub type LockCallback = Box<dyn FnMut(LockStatus) + Send>;
pub type SectionCallback = Box<dyn FnMut(&[u8]) + Send>;

/// The hardware façade contract (§4.2). Implementations own their own
/// threads for callback delivery; the core (coordinator + controller) owns
/// synchronization on the calling side.
pub trait Tdp: Send {
    fn tuner_init(&mut self) -> Result<(), TdpError>;
    fn tuner_deinit(&mut self) -> Result<(), TdpError>;
    fn tuner_register_lock_cb(&mut self, cb: LockCallback);
    /// Non-blocking: completion is reported via the registered lock callback.
    fn tuner_lock(&mut self, frequency_hz: u32, bandwidth_hz: u32, modulation: Modulation) -> Result<(), TdpError>;

    fn player_init(&mut self) -> Result<(), TdpError>;
    fn player_deinit(&mut self) -> Result<(), TdpError>;
    fn source_open(&mut self) -> Result<(), TdpError>;
    fn source_close(&mut self) -> Result<(), TdpError>;

    fn demux_set_filter(&mut self, pid: u16, table_id: u8) -> Result<FilterHandle, TdpError>;
    fn demux_free_filter(&mut self, handle: FilterHandle) -> Result<(), TdpError>;
    fn demux_register_section_cb(&mut self, cb: SectionCallback);
    fn demux_unregister_section_cb(&mut self);

    fn stream_create(&mut self, pid: u16, kind: StreamKind) -> Result<StreamHandle, TdpError>;
    fn stream_remove(&mut self, handle: StreamHandle) -> Result<(), TdpError>;

    fn volume_get(&self) -> Result<u32, TdpError>;
    fn volume_set(&mut self, value: u32) -> Result<(), TdpError>;
    /// The value reported once at init; the domain of `volume_get`/`volume_set` is `[0, volume_max()]`.
    fn volume_max(&self) -> u32;
}
