use std::os::fd::{AsRawFd, BorrowedFd};

use nix::{ioctl_none, ioctl_write_ptr};

use crate::{
    IOCTL_TYPE,
    error::{DmxSetFilterError, DmxSetPesFilterError, DmxStartError},
};

//
// ----- Wire structures (linux/dvb/dmx.h)

/// Mirrors `struct dmx_filter` from `linux/dvb/dmx.h`: a 16-byte match/mask/mode
/// triple applied to the section payload after the 3-byte section header.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct DmxFilter {
    pub filter: [u8; 16],
    pub mask: [u8; 16],
    pub mode: [u8; 16],
}

impl DmxFilter {
    /// A filter that matches any section whose first byte (`table_id`) equals `table_id`.
    pub fn for_table_id(table_id: u8) -> DmxFilter {
        let mut filter = [0u8; 16];
        let mut mask = [0u8; 16];
        filter[0] = table_id;
        mask[0] = 0xFF;
        DmxFilter {
            filter,
            mask,
            mode: [0u8; 16],
        }
    }
}

/// Mirrors `struct dmx_sct_filter_params`.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct DmxSctFilterParams {
    pub pid: u16,
    pub filter: DmxFilter,
    pub timeout: u32,
    pub flags: u32,
}

impl DmxSctFilterParams {
    pub fn new(pid: u16, table_id: u8, flags: u32) -> DmxSctFilterParams {
        DmxSctFilterParams {
            pid,
            filter: DmxFilter::for_table_id(table_id),
            timeout: 0,
            flags,
        }
    }
}

/// Mirrors `dmx_input_t`.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
#[allow(non_camel_case_types)]
pub enum DmxInput {
    DMX_IN_FRONTEND,
    DMX_IN_DVR,
}

/// Mirrors `dmx_output_t`.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
#[allow(non_camel_case_types)]
pub enum DmxOutput {
    DMX_OUT_DECODER,
    DMX_OUT_TAP,
    DMX_OUT_TS_TAP,
    DMX_OUT_TSDEMUX_TAP,
}

/// Mirrors `dmx_pes_type_t`: which decoder pipeline a PES filter feeds.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
#[allow(non_camel_case_types)]
pub enum DmxPesType {
    DMX_PES_AUDIO0,
    DMX_PES_VIDEO0,
    DMX_PES_TELETEXT0,
    DMX_PES_SUBTITLE0,
    DMX_PES_PCR0,
    DMX_PES_OTHER,
}

/// Mirrors `struct dmx_pes_filter_params`. Used by [`Demux::set_pes_filter`] to
/// route one elementary stream's PID straight into the hardware decoder,
/// bypassing userspace entirely (§4.2 `stream_create`).
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct DmxPesFilterParams {
    pub pid: u16,
    pub input: DmxInput,
    pub output: DmxOutput,
    pub pes_type: DmxPesType,
    pub flags: u32,
}

impl DmxPesFilterParams {
    pub fn for_decoder(pid: u16, pes_type: DmxPesType) -> DmxPesFilterParams {
        DmxPesFilterParams {
            pid,
            input: DmxInput::DMX_IN_FRONTEND,
            output: DmxOutput::DMX_OUT_DECODER,
            pes_type,
            flags: 0,
        }
    }
}

//
// ----- IOCTLs

const DMX_START: u8 = 41;
ioctl_none!(dmx_start_ioctl, IOCTL_TYPE, DMX_START);

const DMX_STOP: u8 = 42;
ioctl_none!(dmx_stop_ioctl, IOCTL_TYPE, DMX_STOP);

const DMX_SET_FILTER: u8 = 43;
ioctl_write_ptr!(
    dmx_set_filter_ioctl,
    IOCTL_TYPE,
    DMX_SET_FILTER,
    DmxSctFilterParams
);

const DMX_SET_PES_FILTER: u8 = 44;
ioctl_write_ptr!(
    dmx_set_pes_filter_ioctl,
    IOCTL_TYPE,
    DMX_SET_PES_FILTER,
    DmxPesFilterParams
);

//
// ----- Simplified IOCTLs

pub fn start(fd: BorrowedFd) -> Result<(), DmxStartError> {
    unsafe { dmx_start_ioctl(fd.as_raw_fd()) }
        .map(|_| ())
        .map_err(DmxStartError::from)
}

pub fn stop(fd: BorrowedFd) -> Result<(), DmxStartError> {
    unsafe { dmx_stop_ioctl(fd.as_raw_fd()) }
        .map(|_| ())
        .map_err(DmxStartError::from)
}

pub fn set_filter(fd: BorrowedFd, params: &DmxSctFilterParams) -> Result<(), DmxSetFilterError> {
    unsafe { dmx_set_filter_ioctl(fd.as_raw_fd(), params as *const DmxSctFilterParams) }
        .map(|_| ())
        .map_err(DmxSetFilterError::from)
}

pub fn set_pes_filter(fd: BorrowedFd, params: &DmxPesFilterParams) -> Result<(), DmxSetPesFilterError> {
    unsafe { dmx_set_pes_filter_ioctl(fd.as_raw_fd(), params as *const DmxPesFilterParams) }
        .map(|_| ())
        .map_err(DmxSetPesFilterError::from)
}
