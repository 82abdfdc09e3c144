use std::os::fd::{AsRawFd, BorrowedFd};

use nix::{ioctl_none, ioctl_write_int};

use crate::{IOCTL_TYPE, error::PlayerDeviceError};

//
// ----- Wire structures (linux/dvb/video.h, linux/dvb/audio.h)

/// Mirrors `video_stream_source_t`: where the video decoder should read its
/// elementary stream from. This crate always feeds the decoder through the
/// demux (a PES filter set up by [`crate::demux::Demux::set_pes_filter`]),
/// never through `/dev/dvb/adapterN/dvr0`.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
#[allow(non_camel_case_types)]
pub enum VideoStreamSource {
    VIDEO_SOURCE_DEMUX,
    VIDEO_SOURCE_MEMORY,
}

/// Mirrors `audio_stream_source_t`.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
#[allow(non_camel_case_types)]
pub enum AudioStreamSource {
    AUDIO_SOURCE_DEMUX,
    AUDIO_SOURCE_MEMORY,
}

/// Mirrors `video_stream_type_t`/`video_encoding_t` well enough for the two
/// stream types this crate's codec table (§4.3) ever maps to.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
#[allow(non_camel_case_types)]
pub enum VideoStreamType {
    VIDEO_STREAMTYPE_MPEG2,
    VIDEO_STREAMTYPE_MPEG4_H264,
    VIDEO_STREAMTYPE_H265_HEVC,
}

//
// ----- IOCTLs (linux/dvb/video.h)

const VIDEO_STOP: u8 = 21;
ioctl_none!(video_stop_ioctl, IOCTL_TYPE, VIDEO_STOP);

const VIDEO_PLAY: u8 = 22;
ioctl_none!(video_play_ioctl, IOCTL_TYPE, VIDEO_PLAY);

const VIDEO_SELECT_SOURCE: u8 = 25;
ioctl_write_int!(video_select_source_ioctl, IOCTL_TYPE, VIDEO_SELECT_SOURCE);

const VIDEO_SET_STREAMTYPE: u8 = 36;
ioctl_write_int!(video_set_streamtype_ioctl, IOCTL_TYPE, VIDEO_SET_STREAMTYPE);

//
// ----- IOCTLs (linux/dvb/audio.h)

const AUDIO_STOP: u8 = 1;
ioctl_none!(audio_stop_ioctl, IOCTL_TYPE, AUDIO_STOP);

const AUDIO_PLAY: u8 = 2;
ioctl_none!(audio_play_ioctl, IOCTL_TYPE, AUDIO_PLAY);

const AUDIO_SELECT_SOURCE: u8 = 5;
ioctl_write_int!(audio_select_source_ioctl, IOCTL_TYPE, AUDIO_SELECT_SOURCE);

const AUDIO_SET_MUTE: u8 = 6;
ioctl_write_int!(audio_set_mute_ioctl, IOCTL_TYPE, AUDIO_SET_MUTE);

const AUDIO_SET_VOLUME: u8 = 11;
ioctl_write_int!(audio_set_volume_ioctl, IOCTL_TYPE, AUDIO_SET_VOLUME);

//
// ----- Simplified IOCTLs (video)

pub fn video_stop(fd: BorrowedFd) -> Result<(), PlayerDeviceError> {
    unsafe { video_stop_ioctl(fd.as_raw_fd()) }
        .map(|_| ())
        .map_err(PlayerDeviceError::from)
}

pub fn video_play(fd: BorrowedFd) -> Result<(), PlayerDeviceError> {
    unsafe { video_play_ioctl(fd.as_raw_fd()) }
        .map(|_| ())
        .map_err(PlayerDeviceError::from)
}

pub fn video_select_source(fd: BorrowedFd, source: VideoStreamSource) -> Result<(), PlayerDeviceError> {
    unsafe { video_select_source_ioctl(fd.as_raw_fd(), source as std::ffi::c_int) }
        .map(|_| ())
        .map_err(PlayerDeviceError::from)
}

pub fn video_set_streamtype(fd: BorrowedFd, stream_type: VideoStreamType) -> Result<(), PlayerDeviceError> {
    unsafe { video_set_streamtype_ioctl(fd.as_raw_fd(), stream_type as std::ffi::c_int) }
        .map(|_| ())
        .map_err(PlayerDeviceError::from)
}

//
// ----- Simplified IOCTLs (audio)

pub fn audio_stop(fd: BorrowedFd) -> Result<(), PlayerDeviceError> {
    unsafe { audio_stop_ioctl(fd.as_raw_fd()) }
        .map(|_| ())
        .map_err(PlayerDeviceError::from)
}

pub fn audio_play(fd: BorrowedFd) -> Result<(), PlayerDeviceError> {
    unsafe { audio_play_ioctl(fd.as_raw_fd()) }
        .map(|_| ())
        .map_err(PlayerDeviceError::from)
}

pub fn audio_select_source(fd: BorrowedFd, source: AudioStreamSource) -> Result<(), PlayerDeviceError> {
    unsafe { audio_select_source_ioctl(fd.as_raw_fd(), source as std::ffi::c_int) }
        .map(|_| ())
        .map_err(PlayerDeviceError::from)
}

pub fn audio_set_mute(fd: BorrowedFd, mute: bool) -> Result<(), PlayerDeviceError> {
    unsafe { audio_set_mute_ioctl(fd.as_raw_fd(), mute as std::ffi::c_int) }
        .map(|_| ())
        .map_err(PlayerDeviceError::from)
}

/// `AUDIO_SET_VOLUME` takes a single byte on most drivers; widened to `c_int`
/// to fit the `ioctl_write_int!` calling convention, truncated on the way in.
pub fn audio_set_volume(fd: BorrowedFd, volume: u8) -> Result<(), PlayerDeviceError> {
    unsafe { audio_set_volume_ioctl(fd.as_raw_fd(), volume as std::ffi::c_int) }
        .map(|_| ())
        .map_err(PlayerDeviceError::from)
}
