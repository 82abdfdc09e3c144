//! # `dvb-stb`
//! Stream controller core for a DVB set-top client: tune an RF frontend to a
//! transponder, acquire the transport stream, discover the programs it
//! carries from the PAT/PMT, and drive a hardware decoder through channel
//! switches, volume and mute.
//!
//! You should probably start at [`controller::Controller`] — it wires
//! together the tuner/demux/player abstraction ([`tdp`]), the one-shot
//! catalog builder ([`catalog`]) and the playback engine ([`playback`])
//! behind `init`/`deinit` and the handful of user-facing operations
//! (`play`, `next`, `previous`, `volume_up`, `volume_down`, `mute_toggle`).
//!
//! # How does DVB work as a whole ?
//! A local TV provider has an antenna somewhere around the user and beams out
//! DVB-T. The user picks it up with an antenna connected to their USB
//! receiver.
//!
//! From there, the Frontend (as in radio frequency frontend) of the receiver
//! directly connects to the antenna. The user, through the Linux kernel
//! IOCTLs, tells the frontend to tune for a particular
//! [delivery system](frontend::sys::FeDeliverySystem) (DVB-T, DVB-T2, DVB-S...)
//! with a specific bandwidth and frequency. The frontend should then handle
//! all of the radio-frequency business.
//!
//! If everything works out, the frontend should enter a locked state
//! ([`has_lock`](frontend::sys::FeStatus::has_lock)) and start streaming the
//! whole multiplex to the demuxer. A multiplex is a single MPEG Transport
//! Stream (TS) containing multiple TV channels, including multiple audio and
//! video streams, along with other data.
//!
//! There is no direct way to access that raw multiplex from software: the
//! user opens a file descriptor to the demux file of the adapter, and from
//! there sets a filter that selectively chooses specific packets to send
//! over to the program. This crate's [`catalog`] module drives that filter
//! over the PAT and then every program's PMT to build a typed channel list,
//! and [`playback`] drives the decoder side once a channel is chosen.
//!

pub mod catalog;
pub mod codec;
pub mod controller;
pub mod coordinator;
pub mod demux;
pub mod error;
pub mod frontend;
pub mod player;
pub mod playback;
pub mod presenter;
pub mod psi;
pub mod tdp;
pub mod utils;

/// For all IOCTLs related to DVB
pub(crate) const IOCTL_TYPE: u8 = b'o';
