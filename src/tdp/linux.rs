//! The real hardware body of [`Tdp`]: the Linux DVB-API character devices
//! under one `/dev/dvb/adapterN/` directory, composed from
//! [`Frontend`](crate::frontend::Frontend), [`Demux`](crate::demux::Demux)
//! and [`Player`](crate::player::Player) — each already a thin, tested
//! wrapper around its own device node.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::codec::StreamKind;
use crate::demux::Demux;
use crate::demux::sys::{DmxPesFilterParams, DmxPesType, DmxSctFilterParams};
use crate::error::TdpError;
use crate::frontend::Frontend;
use crate::frontend::properties::set::BandwidthHz;
use crate::frontend::sys::FeDeliverySystem;
use crate::player::Player;
use crate::player::sys::VideoStreamType;
use crate::tdp::{FilterHandle, LockCallback, LockStatus, Modulation, SectionCallback, StreamHandle, Tdp};

/// How long the background poll loop waits for [`Frontend::wait_for_lock`]
/// before reporting [`LockStatus::NotLocked`]. The controller's own
/// acquisition coordinator applies its own, independent 10 s deadline (§4.6);
/// this is this body's internal ceiling on how long it keeps polling.
const LOCK_POLL_TIMEOUT: Duration = Duration::from_secs(15);
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(50);

fn to_fe_modulation(modulation: Modulation) -> crate::frontend::sys::FeModulation {
    use crate::frontend::sys::FeModulation;
    match modulation {
        Modulation::Qpsk => FeModulation::QPSK,
        Modulation::Qam16 => FeModulation::QAM_16,
        Modulation::Qam32 => FeModulation::QAM_32,
        Modulation::Qam64 => FeModulation::QAM_64,
        Modulation::Qam128 => FeModulation::QAM_128,
        Modulation::Qam256 => FeModulation::QAM_256,
        Modulation::Vsb8 => FeModulation::VSB_8,
        Modulation::Vsb16 => FeModulation::VSB_16,
        Modulation::Auto => FeModulation::QAM_AUTO,
    }
}

fn pes_type_for(kind: StreamKind) -> Option<DmxPesType> {
    match kind {
        StreamKind::Video(_) => Some(DmxPesType::DMX_PES_VIDEO0),
        StreamKind::Audio(_) => Some(DmxPesType::DMX_PES_AUDIO0),
        StreamKind::Other => None,
    }
}

fn video_stream_type_for(kind: StreamKind) -> Option<VideoStreamType> {
    use crate::codec::VideoCodec;
    match kind {
        StreamKind::Video(VideoCodec::Mpeg2) => Some(VideoStreamType::VIDEO_STREAMTYPE_MPEG2),
        StreamKind::Video(VideoCodec::H264) => Some(VideoStreamType::VIDEO_STREAMTYPE_MPEG4_H264),
        StreamKind::Video(VideoCodec::Hevc) => Some(VideoStreamType::VIDEO_STREAMTYPE_H265_HEVC),
        _ => None,
    }
}

struct Devices {
    dir: PathBuf,
}

impl Devices {
    fn new(adapter_dir: &Path) -> Devices {
        Devices {
            dir: adapter_dir.to_path_buf(),
        }
    }

    fn frontend(&self) -> PathBuf {
        self.dir.join("frontend0")
    }

    fn demux(&self) -> PathBuf {
        self.dir.join("demux0")
    }

    fn video(&self) -> PathBuf {
        self.dir.join("video0")
    }

    fn audio(&self) -> PathBuf {
        self.dir.join("audio0")
    }
}

/// The Linux DVB-API backed [`Tdp`] body. One instance owns one adapter's
/// frontend, one section-filter demux handle and the video/audio decoders;
/// each `stream_create` opens its own additional demux handle for a PES
/// filter, since the DVB-API lets a demux device be opened more than once to
/// run independent filters concurrently.
pub struct LinuxTdp {
    devices: Devices,
    frontend: Option<Frontend>,
    section_demux: Option<Arc<Demux>>,
    player: Option<Player>,
    lock_cb: Arc<Mutex<Option<LockCallback>>>,
    section_cb: Arc<Mutex<Option<SectionCallback>>>,
    live_filter: Option<u16>,
    streams: HashMap<StreamHandle, Demux>,
    next_handle: AtomicU64,
    volume: u32,
    volume_max: u32,
}

impl LinuxTdp {
    /// `adapter_dir` is a directory like `/dev/dvb/adapter0`. `volume_max` is
    /// the controller-facing ceiling for `volume_set`/`volume_get`; internally
    /// scaled down to the single byte the audio device's `AUDIO_SET_VOLUME`
    /// ioctl takes.
    pub fn new(adapter_dir: &Path, volume_max: u32) -> LinuxTdp {
        LinuxTdp {
            devices: Devices::new(adapter_dir),
            frontend: None,
            section_demux: None,
            player: None,
            lock_cb: Arc::new(Mutex::new(None)),
            section_cb: Arc::new(Mutex::new(None)),
            live_filter: None,
            streams: HashMap::new(),
            next_handle: AtomicU64::new(1),
            volume: 0,
            volume_max: volume_max.max(1),
        }
    }

    fn next_handle(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::SeqCst)
    }

    fn scale_down(&self, value: u32) -> u8 {
        ((value.min(self.volume_max) as u64 * 255) / self.volume_max as u64) as u8
    }
}

impl Tdp for LinuxTdp {
    fn tuner_init(&mut self) -> Result<(), TdpError> {
        let frontend =
            Frontend::open(&self.devices.frontend(), true).map_err(|e| TdpError::Tuner(e.to_string()))?;
        self.frontend = Some(frontend);
        Ok(())
    }

    fn tuner_deinit(&mut self) -> Result<(), TdpError> {
        self.frontend = None;
        Ok(())
    }

    fn tuner_register_lock_cb(&mut self, cb: LockCallback) {
        *self.lock_cb.lock().unwrap() = Some(cb);
    }

    fn tuner_lock(&mut self, frequency_hz: u32, bandwidth_hz: u32, modulation: Modulation) -> Result<(), TdpError> {
        use crate::frontend::properties::set::{DeliverySystem, Frequency, Modulation as FeModulationProperty, SetPropertyQuery, Tune};

        let frontend = self.frontend.as_mut().ok_or_else(|| TdpError::Tuner("not initialized".into()))?;
        frontend
            .set_properties(&mut [
                Frequency::new(frequency_hz).property(),
                BandwidthHz::new(bandwidth_hz).property(),
                DeliverySystem::new(FeDeliverySystem::DVBT).property(),
                FeModulationProperty::new(to_fe_modulation(modulation)).property(),
                Tune {}.property(),
            ])
            .map_err(|e| TdpError::Tuner(e.to_string()))?;

        let status_fd = self.devices.frontend();
        let lock_cb = self.lock_cb.clone();
        thread::spawn(move || {
            let locked = match Frontend::open(&status_fd, false) {
                Ok(frontend) => frontend
                    .wait_for_lock(Some(LOCK_POLL_TIMEOUT), Some(LOCK_POLL_INTERVAL))
                    .unwrap_or(false),
                Err(_) => false,
            };
            let status = if locked { LockStatus::Locked } else { LockStatus::NotLocked };
            if let Some(cb) = lock_cb.lock().unwrap().as_mut() {
                cb(status);
            }
        });
        Ok(())
    }

    fn player_init(&mut self) -> Result<(), TdpError> {
        let player =
            Player::open(&self.devices.video(), &self.devices.audio()).map_err(|e| TdpError::Player(e.to_string()))?;
        player.init().map_err(|e| TdpError::Player(e.to_string()))?;
        self.player = Some(player);
        Ok(())
    }

    fn player_deinit(&mut self) -> Result<(), TdpError> {
        self.player = None;
        Ok(())
    }

    fn source_open(&mut self) -> Result<(), TdpError> {
        let demux = Demux::open(&self.devices.demux()).map_err(|e| TdpError::Demux(e.to_string()))?;
        self.section_demux = Some(Arc::new(demux));
        Ok(())
    }

    fn source_close(&mut self) -> Result<(), TdpError> {
        self.section_demux = None;
        Ok(())
    }

    fn demux_set_filter(&mut self, pid: u16, table_id: u8) -> Result<FilterHandle, TdpError> {
        if self.live_filter.is_some() {
            return Err(TdpError::FilterAlreadyInstalled);
        }
        let demux_handle = self.section_demux.clone().ok_or_else(|| TdpError::Demux("source not open".into()))?;
        let params = DmxSctFilterParams::new(pid, table_id, 0);
        demux_handle.set_filter(&params).map_err(|e| TdpError::Demux(e.to_string()))?;
        demux_handle.start().map_err(|e| TdpError::Demux(e.to_string()))?;
        self.live_filter = Some(pid);

        // Single reader thread per filter: the caller never issues a second
        // `demux_set_filter` before freeing this one (§4.2 contract), so the
        // fd is never read from two threads at once. `demux_free_filter`
        // stops the fd from the controlling thread, which unblocks this read.
        let section_cb = self.section_cb.clone();
        thread::spawn(move || {
            let mut buf = vec![0u8; 4096];
            if let Ok(section) = demux_handle.read(&mut buf) {
                if let Some(cb) = section_cb.lock().unwrap().as_mut() {
                    cb(section);
                }
            }
        });

        Ok(FilterHandle(self.next_handle()))
    }

    fn demux_free_filter(&mut self, _handle: FilterHandle) -> Result<(), TdpError> {
        if let Some(demux) = &self.section_demux {
            demux.stop().map_err(|e| TdpError::Demux(e.to_string()))?;
        }
        self.live_filter = None;
        Ok(())
    }

    fn demux_register_section_cb(&mut self, cb: SectionCallback) {
        *self.section_cb.lock().unwrap() = Some(cb);
    }

    fn demux_unregister_section_cb(&mut self) {
        *self.section_cb.lock().unwrap() = None;
    }

    fn stream_create(&mut self, pid: u16, kind: StreamKind) -> Result<StreamHandle, TdpError> {
        let pes_type = pes_type_for(kind).ok_or_else(|| TdpError::Player("stream kind has no decoder pipeline".into()))?;
        let demux = Demux::open(&self.devices.demux()).map_err(|e| TdpError::Demux(e.to_string()))?;
        let params = DmxPesFilterParams::for_decoder(pid, pes_type);
        demux.set_pes_filter(&params).map_err(|e| TdpError::Demux(e.to_string()))?;
        demux.start().map_err(|e| TdpError::Demux(e.to_string()))?;

        let player = self.player.as_ref().ok_or_else(|| TdpError::Player("not initialized".into()))?;
        if let Some(stream_type) = video_stream_type_for(kind) {
            player.set_video_stream_type(stream_type).map_err(|e| TdpError::Player(e.to_string()))?;
            player.video_play().map_err(|e| TdpError::Player(e.to_string()))?;
        } else if matches!(kind, StreamKind::Audio(_)) {
            player.audio_play().map_err(|e| TdpError::Player(e.to_string()))?;
        }

        let handle = StreamHandle(self.next_handle());
        self.streams.insert(handle, demux);
        Ok(handle)
    }

    fn stream_remove(&mut self, handle: StreamHandle) -> Result<(), TdpError> {
        if let Some(demux) = self.streams.remove(&handle) {
            demux.stop().map_err(|e| TdpError::Demux(e.to_string()))?;
        }
        Ok(())
    }

    fn volume_get(&self) -> Result<u32, TdpError> {
        Ok(self.volume)
    }

    fn volume_set(&mut self, value: u32) -> Result<(), TdpError> {
        let clamped = value.min(self.volume_max);
        let player = self.player.as_ref().ok_or_else(|| TdpError::Player("not initialized".into()))?;
        player.set_volume(self.scale_down(clamped)).map_err(|e| TdpError::Player(e.to_string()))?;
        self.volume = clamped;
        Ok(())
    }

    fn volume_max(&self) -> u32 {
        self.volume_max
    }
}
