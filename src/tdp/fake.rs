//! In-memory [`Tdp`] double used by this crate's own test suite (§4.2, §8).
//!
//! Delivers the lock and section callbacks from a spawned thread after a
//! configurable delay, so tests can exercise genuine cross-thread callback
//! delivery and acquisition timeouts without touching real hardware or
//! sleeping for the multi-second durations the production timeouts use.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::codec::StreamKind;
use crate::error::TdpError;
use crate::tdp::{FilterHandle, LockCallback, LockStatus, Modulation, SectionCallback, StreamHandle, Tdp};

#[derive(Default)]
struct Shared {
    lock_cb: Option<LockCallback>,
    section_cb: Option<SectionCallback>,
    live_filter: Option<(u16, u8)>,
}

/// A scripted PSI section: bytes to deliver, and how long to wait before
/// delivering them. A missing entry for a requested `(pid, table_id)` means
/// the section never arrives, which is how scenario 2 (tuner/PAT never
/// locks) is expressed.
#[derive(Clone)]
pub struct ScriptedSection {
    pub bytes: Vec<u8>,
    pub delay: Duration,
}

pub struct FakeTdp {
    shared: Arc<Mutex<Shared>>,
    sections: HashMap<(u16, u8), ScriptedSection>,
    lock_delay: Option<Duration>,
    next_handle: AtomicU64,
    streams: Mutex<HashSet<StreamHandle>>,
    volume: Mutex<u32>,
    volume_max: u32,
    fail_stream_pids: HashSet<u16>,
    /// Set if `demux_set_filter` was ever called while another filter was
    /// already live -- instrumentation for the single-filter invariant (§8).
    pub concurrent_filter_observed: Arc<AtomicBool>,
    /// Every `(pid, table_id)` a filter was ever installed for, in call
    /// order -- instrumentation for asserting a program's PMT was never
    /// requested (e.g. the catalog builder aborting before it gets there).
    requested_filters: Mutex<Vec<(u16, u8)>>,
}

impl FakeTdp {
    pub fn new(volume_max: u32) -> FakeTdp {
        FakeTdp {
            shared: Arc::new(Mutex::new(Shared::default())),
            sections: HashMap::new(),
            lock_delay: Some(Duration::ZERO),
            next_handle: AtomicU64::new(1),
            streams: Mutex::new(HashSet::new()),
            volume: Mutex::new(0),
            volume_max,
            fail_stream_pids: HashSet::new(),
            concurrent_filter_observed: Arc::new(AtomicBool::new(false)),
            requested_filters: Mutex::new(Vec::new()),
        }
    }

    /// The tuner lock callback never fires.
    pub fn never_locks(mut self) -> FakeTdp {
        self.lock_delay = None;
        self
    }

    pub fn with_lock_delay(mut self, delay: Duration) -> FakeTdp {
        self.lock_delay = Some(delay);
        self
    }

    pub fn with_section(mut self, pid: u16, table_id: u8, bytes: Vec<u8>, delay: Duration) -> FakeTdp {
        self.sections.insert((pid, table_id), ScriptedSection { bytes, delay });
        self
    }

    pub fn with_initial_volume(self, volume: u32) -> FakeTdp {
        *self.volume.lock().unwrap() = volume;
        self
    }

    /// `stream_create` fails for this pid, to exercise the channel-switch error policy (§4.5, §8).
    pub fn fail_stream_create(mut self, pid: u16) -> FakeTdp {
        self.fail_stream_pids.insert(pid);
        self
    }

    pub fn open_stream_count(&self) -> usize {
        self.streams.lock().unwrap().len()
    }

    /// Every `(pid, table_id)` a filter was installed for, in call order.
    pub fn requested_filters(&self) -> Vec<(u16, u8)> {
        self.requested_filters.lock().unwrap().clone()
    }
}

impl Tdp for FakeTdp {
    fn tuner_init(&mut self) -> Result<(), TdpError> {
        Ok(())
    }

    fn tuner_deinit(&mut self) -> Result<(), TdpError> {
        Ok(())
    }

    fn tuner_register_lock_cb(&mut self, cb: LockCallback) {
        self.shared.lock().unwrap().lock_cb = Some(cb);
    }

    fn tuner_lock(&mut self, _frequency_hz: u32, _bandwidth_hz: u32, _modulation: Modulation) -> Result<(), TdpError> {
        let Some(delay) = self.lock_delay else {
            return Ok(()); // scripted to never report lock
        };
        let shared = self.shared.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let mut shared = shared.lock().unwrap();
            if let Some(cb) = shared.lock_cb.as_mut() {
                cb(LockStatus::Locked);
            }
        });
        Ok(())
    }

    fn player_init(&mut self) -> Result<(), TdpError> {
        Ok(())
    }

    fn player_deinit(&mut self) -> Result<(), TdpError> {
        Ok(())
    }

    fn source_open(&mut self) -> Result<(), TdpError> {
        Ok(())
    }

    fn source_close(&mut self) -> Result<(), TdpError> {
        Ok(())
    }

    fn demux_set_filter(&mut self, pid: u16, table_id: u8) -> Result<FilterHandle, TdpError> {
        self.requested_filters.lock().unwrap().push((pid, table_id));

        let mut shared = self.shared.lock().unwrap();
        if shared.live_filter.is_some() {
            self.concurrent_filter_observed.store(true, Ordering::SeqCst);
            return Err(TdpError::FilterAlreadyInstalled);
        }
        shared.live_filter = Some((pid, table_id));
        drop(shared);

        if let Some(scripted) = self.sections.get(&(pid, table_id)).cloned() {
            let shared = self.shared.clone();
            thread::spawn(move || {
                thread::sleep(scripted.delay);
                let mut shared = shared.lock().unwrap();
                // Only deliver if the filter hasn't been freed out from under us.
                if shared.live_filter == Some((pid, table_id)) {
                    if let Some(cb) = shared.section_cb.as_mut() {
                        cb(&scripted.bytes);
                    }
                }
            });
        }

        Ok(FilterHandle(self.next_handle.fetch_add(1, Ordering::SeqCst)))
    }

    fn demux_free_filter(&mut self, _handle: FilterHandle) -> Result<(), TdpError> {
        self.shared.lock().unwrap().live_filter = None;
        Ok(())
    }

    fn demux_register_section_cb(&mut self, cb: SectionCallback) {
        self.shared.lock().unwrap().section_cb = Some(cb);
    }

    fn demux_unregister_section_cb(&mut self) {
        self.shared.lock().unwrap().section_cb = None;
    }

    fn stream_create(&mut self, pid: u16, _kind: StreamKind) -> Result<StreamHandle, TdpError> {
        if self.fail_stream_pids.contains(&pid) {
            return Err(TdpError::Player(format!("refused to open stream on pid {pid:#06x}")));
        }
        let handle = StreamHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.streams.lock().unwrap().insert(handle);
        Ok(handle)
    }

    fn stream_remove(&mut self, handle: StreamHandle) -> Result<(), TdpError> {
        self.streams.lock().unwrap().remove(&handle);
        Ok(())
    }

    fn volume_get(&self) -> Result<u32, TdpError> {
        Ok(*self.volume.lock().unwrap())
    }

    fn volume_set(&mut self, value: u32) -> Result<(), TdpError> {
        *self.volume.lock().unwrap() = value.min(self.volume_max);
        Ok(())
    }

    fn volume_max(&self) -> u32 {
        self.volume_max
    }
}
