//! Controller Façade (C7): the crate's single entry point. Wires together the
//! acquisition coordinator, the catalog builder, and the playback engine over
//! one [`Tdp`] instance, and exposes the user operations a remote-key
//! dispatcher calls into (§4.7, §6).

use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

use crate::catalog::{ChannelCatalog, build_catalog};
use crate::coordinator::Coordinator;
use crate::error::{ChannelOpError, ControllerError};
use crate::playback::PlaybackEngine;
use crate::presenter::{GraphicsSink, Presenter};
use crate::tdp::{LockStatus, Modulation, Tdp};

/// How long `init` waits for the tuner to report a lock (§4.7).
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// A tunable RF channel carrying one transport stream (§3). Immutable;
/// supplied by the configuration collaborator (Non-goal: reading or parsing
/// the configuration file format itself).
#[derive(Debug, Clone, Copy)]
pub struct Transponder {
    pub frequency_hz: u32,
    pub bandwidth_hz: u32,
    pub modulation: Modulation,
}

/// Already-parsed configuration consumed by [`Controller::init`] (§3, §6).
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub transponder: Transponder,
    /// 1-based; `change_to`'s internal index is `initial_channel - 1`.
    pub initial_channel: u16,
    /// Defaults to the source's hardcoded `0.05` step if a caller passes `0.0`.
    pub volume_max_step: f32,
}

pub struct Controller<T: Tdp, G: GraphicsSink> {
    tdp: T,
    graphics: G,
    catalog: ChannelCatalog,
    engine: Option<PlaybackEngine>,
}

impl<T: Tdp, G: GraphicsSink> Controller<T, G> {
    pub fn new(tdp: T, graphics: G) -> Controller<T, G> {
        Controller {
            tdp,
            graphics,
            catalog: ChannelCatalog::default(),
            engine: None,
        }
    }

    /// `tuner init -> lock-status callback registered -> tune -> wait_for_signal(10s)
    /// -> player init -> source open -> initial volume read -> run C4 -> switch to
    /// `initial_channel` if in range` (§4.7). On any failure, release whatever was
    /// already acquired before returning the error.
    pub fn init(&mut self, config: &Config) -> Result<(), ControllerError> {
        self.init_with_lock_timeout(config, LOCK_TIMEOUT)
    }

    /// Exercises the same sequence as [`Self::init`] but with a caller-supplied
    /// tuner-lock deadline, so tests can provoke the "never locks" path in
    /// milliseconds instead of the real 10 s production timeout.
    pub(crate) fn init_with_lock_timeout(&mut self, config: &Config, lock_timeout: Duration) -> Result<(), ControllerError> {
        self.graphics.init()?;
        if let Err(e) = self.tdp.tuner_init() {
            let _ = self.graphics.deinit();
            return Err(e.into());
        }

        let coordinator = Arc::new(Coordinator::new());
        let lock_result = Arc::new(std::sync::Mutex::new(LockStatus::NotLocked));
        let cb_coordinator = coordinator.clone();
        let cb_result = lock_result.clone();
        self.tdp.tuner_register_lock_cb(Box::new(move |status| {
            *cb_result.lock().unwrap() = status;
            cb_coordinator.signal();
        }));

        let t = &config.transponder;
        if let Err(e) = self.tdp.tuner_lock(t.frequency_hz, t.bandwidth_hz, t.modulation) {
            let _ = self.tdp.tuner_deinit();
            let _ = self.graphics.deinit();
            return Err(e.into());
        }

        if coordinator.wait_for_signal(lock_timeout).is_err() || *lock_result.lock().unwrap() != LockStatus::Locked {
            error!("tuner failed to lock within {lock_timeout:?}");
            let _ = self.tdp.tuner_deinit();
            let _ = self.graphics.deinit();
            return Err(ControllerError::AcquisitionTimeout);
        }
        info!("tuner locked");

        if let Err(e) = self.init_after_lock(config) {
            let _ = self.tdp.source_close();
            let _ = self.tdp.player_deinit();
            let _ = self.tdp.tuner_deinit();
            let _ = self.graphics.deinit();
            return Err(e);
        }

        Ok(())
    }

    fn init_after_lock(&mut self, config: &Config) -> Result<(), ControllerError> {
        self.tdp.player_init()?;
        self.tdp.source_open()?;
        let initial_volume = self.tdp.volume_get()?;

        let catalog = build_catalog(&mut self.tdp)?;
        if catalog.is_empty() {
            return Err(ControllerError::EmptyCatalog);
        }
        info!("channel catalog built: {} channel(s)", catalog.len());

        let volume_max = self.tdp.volume_max();
        self.engine = Some(PlaybackEngine::new(volume_max, config.volume_max_step, initial_volume));
        self.catalog = catalog;

        let index = config.initial_channel.saturating_sub(1) as usize;
        if index < self.catalog.len() {
            if let Err(e) = self.play(index) {
                info!("initial channel {} unavailable: {e}", config.initial_channel);
            }
        }
        Ok(())
    }

    /// `stop playback -> close source -> deinit player -> deinit tuner -> release catalog` (§4.7).
    pub fn deinit(&mut self) -> Result<(), ControllerError> {
        if let Some(engine) = self.engine.as_mut() {
            if let Err(ChannelOpError::Tdp(e)) = engine.stop(&mut self.tdp) {
                return Err(ControllerError::Tdp(e));
            }
        }
        self.tdp.source_close()?;
        self.tdp.player_deinit()?;
        self.tdp.tuner_deinit()?;
        self.graphics.deinit()?;
        self.engine = None;
        self.catalog = ChannelCatalog::default();
        Ok(())
    }

    pub fn catalog(&self) -> &ChannelCatalog {
        &self.catalog
    }

    /// Draw the channel-info banner on success or the "no such channel" banner
    /// on [`ChannelOpError::OutOfRange`] (§4.5, §4.6). A [`ChannelOpError::Tdp`]
    /// failure is hardware/protocol-level and is left to the caller to surface,
    /// not papered over with a banner.
    fn present_switch(&mut self, requested_index: usize, result: &Result<(), ChannelOpError>) {
        let mut presenter = Presenter::new(&mut self.graphics);
        match result {
            Ok(()) => {
                if let Some(channel) = self.catalog.get(requested_index) {
                    let _ = presenter.show_channel_info((requested_index + 1) as u16, &channel.subtitles);
                }
            }
            Err(ChannelOpError::OutOfRange(i)) => {
                let _ = presenter.show_no_such_channel((*i + 1) as u16);
            }
            Err(ChannelOpError::Tdp(_)) => {}
        }
    }

    /// `index` is 0-based; a remote-key dispatcher passing a 1-based number subtracts one first.
    pub fn play(&mut self, index: usize) -> Result<(), ChannelOpError> {
        let result = match self.engine.as_mut() {
            Some(engine) => engine.change_to(&mut self.tdp, &self.catalog, index),
            None => Err(ChannelOpError::OutOfRange(index)),
        };
        self.present_switch(index, &result);
        result
    }

    pub fn next(&mut self) -> Result<(), ChannelOpError> {
        let current = self.engine.as_ref().and_then(|e| e.current_index());
        let target = match (current, self.catalog.len()) {
            (_, 0) => 0,
            (Some(i), len) => (i + 1) % len,
            (None, _) => 0,
        };
        let result = match self.engine.as_mut() {
            Some(engine) => engine.next(&mut self.tdp, &self.catalog),
            None => Err(ChannelOpError::OutOfRange(0)),
        };
        self.present_switch(target, &result);
        result
    }

    pub fn previous(&mut self) -> Result<(), ChannelOpError> {
        let current = self.engine.as_ref().and_then(|e| e.current_index());
        let target = match (current, self.catalog.len()) {
            (_, 0) => 0,
            (Some(0), len) | (None, len) => len - 1,
            (Some(i), _) => i - 1,
        };
        let result = match self.engine.as_mut() {
            Some(engine) => engine.previous(&mut self.tdp, &self.catalog),
            None => Err(ChannelOpError::OutOfRange(0)),
        };
        self.present_switch(target, &result);
        result
    }

    /// Draw the volume banner after every volume-affecting operation (§4.5, §4.6).
    fn present_volume(&mut self) {
        let percent = self.volume_percent();
        let mut presenter = Presenter::new(&mut self.graphics);
        let _ = presenter.show_volume(percent);
    }

    pub fn volume_up(&mut self) -> Result<(), ChannelOpError> {
        let engine = self.engine.as_mut().ok_or(ChannelOpError::OutOfRange(0))?;
        let result = engine.volume_up(&mut self.tdp);
        if result.is_ok() {
            self.present_volume();
        }
        result
    }

    pub fn volume_down(&mut self) -> Result<(), ChannelOpError> {
        let engine = self.engine.as_mut().ok_or(ChannelOpError::OutOfRange(0))?;
        let result = engine.volume_down(&mut self.tdp);
        if result.is_ok() {
            self.present_volume();
        }
        result
    }

    pub fn mute_toggle(&mut self) -> Result<(), ChannelOpError> {
        let engine = self.engine.as_mut().ok_or(ChannelOpError::OutOfRange(0))?;
        let result = engine.mute_toggle(&mut self.tdp);
        if result.is_ok() {
            self.present_volume();
        }
        result
    }

    pub fn volume_percent(&self) -> f32 {
        self.engine.as_ref().map(|e| e.volume_percent()).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphicsError;
    use crate::presenter::GraphicsSink;
    use crate::psi::pmt::LangTag;
    use crate::tdp::fake::FakeTdp;
    use std::time::Duration as StdDuration;

    #[derive(Default)]
    struct RecordingGraphics {
        calls: Vec<String>,
    }

    impl GraphicsSink for RecordingGraphics {
        fn init(&mut self) -> Result<(), GraphicsError> {
            self.calls.push("init".into());
            Ok(())
        }
        fn deinit(&mut self) -> Result<(), GraphicsError> {
            self.calls.push("deinit".into());
            Ok(())
        }
        fn draw_channel_number(&mut self, n: u16) -> Result<(), GraphicsError> {
            self.calls.push(format!("draw_channel_number({n})"));
            Ok(())
        }
        fn draw_channel_number_message(&mut self, n: u16) -> Result<(), GraphicsError> {
            self.calls.push(format!("draw_channel_number_message({n})"));
            Ok(())
        }
        fn draw_channel_info(&mut self, n: u16, sub_count: usize, _sub_tags: &[LangTag]) -> Result<(), GraphicsError> {
            self.calls.push(format!("draw_channel_info({n},{sub_count})"));
            Ok(())
        }
        fn draw_volume_info(&mut self, percent: f32) -> Result<(), GraphicsError> {
            self.calls.push(format!("draw_volume_info({percent})"));
            Ok(())
        }
        fn commit(&mut self) -> Result<(), GraphicsError> {
            self.calls.push("commit".into());
            Ok(())
        }
        fn clear(&mut self, alpha: u8) -> Result<(), GraphicsError> {
            self.calls.push(format!("clear({alpha})"));
            Ok(())
        }
    }

    fn pat_section(entries: &[(u16, u16)]) -> Vec<u8> {
        let section_length = 9 + entries.len() * 4;
        let mut buf = vec![
            crate::psi::pat::TABLE_ID,
            0xB0 | ((section_length >> 8) as u8 & 0x0F),
            (section_length & 0xFF) as u8,
            0x00,
            0x01,
            0xC1,
            0x00,
            0x00,
        ];
        for (program_number, pid) in entries {
            buf.extend_from_slice(&program_number.to_be_bytes());
            buf.extend_from_slice(&(0xE000 | pid).to_be_bytes());
        }
        buf.extend_from_slice(&[0, 0, 0, 0]);
        buf
    }

    fn es_entry(stream_type: u8, pid: u16) -> Vec<u8> {
        vec![stream_type, 0xE0 | ((pid >> 8) as u8 & 0x1F), (pid & 0xFF) as u8, 0xF0, 0x00]
    }

    fn pmt_section(program_number: u16, pcr_pid: u16, stream_entries: &[u8]) -> Vec<u8> {
        let section_length = 9 + stream_entries.len() + 4;
        let mut buf = vec![
            crate::psi::pmt::TABLE_ID,
            0xB0 | ((section_length >> 8) as u8 & 0x0F),
            (section_length & 0xFF) as u8,
        ];
        buf.extend_from_slice(&program_number.to_be_bytes());
        buf.push(0xC1);
        buf.push(0x00);
        buf.push(0x00);
        buf.push(0xE0 | ((pcr_pid >> 8) as u8 & 0x1F));
        buf.push((pcr_pid & 0xFF) as u8);
        buf.push(0xF0);
        buf.push(0x00);
        buf.extend_from_slice(stream_entries);
        buf.extend_from_slice(&[0, 0, 0, 0]);
        buf
    }

    fn config() -> Config {
        Config {
            transponder: Transponder {
                frequency_hz: freq(),
                bandwidth_hz: 8_000_000,
                modulation: Modulation::Qam64,
            },
            initial_channel: 1,
            volume_max_step: 0.05,
        }
    }

    fn freq() -> u32 {
        474_000_000
    }

    #[test]
    fn init_builds_catalog_and_plays_initial_channel() {
        let pat = pat_section(&[(0, 0x10), (1, 0x100), (2, 0x200)]);
        let mut video_audio = es_entry(0x02, 0x101);
        video_audio.extend_from_slice(&es_entry(0x03, 0x102));
        let pmt1 = pmt_section(1, 0x100, &video_audio);
        let pmt2 = pmt_section(2, 0x200, &es_entry(0x02, 0x201));

        let tdp = FakeTdp::new(100)
            .with_lock_delay(StdDuration::ZERO)
            .with_section(crate::psi::pat::PID, crate::psi::pat::TABLE_ID, pat, StdDuration::ZERO)
            .with_section(0x100, crate::psi::pmt::TABLE_ID, pmt1, StdDuration::ZERO)
            .with_section(0x200, crate::psi::pmt::TABLE_ID, pmt2, StdDuration::ZERO);

        let mut controller = Controller::new(tdp, RecordingGraphics::default());
        controller.init(&config()).unwrap();
        assert_eq!(controller.catalog().len(), 2);
        assert_eq!(controller.tdp.open_stream_count(), 2);
        assert!(controller.graphics.calls.contains(&"draw_channel_info(1,0)".to_string()));
    }

    #[test]
    fn out_of_range_play_leaves_controller_usable() {
        let pat = pat_section(&[(1, 0x100)]);
        let pmt1 = pmt_section(1, 0x100, &es_entry(0x02, 0x101));
        let tdp = FakeTdp::new(100)
            .with_lock_delay(StdDuration::ZERO)
            .with_section(crate::psi::pat::PID, crate::psi::pat::TABLE_ID, pat, StdDuration::ZERO)
            .with_section(0x100, crate::psi::pmt::TABLE_ID, pmt1, StdDuration::ZERO);

        let mut controller = Controller::new(tdp, RecordingGraphics::default());
        controller.init(&config()).unwrap();
        let err = controller.play(9).unwrap_err();
        assert!(matches!(err, ChannelOpError::OutOfRange(9)));
        assert_eq!(controller.catalog().len(), 1);
        assert!(controller.graphics.calls.contains(&"draw_channel_number_message(10)".to_string()));
    }

    #[test]
    fn tuner_never_locking_fails_init_cleanly() {
        let tdp = FakeTdp::new(100).never_locks();
        let mut controller = Controller::new(tdp, RecordingGraphics::default());
        // Keep the test fast: the coordinator's own timeout is independent of
        // the production LOCK_TIMEOUT constant, so shrink it here directly.
        let result = controller.init_with_lock_timeout(&config(), StdDuration::from_millis(20));
        assert!(matches!(result, Err(ControllerError::AcquisitionTimeout)));
        assert_eq!(controller.tdp.open_stream_count(), 0);
        assert!(controller.graphics.calls.contains(&"deinit".to_string()));
    }

    #[test]
    fn volume_up_draws_volume_banner() {
        let pat = pat_section(&[(1, 0x100)]);
        let pmt1 = pmt_section(1, 0x100, &es_entry(0x02, 0x101));
        let tdp = FakeTdp::new(100)
            .with_lock_delay(StdDuration::ZERO)
            .with_section(crate::psi::pat::PID, crate::psi::pat::TABLE_ID, pat, StdDuration::ZERO)
            .with_section(0x100, crate::psi::pmt::TABLE_ID, pmt1, StdDuration::ZERO)
            .with_initial_volume(50);

        let mut controller = Controller::new(tdp, RecordingGraphics::default());
        controller.init(&config()).unwrap();
        controller.graphics.calls.clear();
        controller.volume_up().unwrap();
        assert!(controller.graphics.calls.iter().any(|c| c.starts_with("draw_volume_info")));
    }
}
