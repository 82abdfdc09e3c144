//! Playback Engine (C5): channel switching, volume, and mute over the
//! already-built [`ChannelCatalog`].

use log::{info, warn};

use crate::catalog::ChannelCatalog;
use crate::codec::StreamKind;
use crate::error::ChannelOpError;
use crate::tdp::{StreamHandle, Tdp};

/// `⌊VOL_MAX × step⌋`, the source's hardcoded volume step (§3 `volume_max_step`).
const DEFAULT_VOLUME_STEP: f32 = 0.05;

pub struct PlaybackEngine {
    volume_max: u32,
    volume_step: f32,
    current_index: Option<usize>,
    video_handle: Option<StreamHandle>,
    audio_handle: Option<StreamHandle>,
    volume: u32,
    muted: bool,
}

impl PlaybackEngine {
    pub fn new(volume_max: u32, volume_step: f32, initial_volume: u32) -> PlaybackEngine {
        PlaybackEngine {
            volume_max,
            volume_step: if volume_step > 0.0 { volume_step } else { DEFAULT_VOLUME_STEP },
            current_index: None,
            video_handle: None,
            audio_handle: None,
            volume: initial_volume.min(volume_max),
            muted: false,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn volume(&self) -> u32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Displayed volume percent: `0.0` while muted regardless of the stored level (§4.6).
    pub fn volume_percent(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume as f32 / self.volume_max as f32
        }
    }

    /// `stop()`: remove both handles if present and null them (§4.5).
    pub fn stop(&mut self, tdp: &mut dyn Tdp) -> Result<(), ChannelOpError> {
        if let Some(handle) = self.video_handle.take() {
            tdp.stream_remove(handle)?;
        }
        if let Some(handle) = self.audio_handle.take() {
            tdp.stream_remove(handle)?;
        }
        Ok(())
    }

    /// Switch to catalog slot `index` (0-based). On any TDP failure mid-switch,
    /// close whatever was opened in this attempt and leave both handles null
    /// (§4.5 error policy).
    pub fn change_to(&mut self, tdp: &mut dyn Tdp, catalog: &ChannelCatalog, index: usize) -> Result<(), ChannelOpError> {
        let channel = catalog.get(index).ok_or(ChannelOpError::OutOfRange(index))?;

        self.stop(tdp)?;

        let mut opened_video = None;
        let mut opened_audio = None;

        let result = (|| -> Result<(), ChannelOpError> {
            if let Some((pid, codec)) = channel.video {
                let handle = tdp.stream_create(pid, StreamKind::Video(codec))?;
                opened_video = Some(handle);
            }
            if let Some((pid, codec)) = channel.audio {
                let handle = tdp.stream_create(pid, StreamKind::Audio(codec))?;
                opened_audio = Some(handle);
            }
            if !self.muted {
                tdp.volume_set(self.volume)?;
            }
            Ok(())
        })();

        if let Err(e) = result {
            if let Some(handle) = opened_video {
                let _ = tdp.stream_remove(handle);
            }
            if let Some(handle) = opened_audio {
                let _ = tdp.stream_remove(handle);
            }
            warn!("channel switch to slot {index} failed: {e}");
            return Err(e);
        }

        self.video_handle = opened_video;
        self.audio_handle = opened_audio;
        self.current_index = Some(index);
        info!("switched to channel {}", index + 1);
        Ok(())
    }

    pub fn next(&mut self, tdp: &mut dyn Tdp, catalog: &ChannelCatalog) -> Result<(), ChannelOpError> {
        if catalog.is_empty() {
            return Err(ChannelOpError::OutOfRange(0));
        }
        let next = match self.current_index {
            Some(i) => (i + 1) % catalog.len(),
            None => 0,
        };
        self.change_to(tdp, catalog, next)
    }

    pub fn previous(&mut self, tdp: &mut dyn Tdp, catalog: &ChannelCatalog) -> Result<(), ChannelOpError> {
        if catalog.is_empty() {
            return Err(ChannelOpError::OutOfRange(0));
        }
        let previous = match self.current_index {
            Some(0) | None => catalog.len() - 1,
            Some(i) => i - 1,
        };
        self.change_to(tdp, catalog, previous)
    }

    fn step(&self) -> u32 {
        ((self.volume_max as f32) * self.volume_step).floor() as u32
    }

    /// If not muted, reread the hardware volume, then add the step, saturating
    /// at `volume_max`; always clearing mute (§4.5). While muted the hardware
    /// setpoint is pinned to 0 (§3 invariant), so stepping instead starts from
    /// the last tracked `self.volume`.
    pub fn volume_up(&mut self, tdp: &mut dyn Tdp) -> Result<(), ChannelOpError> {
        self.adjust_volume(tdp, |v, step, max| v.saturating_add(step).min(max))
    }

    pub fn volume_down(&mut self, tdp: &mut dyn Tdp) -> Result<(), ChannelOpError> {
        self.adjust_volume(tdp, |v, step, _max| v.saturating_sub(step))
    }

    fn adjust_volume(&mut self, tdp: &mut dyn Tdp, f: impl Fn(u32, u32, u32) -> u32) -> Result<(), ChannelOpError> {
        let current = if self.muted { self.volume } else { tdp.volume_get()? };
        let step = self.step();
        let new_volume = f(current, step, self.volume_max);
        tdp.volume_set(new_volume)?;
        self.volume = new_volume;
        self.muted = false;
        Ok(())
    }

    /// Flip `muted`; apply `0` or the stored volume to the player accordingly (§4.5).
    pub fn mute_toggle(&mut self, tdp: &mut dyn Tdp) -> Result<(), ChannelOpError> {
        self.muted = !self.muted;
        let applied = if self.muted { 0 } else { self.volume };
        tdp.volume_set(applied)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Channel;
    use crate::codec::{AudioCodec, VideoCodec};
    use crate::tdp::fake::FakeTdp;

    fn two_channel_catalog() -> ChannelCatalog {
        ChannelCatalog::from_channels(vec![
            Channel {
                program_number: 1,
                video: Some((0x101, VideoCodec::Mpeg2)),
                audio: Some((0x102, AudioCodec::Mpeg)),
                subtitles: vec![],
            },
            Channel {
                program_number: 2,
                video: Some((0x201, VideoCodec::Mpeg2)),
                audio: None,
                subtitles: vec![],
            },
        ])
    }

    #[test]
    fn change_to_opens_both_handles_when_present() {
        let catalog = two_channel_catalog();
        let mut tdp = FakeTdp::new(100);
        let mut engine = PlaybackEngine::new(100, 0.05, 50);
        engine.change_to(&mut tdp, &catalog, 0).unwrap();
        assert_eq!(tdp.open_stream_count(), 2);
        assert_eq!(engine.current_index(), Some(0));
    }

    #[test]
    fn change_to_tolerates_missing_audio() {
        let catalog = two_channel_catalog();
        let mut tdp = FakeTdp::new(100);
        let mut engine = PlaybackEngine::new(100, 0.05, 50);
        engine.change_to(&mut tdp, &catalog, 1).unwrap();
        assert_eq!(tdp.open_stream_count(), 1);
    }

    #[test]
    fn out_of_range_index_is_rejected_and_state_unchanged() {
        let catalog = two_channel_catalog();
        let mut tdp = FakeTdp::new(100);
        let mut engine = PlaybackEngine::new(100, 0.05, 50);
        engine.change_to(&mut tdp, &catalog, 0).unwrap();
        let err = engine.change_to(&mut tdp, &catalog, 5).unwrap_err();
        assert!(matches!(err, ChannelOpError::OutOfRange(5)));
        assert_eq!(engine.current_index(), Some(0));
    }

    #[test]
    fn failed_switch_leaves_both_handles_null() {
        let catalog = two_channel_catalog();
        let mut tdp = FakeTdp::new(100).fail_stream_create(0x101);
        let mut engine = PlaybackEngine::new(100, 0.05, 50);
        let err = engine.change_to(&mut tdp, &catalog, 0);
        assert!(err.is_err());
        assert_eq!(tdp.open_stream_count(), 0);
        assert_eq!(engine.current_index(), None);
    }

    #[test]
    fn next_wraps_around() {
        let catalog = two_channel_catalog();
        let mut tdp = FakeTdp::new(100);
        let mut engine = PlaybackEngine::new(100, 0.05, 50);
        engine.change_to(&mut tdp, &catalog, 1).unwrap();
        engine.next(&mut tdp, &catalog).unwrap();
        assert_eq!(engine.current_index(), Some(0));
    }

    #[test]
    fn previous_wraps_around() {
        let catalog = two_channel_catalog();
        let mut tdp = FakeTdp::new(100);
        let mut engine = PlaybackEngine::new(100, 0.05, 50);
        engine.change_to(&mut tdp, &catalog, 0).unwrap();
        engine.previous(&mut tdp, &catalog).unwrap();
        assert_eq!(engine.current_index(), Some(1));
    }

    #[test]
    fn mute_toggle_zeroes_player_volume_and_unmute_restores() {
        let mut tdp = FakeTdp::new(100).with_initial_volume(40);
        let mut engine = PlaybackEngine::new(100, 0.05, 40);
        engine.mute_toggle(&mut tdp).unwrap();
        assert!(engine.is_muted());
        assert_eq!(tdp.volume_get().unwrap(), 0);
        engine.mute_toggle(&mut tdp).unwrap();
        assert!(!engine.is_muted());
        assert_eq!(tdp.volume_get().unwrap(), 40);
    }

    #[test]
    fn volume_up_while_muted_unmutes_and_steps_up() {
        let mut tdp = FakeTdp::new(100).with_initial_volume(40);
        let mut engine = PlaybackEngine::new(100, 0.05, 40);
        engine.mute_toggle(&mut tdp).unwrap();
        engine.volume_up(&mut tdp).unwrap();
        assert!(!engine.is_muted());
        assert_eq!(engine.volume(), 45); // steps from the tracked volume (40), not the muted hardware setpoint (0)
    }

    #[test]
    fn volume_step_saturates_at_bounds() {
        let mut tdp = FakeTdp::new(100).with_initial_volume(98);
        let mut engine = PlaybackEngine::new(100, 0.05, 98);
        engine.volume_up(&mut tdp).unwrap();
        assert_eq!(engine.volume(), 100);
    }
}
