pub mod sys;

use std::{fs::File, os::fd::AsFd, path::Path};

use sys::{
    AudioStreamSource, VideoStreamSource, VideoStreamType, audio_play, audio_select_source, audio_set_mute,
    audio_set_volume, audio_stop, video_play, video_select_source, video_set_streamtype, video_stop,
};

use crate::error::PlayerDeviceError;

/// Wraps `/dev/dvb/adapterN/video0` and `/dev/dvb/adapterN/audio0`: the two
/// hardware decoders that the Linux [`Tdp`](crate::tdp::Tdp) body drives to
/// play the elementary streams a PES filter has routed to them.
pub struct Player {
    video: File,
    audio: File,
}

impl Player {
    pub fn open(video: &Path, audio: &Path) -> Result<Player, std::io::Error> {
        let video = File::open(video)?;
        let audio = File::open(audio)?;
        Ok(Player { video, audio })
    }

    pub fn init(&self) -> Result<(), PlayerDeviceError> {
        video_select_source(self.video.as_fd(), VideoStreamSource::VIDEO_SOURCE_DEMUX)?;
        audio_select_source(self.audio.as_fd(), AudioStreamSource::AUDIO_SOURCE_DEMUX)?;
        Ok(())
    }

    pub fn set_video_stream_type(&self, stream_type: VideoStreamType) -> Result<(), PlayerDeviceError> {
        video_set_streamtype(self.video.as_fd(), stream_type)
    }

    pub fn video_play(&self) -> Result<(), PlayerDeviceError> {
        video_play(self.video.as_fd())
    }

    pub fn video_stop(&self) -> Result<(), PlayerDeviceError> {
        video_stop(self.video.as_fd())
    }

    pub fn audio_play(&self) -> Result<(), PlayerDeviceError> {
        audio_play(self.audio.as_fd())
    }

    pub fn audio_stop(&self) -> Result<(), PlayerDeviceError> {
        audio_stop(self.audio.as_fd())
    }

    pub fn set_mute(&self, mute: bool) -> Result<(), PlayerDeviceError> {
        audio_set_mute(self.audio.as_fd(), mute)
    }

    /// `value` is in `[0, 255]`; the DVB-API has no notion of a configurable
    /// maximum, so the TDP body (§4.2) is responsible for scaling the
    /// controller-facing `[0, volume_max()]` range down to this byte.
    pub fn set_volume(&self, value: u8) -> Result<(), PlayerDeviceError> {
        audio_set_volume(self.audio.as_fd(), value)
    }
}
