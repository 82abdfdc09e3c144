//! DVB `stream_type` to codec translation (§3, §9).
//!
//! A lookup table rather than a `match` so new stream types can be added
//! without touching any call site.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    Mpeg2,
    H264,
    Hevc,
    Vp6F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCodec {
    Mpeg,
    Aac,
    DolbyAc3,
}

/// What role (if any) an elementary stream plays in playback. Stream types
/// this crate does not recognize map to `Other` and are ignored (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Video(VideoCodec),
    Audio(AudioCodec),
    Other,
}

/// DVB `stream_type` -> [`StreamKind`] translation table (ISO/IEC 13818-1
/// table 2-34, extended with the DVB/ATSC registrations for AC-3).
const TABLE: &[(u8, StreamKind)] = &[
    (0x01, StreamKind::Video(VideoCodec::Mpeg2)),
    (0x02, StreamKind::Video(VideoCodec::Mpeg2)),
    (0x1B, StreamKind::Video(VideoCodec::H264)),
    (0x24, StreamKind::Video(VideoCodec::Hevc)),
    (0xA0, StreamKind::Video(VideoCodec::Vp6F)),
    (0x03, StreamKind::Audio(AudioCodec::Mpeg)),
    (0x04, StreamKind::Audio(AudioCodec::Mpeg)),
    (0x0F, StreamKind::Audio(AudioCodec::Aac)),
    (0x11, StreamKind::Audio(AudioCodec::Aac)),
    (0x6A, StreamKind::Audio(AudioCodec::DolbyAc3)),
    (0x81, StreamKind::Audio(AudioCodec::DolbyAc3)),
];

pub fn translate_stream_type(stream_type: u8) -> StreamKind {
    TABLE
        .iter()
        .find(|(t, _)| *t == stream_type)
        .map(|(_, kind)| *kind)
        .unwrap_or(StreamKind::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_video_and_audio() {
        assert_eq!(
            translate_stream_type(0x02),
            StreamKind::Video(VideoCodec::Mpeg2)
        );
        assert_eq!(
            translate_stream_type(0x1B),
            StreamKind::Video(VideoCodec::H264)
        );
        assert_eq!(
            translate_stream_type(0x03),
            StreamKind::Audio(AudioCodec::Mpeg)
        );
    }

    #[test]
    fn unknown_stream_type_is_other() {
        assert_eq!(translate_stream_type(0xFF), StreamKind::Other);
        assert_eq!(translate_stream_type(0x05), StreamKind::Other);
    }
}
