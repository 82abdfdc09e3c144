//! Channel Catalog Builder (C4): one sequential PAT-then-PMT acquisition pass
//! that turns raw PSI sections into a typed, user-addressable catalog.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info, warn};

use crate::codec::{StreamKind, translate_stream_type};
use crate::coordinator::Coordinator;
use crate::error::ControllerError;
use crate::psi::pat::{PID as PAT_PID, TABLE_ID as PAT_TABLE_ID, parse_pat};
use crate::psi::pmt::{LangTag, TABLE_ID as PMT_TABLE_ID, parse_pmt};
use crate::tdp::Tdp;

/// How long the builder waits for any single PAT or PMT section (§4.4).
pub const SECTION_TIMEOUT: Duration = Duration::from_secs(3);

/// One program's playable streams, folded from its PMT (§3, §4.5).
#[derive(Debug, Clone, Default)]
pub struct Channel {
    pub program_number: u16,
    pub video: Option<(u16, crate::codec::VideoCodec)>,
    pub audio: Option<(u16, crate::codec::AudioCodec)>,
    pub subtitles: Vec<LangTag>,
}

/// Ordered, 1-based user-addressable sequence of [`Channel`]s, built exactly
/// once per session (§3).
#[derive(Debug, Clone, Default)]
pub struct ChannelCatalog {
    channels: Vec<Channel>,
}

impl ChannelCatalog {
    /// Build a catalog directly from already-folded channels, used by the
    /// playback engine's own tests so they don't need a scripted TDP.
    #[cfg(test)]
    pub(crate) fn from_channels(channels: Vec<Channel>) -> ChannelCatalog {
        ChannelCatalog { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// `index` is 0-based; callers presenting to the user add one (§3).
    pub fn get(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }
}

/// Fold a parsed PMT into a [`Channel`]: first video-translating entry wins
/// the video slot, first audio-translating entry wins the audio slot (§4.5).
fn fold_pmt(pmt: &crate::psi::pmt::PmtRecord) -> Channel {
    let mut channel = Channel {
        program_number: pmt.program_number,
        subtitles: pmt.subtitles.clone(),
        ..Default::default()
    };
    for es in &pmt.elementary_streams {
        match translate_stream_type(es.stream_type) {
            StreamKind::Video(codec) if channel.video.is_none() => {
                channel.video = Some((es.elementary_pid, codec));
            }
            StreamKind::Audio(codec) if channel.audio.is_none() => {
                channel.audio = Some((es.elementary_pid, codec));
            }
            _ => {}
        }
    }
    channel
}

/// Block a section filter's callback and coordinator around one acquisition,
/// returning the raw section bytes once the filter fires or times out.
///
/// Takes the timeout as a parameter rather than hardcoding [`SECTION_TIMEOUT`]
/// so tests can exercise the timeout path in milliseconds instead of the real
/// 3 s production deadline.
fn acquire_section_with_timeout(
    tdp: &mut dyn Tdp,
    pid: u16,
    table_id: u8,
    timeout: Duration,
) -> Result<Vec<u8>, ControllerError> {
    let coordinator = Arc::new(Coordinator::new());
    let slot: Arc<Mutex<Option<Vec<u8>>>> = Arc::new(Mutex::new(None));

    let cb_coordinator = coordinator.clone();
    let cb_slot = slot.clone();
    tdp.demux_register_section_cb(Box::new(move |bytes| {
        *cb_slot.lock().unwrap() = Some(bytes.to_vec());
        cb_coordinator.signal();
    }));

    let filter = tdp.demux_set_filter(pid, table_id)?;
    let result = coordinator.wait_for_signal(timeout);
    tdp.demux_free_filter(filter)?;
    tdp.demux_unregister_section_cb();
    result?;

    Ok(slot.lock().unwrap().take().unwrap_or_default())
}

/// Run the full PAT-then-PMT acquisition pass and build the catalog (§4.4).
/// An `AcquisitionTimeout` on the PAT or any PMT aborts the whole build; a
/// per-program `ParseError` just skips that program's slot.
pub fn build_catalog(tdp: &mut dyn Tdp) -> Result<ChannelCatalog, ControllerError> {
    build_catalog_with_timeout(tdp, SECTION_TIMEOUT)
}

/// Exercises the same sequence as [`build_catalog`] but with a caller-supplied
/// per-section deadline, so tests can provoke the mid-build abort-on-timeout
/// path in milliseconds instead of the real 3 s production timeout.
pub(crate) fn build_catalog_with_timeout(tdp: &mut dyn Tdp, timeout: Duration) -> Result<ChannelCatalog, ControllerError> {
    let pat_bytes = acquire_section_with_timeout(tdp, PAT_PID, PAT_TABLE_ID, timeout)?;
    let pat = parse_pat(&pat_bytes)?;
    info!("PAT acquired: {} program(s)", pat.program_count());

    let mut channels = Vec::with_capacity(pat.program_count());
    for entry in pat.entries.iter().filter(|e| e.program_number != 0) {
        match acquire_section_with_timeout(tdp, entry.program_map_pid, PMT_TABLE_ID, timeout) {
            Ok(bytes) => match parse_pmt(&bytes) {
                Ok(pmt) => {
                    debug!(
                        "program {} folded: {} elementary stream(s)",
                        pmt.program_number,
                        pmt.elementary_streams.len()
                    );
                    channels.push(fold_pmt(&pmt));
                }
                Err(e) => {
                    warn!("program {} PMT malformed, skipping: {e}", entry.program_number);
                }
            },
            Err(ControllerError::AcquisitionTimeout) => {
                warn!("program {} PMT timed out, aborting catalog build", entry.program_number);
                return Err(ControllerError::AcquisitionTimeout);
            }
            Err(e) => return Err(e),
        }
    }

    info!("catalog built with {} channel(s)", channels.len());
    Ok(ChannelCatalog { channels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{AudioCodec, VideoCodec};
    use crate::psi::pmt::PmtElementaryStream;
    use crate::tdp::fake::FakeTdp;
    use std::time::Duration as StdDuration;

    fn pat_section(entries: &[(u16, u16)]) -> Vec<u8> {
        let section_length = 9 + entries.len() * 4;
        let mut buf = vec![
            PAT_TABLE_ID,
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
        vec![
            stream_type,
            0xE0 | ((pid >> 8) as u8 & 0x1F),
            (pid & 0xFF) as u8,
            0xF0,
            0x00,
        ]
    }

    fn pmt_section(program_number: u16, pcr_pid: u16, stream_entries: &[u8]) -> Vec<u8> {
        let section_length = 9 + stream_entries.len() + 4;
        let mut buf = vec![
            PMT_TABLE_ID,
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

    #[test]
    fn builds_catalog_from_pat_and_pmts() {
        let pat = pat_section(&[(0, 0x10), (1, 0x100), (2, 0x200)]);
        let mut video_audio = es_entry(0x02, 0x101);
        video_audio.extend_from_slice(&es_entry(0x03, 0x102));
        let pmt1 = pmt_section(1, 0x100, &video_audio);
        let pmt2 = pmt_section(2, 0x200, &es_entry(0x02, 0x201));

        let mut tdp = FakeTdp::new(100)
            .with_section(PAT_PID, PAT_TABLE_ID, pat, StdDuration::ZERO)
            .with_section(0x100, PMT_TABLE_ID, pmt1, StdDuration::ZERO)
            .with_section(0x200, PMT_TABLE_ID, pmt2, StdDuration::ZERO);

        let catalog = build_catalog(&mut tdp).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().video, Some((0x101, VideoCodec::Mpeg2)));
        assert_eq!(catalog.get(0).unwrap().audio, Some((0x102, AudioCodec::Mpeg)));
        assert_eq!(catalog.get(1).unwrap().video, Some((0x201, VideoCodec::Mpeg2)));
        assert!(catalog.get(1).unwrap().audio.is_none());
    }

    #[test]
    fn aborts_on_first_pmt_timeout() {
        // Program 1's PMT is never scripted, so its wait times out. Program 2's
        // PMT is scripted and would succeed immediately if ever requested, so
        // this also proves the builder stops after program 1 instead of
        // continuing past the timeout.
        let pat = pat_section(&[(1, 0x100), (2, 0x200)]);
        let pmt2 = pmt_section(2, 0x200, &es_entry(0x02, 0x201));
        let mut tdp = FakeTdp::new(100)
            .with_section(PAT_PID, PAT_TABLE_ID, pat, StdDuration::ZERO)
            .with_section(0x200, PMT_TABLE_ID, pmt2, StdDuration::ZERO);

        let result = build_catalog_with_timeout(&mut tdp, StdDuration::from_millis(20));
        assert!(matches!(result, Err(ControllerError::AcquisitionTimeout)));
        assert_eq!(
            tdp.requested_filters(),
            vec![(PAT_PID, PAT_TABLE_ID), (0x100, PMT_TABLE_ID)],
            "program 2's PMT must never be requested once program 1's PMT times out"
        );
    }

    #[test]
    fn malformed_pmt_skips_slot_and_continues() {
        let pat = pat_section(&[(1, 0x100), (2, 0x200)]);
        let bad_pmt = vec![0xFFu8; 4]; // wrong table_id, too short to matter
        let pmt2 = pmt_section(2, 0x200, &es_entry(0x02, 0x201));

        let mut tdp = FakeTdp::new(100)
            .with_section(PAT_PID, PAT_TABLE_ID, pat, StdDuration::ZERO)
            .with_section(0x100, PMT_TABLE_ID, bad_pmt, StdDuration::ZERO)
            .with_section(0x200, PMT_TABLE_ID, pmt2, StdDuration::ZERO);

        let catalog = build_catalog(&mut tdp).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().program_number, 2);
    }

    #[test]
    fn eight_section_pat_with_duplicate_program_zero() {
        let pat = pat_section(&[
            (0, 0x10),
            (0, 0x11),
            (0, 0x12),
            (1, 0x100),
            (2, 0x200),
            (3, 0x300),
            (4, 0x400),
            (5, 0x500),
        ]);
        let mut tdp = FakeTdp::new(100).with_section(PAT_PID, PAT_TABLE_ID, pat, StdDuration::ZERO);
        for pid in [0x100, 0x200, 0x300, 0x400, 0x500] {
            tdp = tdp.with_section(pid, PMT_TABLE_ID, pmt_section(pid, pid, &es_entry(0x02, pid + 1)), StdDuration::ZERO);
        }
        let catalog = build_catalog(&mut tdp).unwrap();
        assert_eq!(catalog.len(), 5);
    }
}
