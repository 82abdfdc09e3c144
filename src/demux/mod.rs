pub mod sys;

use std::{fs::File, io::Read, os::fd::AsFd, path::Path};

use sys::{DmxPesFilterParams, DmxSctFilterParams, set_filter, set_pes_filter, start, stop};

use crate::error::{DmxSetFilterError, DmxSetPesFilterError, DmxStartError};

pub struct Demux {
    file: File,
}

impl Demux {
    pub fn open(demux: &Path) -> Result<Demux, std::io::Error> {
        let file = File::open(demux)?;
        Ok(Demux { file })
    }

    /// Blocks until a full section (matching the currently installed filter) is
    /// available, then returns it. The returned slice of `buf` is the section
    /// payload, CRC32 included.
    ///
    /// Takes `&self`, not `&mut self`: the kernel serializes the underlying
    /// `read(2)` against concurrent `DMX_STOP`/`DMX_SET_FILTER` ioctls on the
    /// same fd, so a reader thread blocked here never has to hold a lock that
    /// a controlling thread needs in order to abort it.
    pub fn read<'a>(&self, buf: &'a mut [u8]) -> Result<&'a [u8], std::io::Error> {
        let n = (&self.file).read(buf)?;
        Ok(&buf[..n])
    }

    pub fn start(&self) -> Result<(), DmxStartError> {
        start(self.file.as_fd())
    }

    pub fn stop(&self) -> Result<(), DmxStartError> {
        stop(self.file.as_fd())
    }

    /// Install a section filter, matching PSI sections by PID and `table_id` (§4.2, §4.4).
    pub fn set_filter(&self, filter: &DmxSctFilterParams) -> Result<(), DmxSetFilterError> {
        set_filter(self.file.as_fd(), filter)
    }

    /// Install a PES filter routing one elementary stream's PID straight into
    /// the hardware decoder, used by the Linux TDP body's `stream_create` (§4.2).
    pub fn set_pes_filter(&self, filter: &DmxPesFilterParams) -> Result<(), DmxSetPesFilterError> {
        set_pes_filter(self.file.as_fd(), filter)
    }
}
