use nix::errno::Errno;
use thiserror::Error;

//
// ----- Linux DVB-API ioctl errors

/// (taken from [official docs](https://www.linuxtv.org/downloads/v4l-dvb-apis-new/userspace-api/dvb/dmx-start.html#return-value))
#[derive(Error, Debug)]
pub enum DmxStartError {
    /// Invalid argument, i.e. no filtering parameters provided via the DMX_SET_FILTER or DMX_SET_PES_FILTER ioctls.
    #[error("invalid arguments for filter")]
    InvalidArgument,
    /// This error code indicates that there are conflicting requests. There are active filters filtering data from another input source. Make sure that these filters are stopped before starting this filter.
    #[error("already filtering from another input source")]
    Conflicting,
    #[error("undefined error from ioctl")]
    Undefined(Errno),
}

impl From<Errno> for DmxStartError {
    fn from(value: Errno) -> Self {
        match value {
            Errno::EINVAL => DmxStartError::InvalidArgument,
            Errno::EBUSY => DmxStartError::Conflicting,
            e => DmxStartError::Undefined(e),
        }
    }
}

//
// -----

/// (taken from [official docs](https://www.linuxtv.org/downloads/v4l-dvb-apis-new/userspace-api/dvb/dmx-set-filter.html#return-value))
#[derive(Error, Debug)]
pub enum DmxSetFilterError {
    #[error("already filtering from another input source")]
    Conflicting,
    #[error("undefined error from ioctl")]
    Undefined(Errno),
}

impl From<Errno> for DmxSetFilterError {
    fn from(value: Errno) -> Self {
        match value {
            Errno::EBUSY => DmxSetFilterError::Conflicting,
            e => DmxSetFilterError::Undefined(e),
        }
    }
}

//
// -----

/// (taken from [official docs](https://www.linuxtv.org/downloads/v4l-dvb-apis-new/userspace-api/dvb/dmx-set-pes-filter.html#return-value))
#[derive(Error, Debug)]
pub enum DmxSetPesFilterError {
    #[error("already filtering from another input source")]
    Conflicting,
    #[error("undefined error from ioctl")]
    Undefined(Errno),
}

impl From<Errno> for DmxSetPesFilterError {
    fn from(value: Errno) -> Self {
        match value {
            Errno::EBUSY => DmxSetPesFilterError::Conflicting,
            e => DmxSetPesFilterError::Undefined(e),
        }
    }
}

//
// -----

/// Errors from the `/dev/dvb/adapterN/{video,audio}0` device ioctls (linux/dvb/video.h, audio.h).
#[derive(Error, Debug)]
pub enum PlayerDeviceError {
    #[error("failed to open player device: {0}")]
    Open(std::io::Error),
    #[error("no free decoder for this pid")]
    NoFreeDecoder,
    #[error("undefined error from ioctl")]
    Undefined(Errno),
}

impl From<Errno> for PlayerDeviceError {
    fn from(value: Errno) -> Self {
        match value {
            Errno::EBUSY => PlayerDeviceError::NoFreeDecoder,
            e => PlayerDeviceError::Undefined(e),
        }
    }
}

//
// -----

#[derive(Error, Debug)]
pub enum PropertyError {
    #[error("too many properties in a single request")]
    TooManyParameters,
    #[error("FE_SET_PROPERTY failed: {0}")]
    SetProperty(Errno),
    #[error("FE_GET_PROPERTY failed: {0}")]
    GetProperty(Errno),
}

//
// -----

#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("failed to open frontend device: {0}")]
    Open(std::io::Error),
    #[error("FE_GET_INFO failed: {0}")]
    InfoQuery(Errno),
    #[error("FE_READ_STATUS failed: {0}")]
    StatusQuery(Errno),
    #[error("property request failed: {0}")]
    Property(#[from] PropertyError),
    #[error("property value missing or malformed")]
    Retrieve,
}

//
// ----- Stream Controller core errors (§7 of the specification)

/// A malformed PSI (PAT/PMT) section. Parsing is pure and never panics; every
/// failure mode surfaces as one of these variants instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("section buffer is shorter than the field being read")]
    Truncated,
    #[error("unexpected table_id: expected {expected:#04x}, found {found:#04x}")]
    UnexpectedTableId { expected: u8, found: u8 },
    #[error("section_length is too small to contain a valid header")]
    SectionTooShort,
}

/// Failure of a call into the TDP hardware façade (C2).
#[derive(Error, Debug)]
pub enum TdpError {
    #[error("tuner error: {0}")]
    Tuner(String),
    #[error("demux error: {0}")]
    Demux(String),
    #[error("player error: {0}")]
    Player(String),
    #[error("a section filter is already installed")]
    FilterAlreadyInstalled,
    #[error("no section filter is currently installed")]
    NoFilterInstalled,
}

/// Failure reported by the graphics collaborator consumed by the Presenter (C6).
#[derive(Error, Debug)]
pub enum GraphicsError {
    #[error("graphics collaborator error: {0}")]
    Draw(String),
}

/// Failure of the acquisition coordinator's rendezvous (C3).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("acquisition timed out")]
pub struct AcquisitionTimeout;

/// Errors surfaced by the channel catalog builder (C4) and the controller façade (C7).
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error(transparent)]
    Tdp(#[from] TdpError),
    #[error("acquisition timed out waiting for tuner lock or a PSI section")]
    AcquisitionTimeout,
    #[error("PAT section was malformed: {0}")]
    Parse(#[from] ParseError),
    #[error("channel catalog is empty after build")]
    EmptyCatalog,
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
}

impl From<AcquisitionTimeout> for ControllerError {
    fn from(_: AcquisitionTimeout) -> Self {
        ControllerError::AcquisitionTimeout
    }
}

/// Errors surfaced by the playback engine (C5) when switching channels.
#[derive(Error, Debug)]
pub enum ChannelOpError {
    #[error("channel index {0} is out of range")]
    OutOfRange(usize),
    #[error(transparent)]
    Tdp(#[from] TdpError),
}
