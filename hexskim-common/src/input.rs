//! Models how the raw bytes of the device under inspection are accessed.

use std::{fmt, io, path::PathBuf};

use positioned_io::{RandomAccessFile, ReadAt as _, Size as _};
use size_format::SizeFormatterBinary;

use crate::{AbsoluteOffset, Len};

/// A read-only random-access handle to the device or file under inspection.
///
/// The handle is opened once at startup and dropped exactly once at shutdown;
/// nothing else in the pager owns device resources.
pub struct Device {
    /// The path the device was opened from.
    path: PathBuf,
    /// The open handle.
    file: RandomAccessFile,
    /// The length of the device in bytes.
    len: u64,
}

impl Device {
    /// Opens the device or file at the given path.
    ///
    /// Raw block devices often report no usable size through their metadata;
    /// for those the operator-supplied `size_override` (in bytes) is used
    /// instead. The override is ignored whenever the backing reports a size
    /// of its own.
    pub fn open(path: impl Into<PathBuf>, size_override: Option<u64>) -> Result<Device, OpenError> {
        let path = path.into();

        let file = match RandomAccessFile::open(&path) {
            Ok(file) => file,
            Err(err) => return Err(OpenError::io(path, err)),
        };

        let reported = match file.size() {
            Ok(size) => size,
            Err(err) => return Err(OpenError::io(path, err)),
        };

        let len = match reported {
            Some(len) if len > 0 => len,
            _ => match size_override {
                Some(len) => len,
                None => return Err(OpenError::new(path, OpenErrorKind::UnknownSize)),
            },
        };

        if len == 0 {
            return Err(OpenError::new(path, OpenErrorKind::Empty));
        }

        Ok(Device { path, file, len })
    }

    /// The length of the device in bytes.
    pub fn len(&self) -> Len {
        Len::from(self.len)
    }

    /// Determines if the device is empty.
    pub fn is_empty(&self) -> bool {
        self.len().is_zero()
    }

    /// The path the device was opened from.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Fills the buffer with the bytes at the given offset, returning the
    /// filled slice.
    ///
    /// Reads past the end of the device are truncated to the bytes that
    /// exist, so the returned slice may be shorter than the buffer; that is
    /// how the short final block of an oddly-sized device reaches the codec.
    pub fn read_at<'buf>(
        &self,
        offset: AbsoluteOffset,
        buf: &'buf mut [u8],
    ) -> io::Result<&'buf [u8]> {
        if offset.as_u64() > self.len {
            return Err(io::Error::other("offset is beyond input"));
        }

        let len_left = self.len - offset.as_u64();
        let output_size = std::cmp::min(len_left, buf.len().try_into().unwrap_or(u64::MAX));
        let truncated_buf = &mut buf[..output_size
            .try_into()
            .expect("we used min above, so this must fit into `buf`")];

        self.file.read_exact_at(offset.as_u64(), truncated_buf)?;

        Ok(truncated_buf)
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device({}, {}B)",
            self.path.display(),
            SizeFormatterBinary::new(self.len),
        )
    }
}

/// An error opening the device under inspection.
///
/// These are the only fatal errors the pager produces at startup.
#[derive(Debug)]
pub struct OpenError {
    /// The path that was being opened.
    path: PathBuf,
    /// What went wrong.
    kind: OpenErrorKind,
}

/// The ways opening a device can fail.
#[derive(Debug)]
pub enum OpenErrorKind {
    /// The underlying open or metadata query failed.
    Io(io::Error),
    /// The device reports no size and the operator supplied no override.
    UnknownSize,
    /// The device has no bytes to show.
    Empty,
}

impl OpenError {
    fn new(path: PathBuf, kind: OpenErrorKind) -> OpenError {
        OpenError { path, kind }
    }

    fn io(path: PathBuf, err: io::Error) -> OpenError {
        OpenError::new(path, OpenErrorKind::Io(err))
    }

    /// What went wrong.
    pub fn kind(&self) -> &OpenErrorKind {
        &self.kind
    }
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.path.display())?;
        match &self.kind {
            OpenErrorKind::Io(err) => err.fmt(f),
            OpenErrorKind::UnknownSize => {
                f.write_str("size not reported; pass an explicit size in bytes")
            }
            OpenErrorKind::Empty => f.write_str("device is empty"),
        }
    }
}

impl std::error::Error for OpenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            OpenErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}
