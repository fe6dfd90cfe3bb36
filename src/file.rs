//! Access to the bytes behind an [`IniDocument`](crate::IniDocument).
//!
//! [`FileHandle`] is everything the document needs from its backing file. [`DiskFile`] wraps a
//! [`std::fs::File`] and uses operating system advisory locks; [`MemoryFile`] keeps the content
//! in a buffer, which is handy for tests and for documents that never touch the disk.

use std::fs::{File, OpenOptions, TryLockError};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use log::warn;

/// A readable and possibly writable file with advisory locking.
///
/// Lock methods never block; a lock held elsewhere is reported as an error.
pub trait FileHandle {
    fn is_readable(&self) -> bool;

    fn is_writable(&self) -> bool;

    /// Current length in bytes.
    fn size(&mut self) -> io::Result<u64>;

    /// Reads the whole content, starting from the first byte.
    fn read_all(&mut self) -> io::Result<Vec<u8>>;

    /// Truncates to zero length. The position is left where it was.
    fn truncate(&mut self) -> io::Result<()>;

    fn seek_to_start(&mut self) -> io::Result<()>;

    /// Writes all of `data` at the current position.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;

    fn lock_shared(&mut self) -> io::Result<()>;

    fn lock_exclusive(&mut self) -> io::Result<()>;

    fn unlock(&mut self) -> io::Result<()>;
}

/// A file on disk.
#[derive(Debug)]
pub struct DiskFile {
    file: File,
    path: PathBuf,
    writable: bool,
}

impl DiskFile {
    /// Opens `path` for reading only.
    ///
    /// # Errors
    ///
    /// Returns the error from [`File::open`].
    pub fn open_read(path: &Path) -> io::Result<Self> {
        Ok(Self {
            file: File::open(path)?,
            path: path.to_owned(),
            writable: false,
        })
    }

    /// Opens `path` for reading and writing without truncating it.
    ///
    /// # Errors
    ///
    /// Returns the error from [`OpenOptions::open`], including when `path` does not exist.
    pub fn open_read_write(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        Ok(Self {
            file,
            path: path.to_owned(),
            writable: true,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileHandle for DiskFile {
    fn is_readable(&self) -> bool {
        true
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn size(&mut self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut buffer = Vec::new();
        self.file.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    fn truncate(&mut self) -> io::Result<()> {
        self.file.set_len(0)
    }

    fn seek_to_start(&mut self) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0)).map(|_| ())
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        self.file.flush()
    }

    fn lock_shared(&mut self) -> io::Result<()> {
        self.file.try_lock_shared().map_err(lock_error)
    }

    fn lock_exclusive(&mut self) -> io::Result<()> {
        self.file.try_lock().map_err(lock_error)
    }

    fn unlock(&mut self) -> io::Result<()> {
        self.file.unlock()
    }
}

fn lock_error(err: TryLockError) -> io::Error {
    match err {
        TryLockError::Error(err) => err,
        TryLockError::WouldBlock => {
            io::Error::new(io::ErrorKind::WouldBlock, "file is locked by another handle")
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum LockState {
    #[default]
    Unlocked,
    Shared,
    Exclusive,
}

/// An in-memory file.
///
/// Locking follows a single handle: while any lock is held, another lock attempt fails with
/// [`io::ErrorKind::WouldBlock`].
#[derive(Debug, Clone)]
pub struct MemoryFile {
    data: Vec<u8>,
    position: usize,
    writable: bool,
    lock: LockState,
}

impl MemoryFile {
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            writable: true,
            lock: LockState::Unlocked,
        }
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock != LockState::Unlocked
    }

    fn acquire(&mut self, lock: LockState) -> io::Result<()> {
        if self.is_locked() {
            return Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "memory file is already locked",
            ));
        }

        self.lock = lock;
        Ok(())
    }
}

impl Default for MemoryFile {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FileHandle for MemoryFile {
    fn is_readable(&self) -> bool {
        true
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn size(&mut self) -> io::Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        self.position = self.data.len();
        Ok(self.data.clone())
    }

    fn truncate(&mut self) -> io::Result<()> {
        self.data.clear();
        Ok(())
    }

    fn seek_to_start(&mut self) -> io::Result<()> {
        self.position = 0;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if !self.writable {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "memory file is read-only",
            ));
        }

        // Writing past the end leaves a zero-filled gap, like a sparse file.
        let end = self.position + data.len();
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        self.data[self.position..end].copy_from_slice(data);
        self.position = end;
        Ok(())
    }

    fn lock_shared(&mut self) -> io::Result<()> {
        self.acquire(LockState::Shared)
    }

    fn lock_exclusive(&mut self) -> io::Result<()> {
        self.acquire(LockState::Exclusive)
    }

    fn unlock(&mut self) -> io::Result<()> {
        self.lock = LockState::Unlocked;
        Ok(())
    }
}

/// Holds a lock on a [`FileHandle`] and releases it when dropped.
pub(crate) struct LockGuard<'a, H: FileHandle + ?Sized> {
    handle: &'a mut H,
}

impl<'a, H: FileHandle + ?Sized> LockGuard<'a, H> {
    pub(crate) fn shared(handle: &'a mut H) -> io::Result<Self> {
        handle.lock_shared()?;
        Ok(Self { handle })
    }

    pub(crate) fn exclusive(handle: &'a mut H) -> io::Result<Self> {
        handle.lock_exclusive()?;
        Ok(Self { handle })
    }
}

impl<H: FileHandle + ?Sized> Deref for LockGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &Self::Target {
        self.handle
    }
}

impl<H: FileHandle + ?Sized> DerefMut for LockGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.handle
    }
}

impl<H: FileHandle + ?Sized> Drop for LockGuard<'_, H> {
    fn drop(&mut self) {
        if let Err(err) = self.handle.unlock() {
            warn!("failed to release file lock: {err}");
        }
    }
}
