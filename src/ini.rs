use std::io;
use std::path::Path;

use log::{debug, trace};

use crate::error::{Error, Parameter, ValidationError};
use crate::file::{DiskFile, FileHandle, LockGuard};
use crate::options::Options;
use crate::parser;
use crate::section::{Document, Section};
use crate::validate;
use crate::value::Value;
use crate::writer;

/// An INI file loaded into memory.
///
/// Reads take a shared lock on the backing file for as long as the bytes are being read; saves
/// take an exclusive lock across truncating and rewriting it. A document opened read-only
/// rejects every mutation and [`save`](Self::save) for its whole lifetime.
#[derive(Debug)]
pub struct IniDocument<H = DiskFile> {
    handle: H,
    document: Document,
    options: Options,
}

impl IniDocument<DiskFile> {
    /// Opens the file at `path` and parses it.
    ///
    /// Unless `options.read_only` is set, the file is opened for writing as well; if write
    /// access is denied it is opened read-only and [`save`](Self::save) will fail with
    /// [`Error::FileNotWritable`].
    ///
    /// # Errors
    ///
    /// [`Error::FileNotExist`] if `path` does not exist, [`Error::FileNotReadable`] if it cannot
    /// be opened, and anything [`reload`](Self::reload) returns.
    pub fn open<P: AsRef<Path>>(path: P, options: Options) -> Result<Self, Error> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::FileNotExist {
                path: path.to_owned(),
            });
        }

        let handle = if options.read_only {
            DiskFile::open_read(path)
        } else {
            DiskFile::open_read_write(path).or_else(|err| match err.kind() {
                io::ErrorKind::PermissionDenied => DiskFile::open_read(path),
                _ => Err(err),
            })
        }
        .map_err(|source| Error::FileNotReadable { source })?;

        debug!(
            "opened {} (writable: {}, mode: {})",
            path.display(),
            handle.is_writable(),
            options.scanner_mode
        );

        Self::from_handle(handle, options)
    }
}

impl<H: FileHandle> IniDocument<H> {
    /// Wraps an already opened handle and parses its content.
    ///
    /// # Errors
    ///
    /// [`Error::FileNotReadable`] if the handle cannot be read, and anything
    /// [`reload`](Self::reload) returns.
    pub fn from_handle(handle: H, options: Options) -> Result<Self, Error> {
        if !handle.is_readable() {
            return Err(Error::FileNotReadable {
                source: io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "handle was not opened for reading",
                ),
            });
        }

        let mut this = Self {
            handle,
            document: Document::new(),
            options,
        };
        this.reload()?;

        Ok(this)
    }

    /// Replaces the in-memory document with the current content of the file.
    ///
    /// Unsaved changes are discarded. On error the previous document is kept.
    ///
    /// # Errors
    ///
    /// [`Error::FileLockFailed`] if the shared lock is held elsewhere,
    /// [`Error::FileReadWriteFailed`] if reading fails and [`Error::IniParseFailed`] if the
    /// content is not valid INI.
    pub fn reload(&mut self) -> Result<(), Error> {
        let size = self
            .handle
            .size()
            .map_err(|source| Error::FileReadWriteFailed { source })?;

        if size == 0 {
            debug!("file is empty");
            self.document = Document::new();
            return Ok(());
        }

        let bytes = {
            let mut guard = LockGuard::shared(&mut self.handle)
                .map_err(|source| Error::FileLockFailed { source })?;
            guard
                .read_all()
                .map_err(|source| Error::FileReadWriteFailed { source })?
        };

        let text = parser::decode(&bytes);
        self.document = parser::parse(&text, self.options.scanner_mode)?;
        debug!(
            "read {} bytes into {} sections",
            bytes.len(),
            self.document.len()
        );

        Ok(())
    }

    #[must_use]
    pub fn fetch_all(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn fetch_section(&self, section: &str) -> Option<&Section> {
        self.document.section(section.trim())
    }

    /// Returns `None` only when the section or key is absent; stored empty, `0`, `false` and
    /// null values are all `Some`.
    #[must_use]
    pub fn fetch_entry(&self, section: &str, key: &str) -> Option<&Value> {
        self.document.get(section.trim(), key.trim())
    }

    /// Sets a single entry, creating the section if needed. The value is stored as a string.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyMode`], or [`Error::InvalidParameter`] naming the first argument that
    /// fails validation after trimming.
    pub fn set_entry(&mut self, section: &str, key: &str, value: &str) -> Result<(), Error> {
        self.ensure_writable()?;

        let section = checked(Parameter::Section, section, validate::section_name)?;
        let key = checked(Parameter::Key, key, validate::key)?;
        let value = checked(Parameter::Value, value, validate::value)?;

        trace!("set [{section}] {key}");
        self.document
            .section_mut_or_insert(section)
            .set(key.to_owned(), Value::String(value.to_owned()));

        Ok(())
    }

    /// Sets a whole section.
    ///
    /// With `merge`, `entries` are laid over an existing section and its other keys are kept.
    /// Otherwise the section ends up holding exactly `entries`. Nothing changes unless every
    /// name and value is valid.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyMode`], or [`Error::InvalidParameter`] for the first invalid name or
    /// value.
    pub fn set_section<I, K, V>(&mut self, section: &str, entries: I, merge: bool) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.ensure_writable()?;

        let section = checked(Parameter::Section, section, validate::section_name)?;
        let entries = entries
            .into_iter()
            .map(|(key, value)| {
                let key = checked(Parameter::Key, key.as_ref(), validate::key)?;
                let value = checked(Parameter::Value, value.as_ref(), validate::value)?;
                Ok((key.to_owned(), Value::String(value.to_owned())))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        trace!("set [{section}] with {} entries (merge: {merge})", entries.len());

        if merge {
            let target = self.document.section_mut_or_insert(section);
            for (key, value) in entries {
                target.set(key, value);
            }
        } else {
            let mut replacement = Section::new(section.to_owned());
            for (key, value) in entries {
                replacement.set(key, value);
            }
            self.document.replace_section(replacement);
        }

        Ok(())
    }

    /// Removes an entry. Missing sections and keys are ignored.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyMode`].
    pub fn delete_entry(&mut self, section: &str, key: &str) -> Result<(), Error> {
        self.ensure_writable()?;

        let (section, key) = (section.trim(), key.trim());
        if let Some(section) = self.document.section_mut(section)
            && section.remove(key).is_some()
        {
            trace!("deleted [{}] {key}", section.name());
        }

        Ok(())
    }

    /// Removes a section and all its entries. A missing section is ignored.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyMode`].
    pub fn delete_section(&mut self, section: &str) -> Result<(), Error> {
        self.ensure_writable()?;

        if self.document.remove_section(section.trim()).is_some() {
            trace!("deleted [{}]", section.trim());
        }

        Ok(())
    }

    /// Writes the document back to the file, replacing its content.
    ///
    /// The exclusive lock is held from truncation until the last byte is written. A failure
    /// after truncation can leave the file empty or partially written.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyMode`], [`Error::FileNotWritable`], [`Error::FileLockFailed`] if the
    /// file is locked elsewhere, and [`Error::FileReadWriteFailed`] if truncating or writing
    /// fails.
    pub fn save(&mut self) -> Result<(), Error> {
        self.ensure_writable()?;

        if !self.handle.is_writable() {
            return Err(Error::FileNotWritable {
                source: io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "handle was not opened for writing",
                ),
            });
        }

        let text = writer::serialize(&self.document, self.options.line_ending);

        let mut guard = LockGuard::exclusive(&mut self.handle)
            .map_err(|source| Error::FileLockFailed { source })?;
        let read_write = |source: io::Error| Error::FileReadWriteFailed { source };
        guard.truncate().map_err(read_write)?;
        guard.seek_to_start().map_err(read_write)?;
        guard.write(text.as_bytes()).map_err(read_write)?;
        drop(guard);

        debug!("wrote {} bytes", text.len());
        Ok(())
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    #[must_use]
    pub fn into_handle(self) -> H {
        self.handle
    }

    fn ensure_writable(&self) -> Result<(), Error> {
        if self.options.read_only {
            return Err(Error::ReadOnlyMode);
        }

        Ok(())
    }
}

/// Trims `input` and runs `check` on the result.
fn checked(
    parameter: Parameter,
    input: &str,
    check: fn(&str) -> Result<(), ValidationError>,
) -> Result<&str, Error> {
    let trimmed = input.trim();
    check(trimmed).map_err(|reason| Error::invalid(parameter, trimmed, reason))?;
    Ok(trimmed)
}
