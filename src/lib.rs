#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! Read, query, edit and write INI configuration files.
//!
//! ```
//! use inidoc::{IniDocument, MemoryFile, Options, Value};
//!
//! let file = MemoryFile::new("[server]\nport = 8080\n");
//! let mut ini = IniDocument::from_handle(file, Options::new()).unwrap();
//!
//! assert_eq!(ini.fetch_entry("server", "port"), Some(&Value::Int(8080)));
//!
//! ini.set_entry("server", "host", "localhost").unwrap();
//! ini.save().unwrap();
//!
//! assert_eq!(
//!     ini.handle().contents(),
//!     b"[server]\nport=8080\nhost=localhost\n\n"
//! );
//! ```

mod error;
mod file;
mod ini;
mod options;
mod parser;
mod section;
pub mod validate;
mod value;
mod writer;

pub use error::{Error, ErrorKind, Parameter, ParseError, ValidationError};
pub use file::{DiskFile, FileHandle, MemoryFile};
pub use ini::IniDocument;
pub use options::{LineEnding, Options, ScannerMode};
pub use parser::{decode, parse};
pub use section::{Document, Entry, Section};
pub use value::Value;
pub use writer::serialize;
