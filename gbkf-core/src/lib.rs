//! Codec for GBKF, a self-describing tagged binary container format.
//!
//! A GBKF buffer is a fixed 20-byte header, a sequence of keyed entries and an
//! optional SHA-256 footer:
//!
//! * [`Writer`] appends entries to a growing buffer and produces the output
//!   bytes, optionally with the footer.
//! * [`Reader`] decodes the header eagerly, checks the footer and decodes the
//!   entries into an insertion-ordered [`KeyedEntries`] map on demand.
//!
//! Every multi-byte field is little-endian. The codec works on in-memory
//! buffers; [`ByteSource`] and [`ByteSink`] are the seam for path-based I/O,
//! and [`DigestProvider`] for the footer digest.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod entry;
pub mod entry_map;
pub mod error;
pub mod footer;
pub mod format;
pub mod header;
pub mod io;
mod reader;
pub mod text;
pub mod value_type;
mod writer;

pub use entry::{EntryValue, KeyedEntry, StringLayout, Values};
pub use entry_map::KeyedEntries;
pub use error::{GbkfError, GbkfResult};
pub use footer::{DigestProvider, FooterStatus, Sha256Digest};
pub use header::Header;
pub use io::{ByteSink, ByteSource, FsStore};
pub use reader::Reader;
pub use value_type::{EncodingChoice, StringEncoding, ValueType};
pub use writer::Writer;
