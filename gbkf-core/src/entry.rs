//! Keyed entries and their typed value lists.
//!
//! A [`KeyedEntry`] owns one [`Values`] list. The variant of that list is the
//! entry's [`ValueType`], so a tag and its payload can never disagree. Typed
//! access goes through the sealed [`EntryValue`] trait, which maps each Rust
//! element type to the variant that stores it.

use crate::error::{GbkfError, GbkfResult};
use crate::value_type::{EncodingChoice, StringEncoding, ValueType};

/// Value list of one entry, one variant per value kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    /// Raw bytes.
    Blob(Vec<u8>),
    /// Booleans.
    Boolean(Vec<bool>),
    /// Strings.
    String(Vec<String>),
    /// `i8` values.
    Int8(Vec<i8>),
    /// `i16` values.
    Int16(Vec<i16>),
    /// `i32` values.
    Int32(Vec<i32>),
    /// `i64` values.
    Int64(Vec<i64>),
    /// `u8` values.
    UInt8(Vec<u8>),
    /// `u16` values.
    UInt16(Vec<u16>),
    /// `u32` values.
    UInt32(Vec<u32>),
    /// `u64` values.
    UInt64(Vec<u64>),
    /// `f32` values.
    Float32(Vec<f32>),
    /// `f64` values.
    Float64(Vec<f64>),
}

impl Values {
    /// Creates an empty list of the given kind.
    #[must_use]
    pub const fn empty(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Blob => Self::Blob(Vec::new()),
            ValueType::Boolean => Self::Boolean(Vec::new()),
            ValueType::String => Self::String(Vec::new()),
            ValueType::Int8 => Self::Int8(Vec::new()),
            ValueType::Int16 => Self::Int16(Vec::new()),
            ValueType::Int32 => Self::Int32(Vec::new()),
            ValueType::Int64 => Self::Int64(Vec::new()),
            ValueType::UInt8 => Self::UInt8(Vec::new()),
            ValueType::UInt16 => Self::UInt16(Vec::new()),
            ValueType::UInt32 => Self::UInt32(Vec::new()),
            ValueType::UInt64 => Self::UInt64(Vec::new()),
            ValueType::Float32 => Self::Float32(Vec::new()),
            ValueType::Float64 => Self::Float64(Vec::new()),
        }
    }

    /// Kind of the values.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Blob(_) => ValueType::Blob,
            Self::Boolean(_) => ValueType::Boolean,
            Self::String(_) => ValueType::String,
            Self::Int8(_) => ValueType::Int8,
            Self::Int16(_) => ValueType::Int16,
            Self::Int32(_) => ValueType::Int32,
            Self::Int64(_) => ValueType::Int64,
            Self::UInt8(_) => ValueType::UInt8,
            Self::UInt16(_) => ValueType::UInt16,
            Self::UInt32(_) => ValueType::UInt32,
            Self::UInt64(_) => ValueType::UInt64,
            Self::Float32(_) => ValueType::Float32,
            Self::Float64(_) => ValueType::Float64,
        }
    }

    /// Number of values, or of bytes for a blob.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Blob(v) | Self::UInt8(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
        }
    }

    /// Whether the list holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Rust element types that can be stored in a [`KeyedEntry`].
///
/// Implemented for `bool`, `String`, the fixed-width integers and the two
/// float widths. `u8` reads both `UINT8` and `BLOB` entries, since a blob is
/// untyped bytes.
pub trait EntryValue: Clone + sealed::Sealed + Sized {
    /// Kind stored for this element type.
    const VALUE_TYPE: ValueType;

    /// Borrows the values if the list holds this element type.
    fn slice(values: &Values) -> Option<&[Self]>;

    /// Mutably borrows the values if the list holds this element type.
    fn vec_mut(values: &mut Values) -> Option<&mut Vec<Self>>;

    /// Wraps owned values in the matching variant.
    fn wrap(values: Vec<Self>) -> Values;
}

macro_rules! impl_entry_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl EntryValue for $ty {
                const VALUE_TYPE: ValueType = ValueType::$variant;

                fn slice(values: &Values) -> Option<&[Self]> {
                    match values {
                        Values::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn vec_mut(values: &mut Values) -> Option<&mut Vec<Self>> {
                    match values {
                        Values::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn wrap(values: Vec<Self>) -> Values {
                    Values::$variant(values)
                }
            }
        )*
    };
}

impl_entry_value! {
    bool => Boolean,
    String => String,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

impl sealed::Sealed for u8 {}

impl EntryValue for u8 {
    const VALUE_TYPE: ValueType = ValueType::UInt8;

    fn slice(values: &Values) -> Option<&[Self]> {
        match values {
            Values::UInt8(v) | Values::Blob(v) => Some(v),
            _ => None,
        }
    }

    fn vec_mut(values: &mut Values) -> Option<&mut Vec<Self>> {
        match values {
            Values::UInt8(v) | Values::Blob(v) => Some(v),
            _ => None,
        }
    }

    fn wrap(values: Vec<Self>) -> Values {
        Values::UInt8(values)
    }
}

/// How a string entry was laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLayout {
    /// Header slot the entry refers to.
    pub choice: EncodingChoice,
    /// Encoding declared for that slot.
    pub encoding: StringEncoding,
    /// Slot size in characters, 0 for dynamic strings.
    pub max_size: u16,
}

/// One typed record of the container body.
///
/// Entries are built once by the decoder or accumulated by a caller before
/// being handed to [`crate::Writer::add_keyed_entry`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedEntry {
    /// Caller-assigned discriminator; not required to be unique.
    pub instance_id: u32,
    values: Values,
    string_layout: Option<StringLayout>,
}

impl KeyedEntry {
    /// Creates an entry with no values.
    #[must_use]
    pub const fn new(value_type: ValueType, instance_id: u32) -> Self {
        Self {
            instance_id,
            values: Values::empty(value_type),
            string_layout: None,
        }
    }

    /// Creates an entry holding `values`.
    #[must_use]
    pub fn from_values<T: EntryValue>(instance_id: u32, values: Vec<T>) -> Self {
        Self {
            instance_id,
            values: T::wrap(values),
            string_layout: None,
        }
    }

    /// Creates a blob entry.
    #[must_use]
    pub const fn blob(instance_id: u32, bytes: Vec<u8>) -> Self {
        Self {
            instance_id,
            values: Values::Blob(bytes),
            string_layout: None,
        }
    }

    pub(crate) const fn with_values(
        instance_id: u32,
        values: Values,
        string_layout: Option<StringLayout>,
    ) -> Self {
        Self {
            instance_id,
            values,
            string_layout,
        }
    }

    /// Kind of the stored values.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.values.value_type()
    }

    /// Number of values, or of bytes for a blob.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the entry holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrows the values as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::TypeMismatch`] if `T` does not match the entry kind.
    pub fn values<T: EntryValue>(&self) -> GbkfResult<&[T]> {
        T::slice(&self.values).ok_or(GbkfError::TypeMismatch {
            stored: self.value_type(),
            requested: T::VALUE_TYPE,
        })
    }

    /// Appends `values`.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::TypeMismatch`] if `T` does not match the entry kind.
    pub fn add_values<T: EntryValue>(&mut self, values: &[T]) -> GbkfResult<()> {
        let stored = self.value_type();
        let target = T::vec_mut(&mut self.values).ok_or(GbkfError::TypeMismatch {
            stored,
            requested: T::VALUE_TYPE,
        })?;
        target.extend_from_slice(values);
        Ok(())
    }

    /// Appends one value.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::TypeMismatch`] if `T` does not match the entry kind.
    pub fn add_value<T: EntryValue>(&mut self, value: T) -> GbkfResult<()> {
        self.add_values(std::slice::from_ref(&value))
    }

    /// The untyped value list.
    #[must_use]
    pub const fn raw_values(&self) -> &Values {
        &self.values
    }

    /// Consumes the entry, returning its value list.
    #[must_use]
    pub fn into_values(self) -> Values {
        self.values
    }

    /// Layout of a decoded string entry; `None` for other kinds and for
    /// string entries built in memory.
    #[must_use]
    pub const fn string_layout(&self) -> Option<StringLayout> {
        self.string_layout
    }
}
