//! Exported container writer.

// Exported methods receive owned values from foreign callers
#![allow(clippy::needless_pass_by_value)]

use std::sync::{Mutex, MutexGuard, PoisonError};

use gbkf_core::Writer;

use crate::error::GbkfFfiResult;
use crate::types::{GbkfEncodingChoice, GbkfStringEncoding};

/// Builds a GBKF buffer entry by entry.
#[derive(Debug, uniffi::Object)]
pub struct GbkfWriter(Mutex<Writer>);

impl GbkfWriter {
    fn inner(&self) -> MutexGuard<'_, Writer> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[uniffi::export]
impl GbkfWriter {
    /// Creates a writer holding only a default header.
    #[uniffi::constructor]
    #[must_use]
    pub fn new() -> Self {
        Self(Mutex::new(Writer::new()))
    }

    /// Drops every buffered entry and restores the default header.
    pub fn reset(&self) {
        self.inner().reset();
    }

    /// Sets the format version.
    pub fn set_format_version(&self, version: u8) {
        self.inner().set_format_version(version);
    }

    /// Sets the application-level schema id.
    pub fn set_specification_id(&self, id: u32) {
        self.inner().set_specification_id(id);
    }

    /// Sets the schema revision.
    pub fn set_specification_version(&self, version: u16) {
        self.inner().set_specification_version(version);
    }

    /// Sets the encoding of the MAIN string slot.
    pub fn set_main_string_encoding(&self, encoding: GbkfStringEncoding) {
        self.inner().set_main_string_encoding(encoding.into());
    }

    /// Sets the encoding of the SECONDARY string slot.
    pub fn set_secondary_string_encoding(&self, encoding: GbkfStringEncoding) {
        self.inner().set_secondary_string_encoding(encoding.into());
    }

    /// Sets the byte length of every key.
    ///
    /// # Errors
    ///
    /// Returns an error for 0 or if a buffered key has another length.
    pub fn set_key_width(&self, width: u8) -> GbkfFfiResult<()> {
        Ok(self.inner().set_key_width(width)?)
    }

    /// Sets the header entry count by hand.
    pub fn set_entry_count(&self, count: u32) {
        self.inner().set_entry_count(count);
    }

    /// Sets the header entry count to the number of appended entries.
    pub fn set_entry_count_auto(&self) {
        self.inner().set_entry_count_auto();
    }

    /// Number of entries appended so far.
    pub fn entry_count(&self) -> u32 {
        self.inner().entry_count()
    }

    /// Distinct keys in order of first use.
    pub fn keys(&self) -> Vec<String> {
        self.inner().keys().to_vec()
    }

    /// Appends a blob.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad key or an oversized blob.
    pub fn add_keyed_values_blob(
        &self,
        key: String,
        instance_id: u32,
        bytes: Vec<u8>,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_blob(&key, instance_id, &bytes)?)
    }

    /// Appends booleans.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad key.
    pub fn add_keyed_values_boolean(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<bool>,
    ) -> GbkfFfiResult<()> {
        Ok(self
            .inner()
            .add_keyed_values_boolean(&key, instance_id, &values)?)
    }

    /// Appends ASCII strings; `max_size` 0 selects the dynamic layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot is not ASCII, a value cannot be encoded
    /// or does not fit, or the key is bad.
    pub fn add_keyed_values_string_ascii(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<String>,
        max_size: u16,
        choice: GbkfEncodingChoice,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_string_ascii(
            &key,
            instance_id,
            &values,
            max_size,
            choice.into(),
        )?)
    }

    /// Appends ISO 8859-1 strings; `max_size` 0 selects the dynamic layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot is not Latin-1, a value cannot be encoded
    /// or does not fit, or the key is bad.
    pub fn add_keyed_values_string_latin1(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<String>,
        max_size: u16,
        choice: GbkfEncodingChoice,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_string_latin1(
            &key,
            instance_id,
            &values,
            max_size,
            choice.into(),
        )?)
    }

    /// Appends UTF-8 strings; `max_size` 0 selects the dynamic layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot is not UTF-8, a value does not fit, or
    /// the key is bad.
    pub fn add_keyed_values_string_utf8(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<String>,
        max_size: u16,
        choice: GbkfEncodingChoice,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_string_utf8(
            &key,
            instance_id,
            &values,
            max_size,
            choice.into(),
        )?)
    }

    /// Appends `i8` values.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad key.
    pub fn add_keyed_values_int8(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<i8>,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_int8(&key, instance_id, &values)?)
    }

    /// Appends `i16` values.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad key.
    pub fn add_keyed_values_int16(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<i16>,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_int16(&key, instance_id, &values)?)
    }

    /// Appends `i32` values.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad key.
    pub fn add_keyed_values_int32(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<i32>,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_int32(&key, instance_id, &values)?)
    }

    /// Appends `i64` values.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad key.
    pub fn add_keyed_values_int64(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<i64>,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_int64(&key, instance_id, &values)?)
    }

    /// Appends `u8` values.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad key.
    pub fn add_keyed_values_uint8(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<u8>,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_uint8(&key, instance_id, &values)?)
    }

    /// Appends `u16` values.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad key.
    pub fn add_keyed_values_uint16(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<u16>,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_uint16(&key, instance_id, &values)?)
    }

    /// Appends `u32` values.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad key.
    pub fn add_keyed_values_uint32(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<u32>,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_uint32(&key, instance_id, &values)?)
    }

    /// Appends `u64` values.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad key.
    pub fn add_keyed_values_uint64(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<u64>,
    ) -> GbkfFfiResult<()> {
        Ok(self.inner().add_keyed_values_uint64(&key, instance_id, &values)?)
    }

    /// Appends `f32` values.
    ///
    /// # Errors
    ///
    /// Returns an error for infinite values or a bad key.
    pub fn add_keyed_values_float32(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<f32>,
    ) -> GbkfFfiResult<()> {
        Ok(self
            .inner()
            .add_keyed_values_float32(&key, instance_id, &values)?)
    }

    /// Appends `f64` values narrowed to `f32`.
    ///
    /// # Errors
    ///
    /// Returns an error for values beyond the `f32` range or a bad key.
    pub fn add_keyed_values_float32_narrowing(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<f64>,
    ) -> GbkfFfiResult<()> {
        Ok(self
            .inner()
            .add_keyed_values_float32_narrowing(&key, instance_id, &values)?)
    }

    /// Appends `f64` values.
    ///
    /// # Errors
    ///
    /// Returns an error for infinite values or a bad key.
    pub fn add_keyed_values_float64(
        &self,
        key: String,
        instance_id: u32,
        values: Vec<f64>,
    ) -> GbkfFfiResult<()> {
        Ok(self
            .inner()
            .add_keyed_values_float64(&key, instance_id, &values)?)
    }

    /// Returns the finished buffer, optionally with the SHA-256 footer.
    ///
    /// # Errors
    ///
    /// Returns an error if the output would exceed the addressable size.
    pub fn finalize(&self, auto_update_count: bool, add_footer: bool) -> GbkfFfiResult<Vec<u8>> {
        Ok(self.inner().finalize(auto_update_count, add_footer)?)
    }

    /// Finalizes and writes the buffer to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, path: String, auto_update_count: bool, add_footer: bool) -> GbkfFfiResult<()> {
        Ok(self.inner().write(&path, auto_update_count, add_footer)?)
    }
}

impl Default for GbkfWriter {
    fn default() -> Self {
        Self::new()
    }
}
