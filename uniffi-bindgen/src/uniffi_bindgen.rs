//! Generates Swift and Kotlin bindings for the `gbkf` library.
//!
//! ```sh
//! cargo run -p uniffi-bindgen -- generate --library target/release/libgbkf.so \
//!     --language kotlin --out-dir kotlin
//! ```

fn main() {
    uniffi::uniffi_bindgen_main();
}
