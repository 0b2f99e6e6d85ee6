//! Generates the foreign-language bindings for `zypcreds-core`.

fn main() {
    uniffi::uniffi_bindgen_main();
}
