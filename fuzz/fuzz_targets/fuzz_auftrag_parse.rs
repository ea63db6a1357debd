#![no_main]

use libfuzzer_sys::fuzz_target;
use padnext::core::OrderManifest;
use padnext::schema::{self, SchemaId};

fuzz_target!(|data: &[u8]| {
    let _ = schema::validate(data, SchemaId::Manifest);
    if let Ok(manifest) = padnext::xml::deserialize::<OrderManifest>(data) {
        let _ = padnext::core::validate_manifest(&manifest);
    }
});
