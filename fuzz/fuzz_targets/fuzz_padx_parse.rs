#![no_main]

use libfuzzer_sys::fuzz_target;
use padnext::core::InvoiceBatch;
use padnext::schema::{self, SchemaId};

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are bugs.
    let _ = schema::validate(data, SchemaId::Payload);
    if let Ok(batch) = padnext::xml::deserialize::<InvoiceBatch>(data) {
        let _ = padnext::core::validate_batch(&batch);
        let _ = padnext::xml::serialize(&batch);
    }
});
