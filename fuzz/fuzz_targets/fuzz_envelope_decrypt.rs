#![no_main]

use std::sync::LazyLock;

use libfuzzer_sys::fuzz_target;
use padnext::envelope::RsaPrivateKey;
use rand::SeedableRng;
use rand::rngs::StdRng;

static KEY: LazyLock<RsaPrivateKey> = LazyLock::new(|| {
    let mut rng = StdRng::seed_from_u64(7);
    RsaPrivateKey::new(&mut rng, 1024).unwrap()
});

fuzz_target!(|data: &[u8]| {
    let _ = padnext::envelope::decrypt(data, &KEY);
});
