use xxhash_rust::xxh3::Xxh3;

use crate::{
    animation::spec::RevealSpec,
    foundation::error::{UnveilError, UnveilResult},
    observe::intersection::MarginValue,
    reveal::controller::RevealOptions,
};

const XXH3_SEED: u64 = 0x5eed_0b5e_77a1_e5f3;

/// Stable fingerprint of a registration's inputs.
///
/// Covers the selector, child selector, the serialized description, the
/// threshold, the root margin, and the once flag. [`crate::Reveal::reconcile`]
/// treats any key change as grounds for a full teardown-and-recreate; a
/// registration is never patched in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistrationKey(pub u64);

pub(crate) fn registration_key(
    selector: &str,
    spec: &RevealSpec,
    options: &RevealOptions,
) -> UnveilResult<RegistrationKey> {
    let mut h = Xxh3::with_seed(XXH3_SEED);

    h.update(selector.as_bytes());
    h.update(&[0xff]);
    if let Some(child) = &options.child_selector {
        h.update(child.as_bytes());
    }
    h.update(&[0xff]);

    let spec_bytes = serde_json::to_vec(spec)
        .map_err(|e| UnveilError::serde(format!("description is not serializable: {e}")))?;
    h.update(&spec_bytes);
    h.update(&[0xff]);

    h.update(&options.threshold.to_bits().to_le_bytes());
    for component in [
        options.root_margin.top,
        options.root_margin.right,
        options.root_margin.bottom,
        options.root_margin.left,
    ] {
        match component {
            MarginValue::Px(v) => {
                h.update(&[0]);
                h.update(&v.to_bits().to_le_bytes());
            }
            MarginValue::Percent(v) => {
                h.update(&[1]);
                h.update(&v.to_bits().to_le_bytes());
            }
        }
    }
    h.update(&[u8::from(options.once)]);

    Ok(RegistrationKey(h.digest()))
}
