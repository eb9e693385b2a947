//! Single-responsibility content scoring primitives.
//!
//! Currently just Shannon entropy, used by `harvx-redact` to validate
//! candidate secret matches against an `entropy_threshold`.

/// Shannon entropy of a byte slice, in bits per byte.
///
/// # Examples
///
/// ```
/// use harvx_content::entropy_bits_per_byte;
///
/// assert_eq!(entropy_bits_per_byte(b""), 0.0);
/// assert_eq!(entropy_bits_per_byte(b"aaaaaaaa"), 0.0);
/// assert!(entropy_bits_per_byte(b"ab") > 0.9);
/// ```
#[must_use]
pub fn entropy_bits_per_byte(bytes: &[u8]) -> f32 {
    if bytes.is_empty() {
        return 0.0;
    }
    let mut counts = [0u32; 256];
    for b in bytes {
        counts[*b as usize] += 1;
    }
    let len = bytes.len() as f32;
    let mut entropy = 0.0f32;
    for count in counts {
        if count == 0 {
            continue;
        }
        let p = count as f32 / len;
        entropy -= p * p.log2();
    }
    entropy
}
