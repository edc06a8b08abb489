//! Content-addressed image key generation.

use sha2::{Digest, Sha256};

/// Extension appended to every image key; lookups must carry it too.
pub const IMAGE_EXT: &str = ".jpg";

/// Compute the content-addressed key for an image: the lowercase hex
/// SHA-256 digest of the full byte content, plus [`IMAGE_EXT`].
///
/// Identical content always yields the identical key, so repeated uploads
/// of the same bytes are storage no-ops. Defined for empty input as well.
pub fn image_key(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{}{IMAGE_EXT}", hex::encode(hasher.finalize()))
}

/// Whether `name` has the shape produced by [`image_key`]:
/// 64 lowercase hex digits followed by the fixed extension.
pub fn is_well_formed(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(IMAGE_EXT) else {
        return false;
    };
    stem.len() == 64 && stem.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        assert_eq!(image_key(b"same bytes"), image_key(b"same bytes"));
    }

    #[test]
    fn test_key_distinct_content() {
        assert_ne!(image_key(b"one"), image_key(b"two"));
    }

    #[test]
    fn test_key_format() {
        let key = image_key(b"anything");
        assert!(key.ends_with(IMAGE_EXT));
        let stem = key.strip_suffix(IMAGE_EXT).unwrap();
        assert_eq!(stem.len(), 64);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_defined_for_empty_input() {
        let key = image_key(b"");
        assert!(is_well_formed(&key));
    }

    #[test]
    fn test_well_formed_rejects_bad_shapes() {
        assert!(is_well_formed(&image_key(b"x")));
        assert!(!is_well_formed("default.jpg"));
        assert!(!is_well_formed("abc.jpg"));
        assert!(!is_well_formed(&image_key(b"x").to_uppercase()));
        assert!(!is_well_formed(image_key(b"x").strip_suffix(IMAGE_EXT).unwrap()));
    }
}
