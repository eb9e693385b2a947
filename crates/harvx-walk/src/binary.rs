use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes of a file's head consulted for binary detection (spec.md §4.3).
pub const SNIFF_LEN: usize = 8 * 1024;

/// A NUL byte or invalid UTF-8 in the first [`SNIFF_LEN`] bytes marks a
/// file as binary. A read failure is treated as "not binary" here; the
/// subsequent load stage surfaces the real I/O error on the descriptor.
#[must_use]
pub fn looks_binary(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut buf = vec![0u8; SNIFF_LEN];
    let Ok(n) = file.read(&mut buf) else {
        return false;
    };
    let head = &buf[..n];
    if head.contains(&0u8) {
        return true;
    }
    std::str::from_utf8(head).is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn plain_text_is_not_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "hello world\n").unwrap();
        assert!(!looks_binary(&path));
    }

    #[test]
    fn nul_byte_is_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, [b'a', 0u8, b'b']).unwrap();
        assert!(looks_binary(&path));
    }

    #[test]
    fn invalid_utf8_is_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x01]).unwrap();
        assert!(looks_binary(&path));
    }

    #[test]
    fn missing_file_is_not_binary() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!looks_binary(&dir.path().join("missing")));
    }
}
