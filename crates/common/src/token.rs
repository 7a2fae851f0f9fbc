/// Length in bytes of a share token before hex encoding (256 bits).
pub const SHARE_TOKEN_BYTES: usize = 32;
/// Length in bytes of a preview token before hex encoding (128 bits).
pub const PREVIEW_TOKEN_BYTES: usize = 16;

/// Fill `len` bytes from the OS CSPRNG and hex encode them.
pub fn generate(len: usize) -> Result<String, getrandom::Error> {
    let mut buff = vec![0u8; len];
    getrandom::getrandom(&mut buff)?;
    Ok(hex::encode(buff))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length_and_charset() {
        let token = generate(SHARE_TOKEN_BYTES).unwrap();
        assert_eq!(token.len(), SHARE_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_is_not_repeating() {
        let a = generate(PREVIEW_TOKEN_BYTES).unwrap();
        let b = generate(PREVIEW_TOKEN_BYTES).unwrap();
        assert_ne!(a, b);
    }
}
