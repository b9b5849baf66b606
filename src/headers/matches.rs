macro_rules! byte_map {
    {
        $(#[$meta:meta])*
        $vis:vis const fn $fn_id:ident($byte:ident: u8) { $e:expr }
    } => {
        $(#[$meta])*
        $vis const fn $fn_id($byte: u8) -> bool {
            const PAT: [bool; 256] = {
                let mut bytes = [false; 256];
                let mut $byte = 0u8;
                const fn filter($byte: u8) -> bool {
                    $e
                }
                loop {
                    bytes[$byte as usize] = filter($byte);
                    if $byte == 255 {
                        break;
                    }
                    $byte += 1;
                }
                bytes
            };
            PAT[$byte as usize]
        }
    };
}

byte_map! {
    /// token   = 1*tchar
    /// tchar   = "!" / "#" / "$" / "%" / "&" / "'" / "*"
    ///         / "+" / "-" / "." / "^" / "_" / "`" / "|" / "~"
    ///         / DIGIT / ALPHA
    #[inline(always)]
    pub const fn is_token(byte: u8) {
        matches!(
            byte,
            | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*'
            | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
        )
        || byte.is_ascii_alphanumeric()
    }
}

/// Returns `true` if every byte is a [token character](is_token).
///
/// Empty input is not a token.
pub fn is_token_str(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|&b| is_token(b))
}

/// Returns the index of the first `\r\n` in `bytes`.
pub(crate) fn find_crlf(bytes: &[u8]) -> Option<usize> {
    let mut offset = 0;
    while let Some(cr) = bytes[offset..].iter().position(|&b| b == b'\r') {
        let at = offset + cr;
        match bytes.get(at + 1) {
            Some(b'\n') => return Some(at),
            Some(_) => offset = at + 1,
            None => return None,
        }
    }
    None
}
