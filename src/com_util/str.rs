/// Reads a NUL-terminated UTF-16 string. Unpaired surrogates are replaced.
///
/// # Safety
///
/// `s` must be null or point to a NUL-terminated sequence of `u16` values.
#[cfg_attr(not(windows), allow(dead_code))]
pub unsafe fn from_wide_ptr(s: *const u16) -> Option<String> {
    if s.is_null() {
        return None;
    }
    let len = (0..).take_while(|&i| *s.offset(i) != 0).count();
    let slice = std::slice::from_raw_parts(s, len);
    Some(String::from_utf16_lossy(slice))
}

/// Encodes a string as UTF-16 with a terminating NUL.
pub fn to_wide_nul<S: AsRef<str>>(s: S) -> Vec<u16> {
    s.as_ref().encode_utf16().chain(std::iter::once(0)).collect()
}
