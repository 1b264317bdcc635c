//! MIME type detection utilities

/// Guess MIME by inspecting bytes (magic numbers)
pub fn guess_mime_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|k| k.mime_type().to_string())
}

/// Guess MIME by file path or URL (extension-based)
pub fn guess_mime_from_path_or_url(path_or_url: &str) -> Option<String> {
    mime_guess::from_path(path_or_url)
        .first_raw()
        .map(|s| s.to_string())
}

/// Preferred file extension for a MIME type, without the leading dot.
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    mime_guess::get_mime_extensions_str(mime_type)
        .and_then(|exts| exts.iter().find(|e| **e == "mp4").or(exts.first()))
        .copied()
}

/// Combined guess for a downloaded video: bytes first, then the URL, then `video/mp4`.
pub fn guess_video_mime(bytes: &[u8], uri: &str) -> String {
    if let Some(m) = guess_mime_from_bytes(bytes) {
        return m;
    }
    if let Some(m) = guess_mime_from_path_or_url(uri.split('?').next().unwrap_or(uri))
        && m.starts_with("video/")
    {
        return m;
    }
    "video/mp4".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_magic_is_detected() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(guess_mime_from_bytes(&png).as_deref(), Some("image/png"));
    }

    #[test]
    fn unknown_video_bytes_fall_back_to_mp4() {
        assert_eq!(
            guess_video_mime(b"not a video", "https://host/files/abc:download?alt=media"),
            "video/mp4"
        );
    }

    #[test]
    fn mp4_extension_is_preferred() {
        assert_eq!(extension_for_mime("video/mp4"), Some("mp4"));
    }
}
