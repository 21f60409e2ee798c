// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for attack simulation.

/// Generate a pool of caller identifiers.
pub fn generate_identifiers(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let a = (i >> 16) & 0xFF;
            let b = (i >> 8) & 0xFF;
            let c = i & 0xFF;
            format!("10.{}.{}.{}", a, b, c)
        })
        .collect()
}

/// Generate valid video URLs in every supported shape.
pub fn generate_valid_urls() -> Vec<String> {
    let ids = ["dQw4w9WgXcQ", "9bZkp7q19f0", "kJQP7kiw5Fk", "a-b_c-d_e-f"];
    ids.iter()
        .flat_map(|id| {
            [
                format!("https://www.youtube.com/watch?v={id}"),
                format!("https://youtu.be/{id}"),
                format!("https://www.youtube.com/embed/{id}"),
                format!("https://m.youtube.com/watch?feature=share&v={id}"),
            ]
        })
        .collect()
}

/// Injection payloads that must never be accepted.
pub fn generate_injection_payloads() -> Vec<&'static str> {
    vec![
        "javascript:alert(1)",
        "JaVaScRiPt:alert(document.cookie)",
        " javascript:alert(1)",
        "data:text/html,<script>alert(1)</script>",
        "data:text/html;base64,PHNjcmlwdD5hbGVydCgxKTwvc2NyaXB0Pg==",
        "vbscript:msgbox(1)",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ<script>alert(1)</script>",
        "https://youtu.be/dQw4w9WgXcQ\" onerror=\"alert(1)",
        "https://youtu.be/dQw4w9WgXcQ' onload='alert(1)",
        "<iframe src=\"https://www.youtube.com/embed/dQw4w9WgXcQ\"></iframe>",
        "<object data=\"https://youtu.be/dQw4w9WgXcQ\">",
        "<embed src=\"https://youtu.be/dQw4w9WgXcQ\">",
        "<img src=x onerror=alert(1)>",
        "javajavascript:script:alert(1)",
    ]
}

/// Hosts that only look like allowed domains.
pub fn generate_lookalike_urls() -> Vec<&'static str> {
    vec![
        "https://evil.com/youtube.com",
        "https://evil.com/watch?v=dQw4w9WgXcQ&u=youtube.com",
        "https://youtube.com.evil.com/watch?v=dQw4w9WgXcQ",
        "https://notyoutube.com/watch?v=dQw4w9WgXcQ",
        "https://youtube.com@evil.com/watch?v=dQw4w9WgXcQ",
        "https://evil.com/youtu.be/dQw4w9WgXcQ",
        "https://youtu.be.evil.net/dQw4w9WgXcQ",
        "ftp://youtube.com/watch?v=dQw4w9WgXcQ",
        "file:///youtube.com/watch?v=dQw4w9WgXcQ",
    ]
}

/// Allowed domains carrying references that are not exactly 11 valid characters.
pub fn generate_malformed_reference_urls() -> Vec<&'static str> {
    vec![
        "https://youtube.com/watch?v=short",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQQ",
        "https://youtu.be/dQw4w9WgXc",
        "https://youtu.be/dQw4w9WgX.Q",
        "https://youtu.be/dQw4w9%20gXcQ",
        "https://www.youtube.com/embed/",
        "https://www.youtube.com/watch?v=",
        "https://www.youtube.com/",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_identifiers() {
        let ids = generate_identifiers(256);
        assert_eq!(ids.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_generate_valid_urls() {
        let urls = generate_valid_urls();
        assert_eq!(urls.len(), 16);
        assert!(urls.iter().all(|u| u.starts_with("https://")));
    }
}
