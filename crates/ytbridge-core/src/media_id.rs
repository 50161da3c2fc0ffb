//! Media id extraction from YouTube URLs
//!
//! Recognized shapes: `youtu.be/<id>`, `/v/<id>`, `/u/<c>/<id>`, `/embed/<id>`,
//! `watch?v=<id>` and `&v=<id>`. The id runs until the next `#`, `&` or `?`
//! and is accepted only when it is exactly 11 characters long. When several
//! markers appear, the last one on the first line decides.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{char, satisfy},
    combinator::recognize,
    IResult, Parser,
};

/// Length of a YouTube media id, in UTF-16 code units
pub const MEDIA_ID_LEN: usize = 11;

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// One of the path/query markers that precede a media id
fn marker(input: &str) -> IResult<&str, &str> {
    alt((
        recognize((tag("youtu"), satisfy(|c| !is_line_terminator(c)), tag("be/"))),
        tag("v/"),
        recognize((
            tag("u/"),
            satisfy(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            char('/'),
        )),
        tag("embed/"),
        tag("watch?v="),
        tag("&v="),
    ))
    .parse(input)
}

fn id_token(input: &str) -> IResult<&str, &str> {
    take_till(|c| matches!(c, '#' | '&' | '?')).parse(input)
}

/// Extract the 11-character media id from any string.
///
/// Total: malformed input yields `None`, never a panic.
pub fn extract_media_id(url: &str) -> Option<String> {
    let first_line = url
        .find(is_line_terminator)
        .map_or(url, |end| &url[..end]);

    let (rest, _) = first_line
        .char_indices()
        .rev()
        .find_map(|(pos, _)| marker(&url[pos..]).ok())?;

    let (_, token) = id_token(rest).ok()?;
    (token.encode_utf16().count() == MEDIA_ID_LEN).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_recognized_shapes() {
        let urls = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&foo=1",
            "https://youtu.be/dQw4w9WgXcQ",
            "http://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1",
            "https://www.youtube.com/v/dQw4w9WgXcQ?version=3",
            "https://www.youtube.com/user/someone#p/u/1/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=player_embedded&v=dQw4w9WgXcQ",
            "www.youtube.com/watch?v=dQw4w9WgXcQ#t=30s",
        ];
        for url in urls {
            assert_eq!(extract_media_id(url).as_deref(), Some(ID), "{}", url);
        }
    }

    #[test]
    fn test_rejects_unrecognized() {
        for url in [
            "",
            "not a url",
            "https://vimeo.com/123456789",
            "https://www.youtube.com/watch?v=short",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQQ",
            "https://www.youtube.com/embed/",
        ] {
            assert_eq!(extract_media_id(url), None, "{}", url);
        }
    }

    #[test]
    fn test_last_marker_wins() {
        assert_eq!(extract_media_id("https://youtu.be/dQw4w9WgXcQ?list=x&v=abc"), None);
        assert_eq!(
            extract_media_id("https://youtu.be/aaaaaaaaaaa?list=x&v=dQw4w9WgXcQ").as_deref(),
            Some(ID)
        );
    }

    #[test]
    fn test_markers_only_on_first_line() {
        assert_eq!(extract_media_id("https://example.com/\nwatch?v=dQw4w9WgXcQ"), None);
        assert_eq!(
            extract_media_id("https://youtu.be/dQw4w9WgXcQ\nrest").as_deref(),
            None,
            "token runs past the line break"
        );
    }

    #[test]
    fn test_non_ascii_input() {
        assert_eq!(extract_media_id("https://youtu.be/ñññññññññññ").as_deref(), Some("ñññññññññññ"));
        assert_eq!(extract_media_id("日本語のテキスト"), None);
    }

    #[test]
    fn test_idempotent() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&foo=1";
        assert_eq!(extract_media_id(url), extract_media_id(url));
    }
}
