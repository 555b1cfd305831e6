use std::sync::LazyLock;

use regex::Regex;

/// Label used when a URL carries no recognizable track id.
pub const FALLBACK_TITLE: &str = "Untitled track";

const TRACK_ID_PREFIX_LEN: usize = 8;

static TRACK_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"track/([a-zA-Z0-9]+)").expect("track pattern compiles"));

/// Best-effort display title for a media URL: `Track <first 8 chars of id>`
/// when a `track/<id>` segment is present, [`FALLBACK_TITLE`] otherwise.
pub fn derive_title(source_url: &str) -> String {
    match TRACK_SEGMENT
        .captures(source_url)
        .and_then(|caps| caps.get(1))
    {
        Some(id) => {
            let short: String = id.as_str().chars().take(TRACK_ID_PREFIX_LEN).collect();
            format!("Track {short}")
        }
        None => FALLBACK_TITLE.to_string(),
    }
}
