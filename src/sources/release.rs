//! Release-group matching between a subtitle's claimed version and a video file name.
//!
//! Heuristic only: providers decorate release labels in many ways and only the
//! common distribution tags are stripped here.

/// Distribution-tag decorations removed from labels before matching (lowercase)
const NOISE_TOKENS: &[&str] = &["web-dl-", "web-dl.", "webrip.", "webrip-"];

fn normalize(text: &str) -> String {
    let mut cleaned = text.trim().to_lowercase();
    for token in NOISE_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    cleaned
}

/// True when the cleaned `label` appears inside the cleaned `video_name`
pub fn release_matches(label: &str, video_name: &str) -> bool {
    let label = normalize(label);
    if label.is_empty() {
        return false;
    }
    normalize(video_name).contains(&label)
}
