use std::fmt::Write as _;

use crate::domain::posts::PostsState;

/// Draw the whole state as text.
///
/// Loading and fetch errors replace the list; a failed mutation is reported
/// below whatever else is shown.
pub fn render(state: &PostsState) -> String {
    let mut out = String::new();

    if state.loading {
        out.push_str("Loading...\n");
    } else if let Some(error) = &state.error {
        let _ = writeln!(out, "{error}");
    } else if state.posts.is_empty() {
        out.push_str("No posts.\n");
    } else {
        for (index, post) in state.posts.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}] {}", post.id, post.title);
            for line in post.body.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
    }

    if let Some(failure) = &state.mutation_error {
        let _ = writeln!(out, "! {} ({})", failure.user_message(), failure.message);
    }

    out
}

pub fn render_json(state: &PostsState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(state)
}
