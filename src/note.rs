//! Inbound media note builder
//!
//! Reconciles attachment paths, URLs, and type labels with prior
//! media-understanding results into a short annotation for prompt assembly.

use crate::context::MsgContext;

/// A resolved attachment entry after reconciling parallel fields
struct NoteEntry<'a> {
    path: &'a str,
    media_type: Option<&'a str>,
    url: Option<&'a str>,
}

/// Build the media annotation for an inbound message
///
/// Returns `None` when the message carries no attachment paths or when every
/// attachment was already described by the understanding subsystem. A single
/// surviving attachment yields one line; several yield a count header plus
/// one line per attachment, re-numbered in surviving order.
///
/// Pure and infallible: absent or mismatched fields degrade to "no note" or
/// to ignoring the field, never to an error.
#[must_use]
pub fn build_inbound_media_note(ctx: &MsgContext) -> Option<String> {
    let suppressed = ctx.suppressed_attachment_indices();
    let paths = effective_paths(ctx);

    let decisions: Vec<String> = ctx
        .media_understanding_decisions
        .iter()
        .flatten()
        .map(|d| format!("{}:{}", d.capability, d.outcome))
        .collect();
    tracing::debug!(
        media_path = ?ctx.media_path,
        paths = ?paths,
        suppressed = ?suppressed,
        understanding = ctx.media_understanding.as_ref().map_or(0, Vec::len),
        decisions = ?decisions,
        "building inbound media note"
    );

    if paths.is_empty() {
        tracing::debug!("no media paths on message, skipping note");
        return None;
    }

    // Parallel arrays count only when they line up exactly with the paths
    let urls = ctx
        .media_urls
        .as_deref()
        .filter(|urls| urls.len() == paths.len());
    let types = ctx
        .media_types
        .as_deref()
        .filter(|types| types.len() == paths.len());

    let entries: Vec<NoteEntry<'_>> = paths
        .iter()
        .enumerate()
        .filter(|(index, _)| !suppressed.contains(index))
        .map(|(index, path)| NoteEntry {
            path: path.as_str(),
            media_type: positional_or_shared(index, types, ctx.media_type.as_deref()),
            url: positional_or_shared(index, urls, ctx.media_url.as_deref()),
        })
        .collect();

    if entries.is_empty() {
        tracing::debug!("all attachments already described, skipping note");
        return None;
    }

    let note = if let [entry] = entries.as_slice() {
        format_attached_line(entry, None)
    } else {
        let total = entries.len();
        let mut lines = vec![format!("[media attached: {total} files]")];
        for (position, entry) in entries.iter().enumerate() {
            lines.push(format_attached_line(entry, Some((position + 1, total))));
        }
        lines.join("\n")
    };

    tracing::debug!(note = %note, "built inbound media note");
    Some(note)
}

/// Resolve the list of paths the note is built over
///
/// `MediaPaths` wins when non-empty; otherwise a non-blank `MediaPath` is
/// wrapped as a one-element list.
fn effective_paths(ctx: &MsgContext) -> Vec<String> {
    if let Some(paths) = &ctx.media_paths
        && !paths.is_empty()
    {
        return paths.clone();
    }

    ctx.media_path
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map_or_else(Vec::new, |path| vec![path.to_string()])
}

/// Pick the per-index value when the parallel array lined up, else the shared
/// single-valued fallback
fn positional_or_shared<'a>(
    index: usize,
    per_index: Option<&'a [String]>,
    shared: Option<&'a str>,
) -> Option<&'a str> {
    per_index
        .and_then(|values| values.get(index))
        .map(String::as_str)
        .or(shared)
}

/// Format one `[media attached ...]` line
///
/// The path is appended verbatim; type and URL are trimmed and omitted when
/// blank. `position` is `(index, total)` in the multi-entry case.
fn format_attached_line(entry: &NoteEntry<'_>, position: Option<(usize, usize)>) -> String {
    let mut line = match position {
        Some((index, total)) => format!("[media attached {index}/{total}: "),
        None => String::from("[media attached: "),
    };
    line.push_str(entry.path);

    if let Some(label) = entry.media_type.map(str::trim).filter(|t| !t.is_empty()) {
        line.push_str(" (");
        line.push_str(label);
        line.push(')');
    }
    if let Some(url) = entry.url.map(str::trim).filter(|u| !u.is_empty()) {
        line.push_str(" | ");
        line.push_str(url);
    }

    line.push(']');
    line
}
