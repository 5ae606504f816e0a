//! Grouping projector: derives chat-style display groups from the segment
//! sequence and the typing cursor.
//!
//! A group is a run of consecutive same-speaker segments shown as one
//! conversational turn. The projection is a pure recomputation over
//! `(segments, cursor, reveal buffers)` — deterministic given the same
//! inputs, with no state of its own.

use crate::speakers;
use crate::transcript::{TranscriptSegment, TranscriptState};
use serde::Serialize;

/// A run of consecutive same-speaker segment indices.
#[derive(Debug, Clone)]
pub struct DisplayGroup {
    pub id: String,
    pub speaker: String,
    pub members: Vec<usize>,
    pub combined_text: String,
    pub is_complete: bool,
    pub is_typing: bool,
}

/// A group resolved for rendering: labeled, colored, with the text that
/// should currently be on screen.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedGroup {
    pub id: String,
    pub speaker: String,
    pub speaker_label: String,
    pub is_teacher: bool,
    pub visible: bool,
    pub text: String,
    pub typing: bool,
}

/// Build the consecutive same-speaker runs.
pub fn build_groups(
    segments: &[TranscriptSegment],
    cursor: Option<usize>,
) -> Vec<DisplayGroup> {
    let mut groups: Vec<DisplayGroup> = Vec::new();

    for (index, segment) in segments.iter().enumerate() {
        match groups.last_mut() {
            Some(last) if last.speaker == segment.speaker => {
                last.members.push(index);
            }
            _ => {
                groups.push(DisplayGroup {
                    id: format!("{}-{}", segment.speaker, index),
                    speaker: segment.speaker.clone(),
                    members: vec![index],
                    combined_text: String::new(),
                    is_complete: false,
                    is_typing: false,
                });
            }
        }
    }

    for group in &mut groups {
        group.combined_text = join_texts(group.members.iter().map(|&i| segments[i].text.as_str()));
        group.is_complete = group.members.iter().all(|&i| segments[i].is_complete);
        group.is_typing = cursor.is_some_and(|c| group.members.contains(&c));
    }

    groups
}

/// A group becomes visible once any member is at or before the typing
/// cursor, or already complete.
pub fn is_visible(
    group: &DisplayGroup,
    segments: &[TranscriptSegment],
    cursor: Option<usize>,
) -> bool {
    group
        .members
        .iter()
        .any(|&i| cursor.is_some_and(|c| i <= c) || segments[i].is_complete)
}

/// The text currently on screen for a group.
///
/// Complete groups show their full combined text. The typing group shows
/// full text for members before the cursor and the reveal buffer for the
/// cursor member. Other groups show each reached-or-complete member's text
/// (full when complete, reveal buffer otherwise).
pub fn display_text(
    group: &DisplayGroup,
    segments: &[TranscriptSegment],
    cursor: Option<usize>,
    reveals: &[String],
) -> String {
    if group.is_complete {
        return group.combined_text.clone();
    }

    if let Some(c) = cursor.filter(|c| group.members.contains(c)) {
        let mut parts: Vec<&str> = Vec::new();
        for &index in &group.members {
            if index < c {
                parts.push(segments[index].text.as_str());
            } else if index == c {
                if let Some(revealed) = reveals.get(index) {
                    parts.push(revealed.as_str());
                }
                break;
            }
        }
        return join_texts(parts.into_iter());
    }

    let parts = group.members.iter().filter_map(|&index| {
        let reached = cursor.is_some_and(|c| index <= c);
        if !reached && !segments[index].is_complete {
            return None;
        }
        if segments[index].is_complete {
            Some(segments[index].text.as_str())
        } else {
            reveals.get(index).map(|s| s.as_str())
        }
    });
    join_texts(parts)
}

/// Typing indicator: shown while the group contains the cursor and its
/// on-screen text is still strictly shorter than the full combined text.
pub fn shows_cursor(group: &DisplayGroup, displayed: &str) -> bool {
    group.is_typing && displayed.chars().count() < group.combined_text.chars().count()
}

/// Full projection used by the render layer.
pub fn project(state: &TranscriptState, reveals: &[String]) -> Vec<RenderedGroup> {
    let cursor = state.current_typing_index;
    let language = state.language();
    let teacher = state.teacher_speaker.as_deref();
    let teacher_label = speakers::labels(language).teacher;

    build_groups(&state.segments, cursor)
        .into_iter()
        .map(|group| {
            let visible = is_visible(&group, &state.segments, cursor);
            let text = display_text(&group, &state.segments, cursor, reveals);
            let typing = shows_cursor(&group, &text);
            let speaker_label = speakers::speaker_label(&group.speaker, teacher, language);
            let is_teacher = speaker_label == teacher_label;
            RenderedGroup {
                id: group.id,
                speaker: group.speaker,
                speaker_label,
                is_teacher,
                visible,
                text,
                typing,
            }
        })
        .collect()
}

fn join_texts<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for part in parts {
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}
