//! Timeline projector: merged, filtered speaking intervals per active
//! speaker, for a time-axis visualization.
//!
//! This view favors clean diarization output over completeness: only
//! `SPEAKER_<n>` tags with non-trivial text are considered, nearby
//! same-speaker intervals are merged to absorb diarization jitter, and
//! speakers with under a second of merged speech are suppressed as noise.

use crate::speakers::{self, Language};
use crate::transcript::TranscriptSegment;
use serde::Serialize;

/// Gap (seconds) under which consecutive same-speaker intervals merge.
const MERGE_GAP_SECS: f64 = 0.8;

/// Minimum merged duration (seconds) for a speaker to appear at all.
const MIN_ACTIVE_SECS: f64 = 1.0;

/// One merged speaking interval.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakingInterval {
    pub speaker: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineInterval {
    pub start_pct: f64,
    pub width_pct: f64,
    pub tooltip: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineRow {
    pub speaker: String,
    pub label: String,
    pub color: String,
    pub intervals: Vec<TimelineInterval>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineView {
    pub heading: String,
    pub duration_label: String,
    pub total_duration: f64,
    pub formatted_duration: String,
    pub rows: Vec<TimelineRow>,
}

/// Filter to trustworthy segments and merge diarization jitter.
///
/// Keeps segments whose trimmed text is longer than two characters and not
/// purely punctuation/whitespace, attributed to a strict `SPEAKER_<n>` tag.
/// Consecutive same-speaker intervals with a gap of at most 0.8 s merge
/// into one, extending the end time and concatenating text.
pub fn speaking_intervals(segments: &[TranscriptSegment]) -> Vec<SpeakingInterval> {
    let mut merged: Vec<SpeakingInterval> = Vec::new();

    for segment in segments {
        if !has_substance(&segment.text) || !speakers::is_diarized_speaker(&segment.speaker) {
            continue;
        }
        let start = segment.start.unwrap_or(0.0);
        let end = segment.end.unwrap_or(0.0);

        match merged.last_mut() {
            Some(last)
                if last.speaker == segment.speaker && start - last.end <= MERGE_GAP_SECS =>
            {
                last.end = end;
                last.text.push(' ');
                last.text.push_str(&segment.text);
            }
            _ => merged.push(SpeakingInterval {
                speaker: segment.speaker.clone(),
                start,
                end,
                text: segment.text.clone(),
            }),
        }
    }

    merged
}

/// Speakers with at least one second of merged speech, in first-seen order.
pub fn active_speakers(intervals: &[SpeakingInterval]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut durations: Vec<f64> = Vec::new();

    for interval in intervals {
        match order.iter().position(|s| s == &interval.speaker) {
            Some(i) => durations[i] += interval.end - interval.start,
            None => {
                order.push(interval.speaker.clone());
                durations.push(interval.end - interval.start);
            }
        }
    }

    order
        .into_iter()
        .zip(durations)
        .filter(|(_, d)| *d >= MIN_ACTIVE_SECS)
        .map(|(s, _)| s)
        .collect()
}

/// Project the timeline, or nothing when there is nothing worth drawing
/// (no active speakers, or a non-positive axis duration).
pub fn project(
    segments: &[TranscriptSegment],
    teacher_speaker: Option<&str>,
    total_duration: Option<f64>,
    language: Language,
) -> Option<TimelineView> {
    let intervals = speaking_intervals(segments);
    let active = active_speakers(&intervals);

    let max_duration = match total_duration.filter(|d| *d > 0.0) {
        Some(d) => d,
        None => intervals.iter().map(|i| i.end).fold(0.0, f64::max),
    };

    if active.is_empty() || max_duration <= 0.0 {
        return None;
    }

    let rows = active
        .into_iter()
        .map(|speaker| {
            let label = speakers::speaker_label(&speaker, teacher_speaker, language);
            let color = speakers::speaker_color(&speaker, teacher_speaker).to_string();
            let intervals = intervals
                .iter()
                .filter(|i| i.speaker == speaker)
                .filter_map(|i| {
                    let start_pct = i.start / max_duration * 100.0;
                    let width_pct = (i.end - i.start) / max_duration * 100.0;
                    if width_pct <= 0.0 {
                        return None;
                    }
                    Some(TimelineInterval {
                        start_pct,
                        width_pct,
                        tooltip: tooltip(&label, i),
                    })
                })
                .collect();
            TimelineRow {
                speaker,
                label,
                color,
                intervals,
            }
        })
        .collect();

    Some(TimelineView {
        heading: speakers::timeline_heading(language).to_string(),
        duration_label: speakers::total_duration_label(language).to_string(),
        total_duration: max_duration,
        formatted_duration: speakers::format_time(max_duration),
        rows,
    })
}

fn tooltip(label: &str, interval: &SpeakingInterval) -> String {
    let preview: String = interval.text.chars().take(100).collect();
    format!(
        "{}: {} - {}\n{}...",
        label,
        speakers::format_time(interval.start),
        speakers::format_time(interval.end),
        preview
    )
}

fn has_substance(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.chars().count() > 2
        && !trimmed
            .chars()
            .all(|c| c.is_whitespace() || matches!(c, '.' | ',' | '!' | '?'))
}
