use classroom_transcript::{
    ChunkPayload, FinalPayload, Language, RawSegment, TranscriptEvent, TranscriptState,
};
use std::collections::HashMap;

fn raw(speaker: &str, text: &str, start: f64, end: f64) -> RawSegment {
    RawSegment {
        speaker: Some(speaker.to_string()),
        text: text.to_string(),
        start: Some(start),
        end: Some(end),
    }
}

#[test]
fn test_token_deltas_same_speaker_accumulate_into_one_segment() {
    let mut state = TranscriptState::new();

    state.apply_token("Hi ", Some("SPEAKER_01"), None, None);
    state.apply_token("there", Some("SPEAKER_01"), None, None);

    assert_eq!(state.segments.len(), 1);
    assert_eq!(state.segments[0].text, "Hi there");
    assert_eq!(state.segments[0].speaker, "SPEAKER_01");
    assert!(!state.segments[0].is_complete);
    assert_eq!(state.current_typing_index, Some(0));
}

#[test]
fn test_token_delta_without_speaker_continues_last_segment() {
    let mut state = TranscriptState::new();

    state.apply_token("The mitochondria ", Some("speaker_00"), None, None);
    state.apply_token("is the powerhouse", None, None, None);

    assert_eq!(state.segments.len(), 1);
    assert_eq!(state.segments[0].text, "The mitochondria is the powerhouse");
}

#[test]
fn test_first_token_delta_without_speaker_uses_default_tag() {
    let mut state = TranscriptState::new();

    state.apply_token("hello", None, None, None);

    assert_eq!(state.segments.len(), 1);
    assert_eq!(state.segments[0].speaker, "SPEAKER_00");
}

#[test]
fn test_interleaved_speakers_start_new_segment_per_switch() {
    let mut state = TranscriptState::new();

    state.apply_token("one ", Some("SPEAKER_00"), None, None);
    state.apply_token("two ", Some("SPEAKER_01"), None, None);
    state.apply_token("three", Some("SPEAKER_00"), None, None);

    assert_eq!(state.segments.len(), 3);
    assert_eq!(state.segments[0].speaker, "SPEAKER_00");
    assert_eq!(state.segments[1].speaker, "SPEAKER_01");
    assert_eq!(state.segments[2].speaker, "SPEAKER_00");
}

#[test]
fn test_token_delta_extends_end_time() {
    let mut state = TranscriptState::new();

    state.apply_token("a", Some("SPEAKER_00"), Some(0.0), Some(1.0));
    state.apply_token("b", Some("SPEAKER_00"), None, Some(2.5));

    assert_eq!(state.segments[0].end, Some(2.5));
    assert_eq!(state.segments[0].start, Some(0.0));
}

#[test]
fn test_token_delta_after_completion_starts_new_segment() {
    let mut state = TranscriptState::new();

    state.apply_token("first", Some("SPEAKER_00"), None, None);
    state.complete_segment_typing(0);
    state.apply_token("second", Some("SPEAKER_00"), None, None);

    assert_eq!(state.segments.len(), 2);
    assert_eq!(state.segments[1].text, "second");
}

#[test]
fn test_batched_segments_each_become_new_segments() {
    let mut state = TranscriptState::new();

    state.apply_chunk(ChunkPayload {
        segments: vec![
            raw("speaker_00", "Hello class", 0.0, 2.0),
            raw("speaker_00", "today we learn", 2.1, 4.0),
            raw("speaker_01", "yay", 4.2, 4.6),
        ],
        start_time: None,
        end_time: Some(5.0),
    });

    // Never merged, regardless of speaker.
    assert_eq!(state.segments.len(), 3);
    assert!(state.segments.iter().all(|s| !s.is_complete));
    assert_eq!(state.segments[0].speaker, "SPEAKER_00");
    assert_eq!(state.current_typing_index, Some(0));
    assert_eq!(state.total_duration, Some(5.0));
}

#[test]
fn test_chunk_offsets_inner_timestamps_by_start_time() {
    let mut state = TranscriptState::new();

    state.apply_chunk(ChunkPayload {
        segments: vec![raw("speaker_00", "later words", 1.0, 3.0)],
        start_time: Some(60.0),
        end_time: Some(63.5),
    });

    assert_eq!(state.segments[0].start, Some(61.0));
    assert_eq!(state.segments[0].end, Some(63.0));
    assert_eq!(state.total_duration, Some(63.5));
}

#[test]
fn test_chunk_missing_timestamps_default_to_zero() {
    let mut state = TranscriptState::new();

    state.apply_chunk(ChunkPayload {
        segments: vec![RawSegment {
            speaker: None,
            text: "untimed".to_string(),
            start: None,
            end: None,
        }],
        start_time: None,
        end_time: None,
    });

    assert_eq!(state.segments[0].start, Some(0.0));
    assert_eq!(state.segments[0].end, Some(0.0));
    assert_eq!(state.segments[0].speaker, "");
}

#[test]
fn test_later_chunk_does_not_reset_typing_cursor() {
    let mut state = TranscriptState::new();

    state.apply_chunk(ChunkPayload {
        segments: vec![raw("speaker_00", "one", 0.0, 1.0)],
        ..Default::default()
    });
    state.complete_segment_typing(0);
    assert_eq!(state.current_typing_index, None);

    state.apply_chunk(ChunkPayload {
        segments: vec![raw("speaker_00", "two", 1.0, 2.0)],
        ..Default::default()
    });
    // Only the first segment ever added arms the cursor.
    assert_eq!(state.current_typing_index, None);
}

#[test]
fn test_final_snapshot_closes_out_session() {
    let mut state = TranscriptState::new();

    state.apply_chunk(ChunkPayload {
        segments: vec![raw("speaker_00", "Hello class", 0.0, 2.0)],
        start_time: None,
        end_time: None,
    });

    state.apply_final(FinalPayload {
        teacher_speaker: Some("SPEAKER_00".to_string()),
        speaker_text_stats: None,
    });

    assert_eq!(state.segments.len(), 1);
    assert!(state.segments[0].is_complete);
    assert_eq!(state.teacher_speaker.as_deref(), Some("SPEAKER_00"));
    assert!(state.total_duration.unwrap_or(0.0) >= 2.0);
}

#[test]
fn test_final_snapshot_normalizes_and_replaces_stats() {
    let mut state = TranscriptState::new();

    let mut old = HashMap::new();
    old.insert("SPEAKER_05".to_string(), 99.0);
    state.update_speaker_stats(old);

    let mut stats = HashMap::new();
    stats.insert("speaker_00 ".to_string(), 12.5);
    stats.insert("speaker_01".to_string(), 3.0);

    state.apply_final(FinalPayload {
        teacher_speaker: None,
        speaker_text_stats: Some(stats),
    });

    // Wholesale replacement with normalized keys, not a merge.
    assert_eq!(state.speaker_stats.len(), 2);
    assert_eq!(state.speaker_stats.get("SPEAKER_00"), Some(&12.5));
    assert_eq!(state.speaker_stats.get("SPEAKER_05"), None);
}

#[test]
fn test_finish_is_idempotent() {
    let mut state = TranscriptState::new();

    state.apply_chunk(ChunkPayload {
        segments: vec![raw("speaker_00", "words", 0.0, 3.0)],
        ..Default::default()
    });

    state.finish();
    let once = format!("{:?}", state);
    state.finish();
    let twice = format!("{:?}", state);

    assert_eq!(once, twice);
    assert!(state.is_finished);
    assert_eq!(state.current_typing_index, None);
    assert!(state.segments[0].is_complete);
}

#[test]
fn test_finish_derives_fallback_duration_and_stats() {
    let mut state = TranscriptState::new();

    state.apply_chunk(ChunkPayload {
        segments: vec![
            raw("speaker_00", "alpha", 0.0, 2.0),
            raw("speaker_01", "beta", 2.0, 5.0),
            raw("speaker_00", "gamma", 5.0, 6.0),
        ],
        ..Default::default()
    });

    state.finish();

    assert_eq!(state.total_duration, Some(6.0));
    assert_eq!(state.speaker_stats.get("SPEAKER_00"), Some(&3.0));
    assert_eq!(state.speaker_stats.get("SPEAKER_01"), Some(&3.0));
}

#[test]
fn test_stats_precedence_is_arrival_order() {
    // No documented precedence between a final snapshot's stats and the
    // done fallback: whichever arrives last wins.
    let mut state = TranscriptState::new();

    state.apply_chunk(ChunkPayload {
        segments: vec![raw("speaker_00", "alpha", 0.0, 2.0)],
        ..Default::default()
    });

    let mut stats = HashMap::new();
    stats.insert("SPEAKER_00".to_string(), 42.0);
    state.apply_final(FinalPayload {
        teacher_speaker: None,
        speaker_text_stats: Some(stats),
    });
    assert_eq!(state.speaker_stats.get("SPEAKER_00"), Some(&42.0));

    state.finish();
    // Done arrived after final: the segment-derived fallback wins.
    assert_eq!(state.speaker_stats.get("SPEAKER_00"), Some(&2.0));
}

#[test]
fn test_error_finalizes_without_forcing_completion() {
    let mut state = TranscriptState::new();

    state.apply_token("partial thought", Some("SPEAKER_00"), None, None);

    let terminal = state.apply_event(TranscriptEvent::Error {
        message: "upstream fell over".to_string(),
    });

    assert!(terminal);
    assert!(state.is_finished);
    assert_eq!(state.current_typing_index, None);
    assert_eq!(state.segments.len(), 1);
    // Left untouched: not discarded, not forced complete.
    assert!(!state.segments[0].is_complete);
    assert_eq!(state.segments[0].text, "partial thought");
}

#[test]
fn test_duplicate_terminal_events_are_noops() {
    let mut state = TranscriptState::new();
    state.apply_token("words", Some("SPEAKER_00"), Some(0.0), Some(1.0));

    assert!(state.apply_event(TranscriptEvent::Done));
    let after_first = format!("{:?}", state);

    assert!(state.apply_event(TranscriptEvent::Done));
    assert!(state.apply_event(TranscriptEvent::Error {
        message: "late error".to_string(),
    }));

    assert_eq!(after_first, format!("{:?}", state));
}

#[test]
fn test_total_duration_never_decreases() {
    let mut state = TranscriptState::new();

    state.set_total_duration(10.0);
    state.set_total_duration(4.0);
    assert_eq!(state.total_duration, Some(10.0));

    state.apply_chunk(ChunkPayload {
        segments: vec![raw("speaker_00", "short", 0.0, 1.0)],
        start_time: None,
        end_time: Some(3.0),
    });
    assert_eq!(state.total_duration, Some(10.0));
}

#[test]
fn test_language_detection_flips_to_chinese() {
    let mut state = TranscriptState::new();

    state.apply_token("Hello ", Some("SPEAKER_00"), None, None);
    assert_eq!(state.detected_language, Some(Language::En));

    state.apply_token("同学们好", Some("SPEAKER_00"), None, None);
    assert_eq!(state.detected_language, Some(Language::Zh));
}

#[test]
fn test_reset_restores_every_field() {
    let mut state = TranscriptState::new();

    state.apply_chunk(ChunkPayload {
        segments: vec![raw("speaker_00", "words", 0.0, 2.0)],
        start_time: None,
        end_time: Some(2.0),
    });
    state.apply_final(FinalPayload {
        teacher_speaker: Some("SPEAKER_00".to_string()),
        speaker_text_stats: None,
    });
    state.finish();

    state.reset();

    assert!(state.segments.is_empty());
    assert_eq!(state.current_typing_index, None);
    assert!(!state.is_finished);
    assert_eq!(state.teacher_speaker, None);
    assert_eq!(state.total_duration, None);
    assert!(state.speaker_stats.is_empty());
    assert_eq!(state.detected_language, None);
}

#[test]
fn test_typing_cursor_advances_and_clears() {
    let mut state = TranscriptState::new();

    state.apply_chunk(ChunkPayload {
        segments: vec![
            raw("speaker_00", "one", 0.0, 1.0),
            raw("speaker_00", "two", 1.0, 2.0),
        ],
        ..Default::default()
    });

    assert_eq!(state.current_typing_index, Some(0));
    state.complete_segment_typing(0);
    assert_eq!(state.current_typing_index, Some(1));
    assert!(state.segments[0].is_complete);
    state.complete_segment_typing(1);
    assert_eq!(state.current_typing_index, None);

    // Out-of-range completion is ignored.
    state.complete_segment_typing(9);
    assert_eq!(state.current_typing_index, None);
}
