use classroom_transcript::TranscriptEvent;

#[test]
fn test_chunk_event_deserialization() {
    let json = r#"{
        "type": "transcript_chunk",
        "segments": [
            {"speaker": "SPEAKER_00", "text": "Hello class", "start": 0.0, "end": 2.0}
        ],
        "start_time": 0.0,
        "end_time": 2.5
    }"#;

    let event: TranscriptEvent = serde_json::from_str(json).unwrap();
    match event {
        TranscriptEvent::TranscriptChunk(chunk) => {
            assert_eq!(chunk.segments.len(), 1);
            assert_eq!(chunk.segments[0].speaker.as_deref(), Some("SPEAKER_00"));
            assert_eq!(chunk.segments[0].text, "Hello class");
            assert_eq!(chunk.end_time, Some(2.5));
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn test_chunk_event_tolerates_missing_fields() {
    let json = r#"{"type": "transcript_chunk"}"#;

    let event: TranscriptEvent = serde_json::from_str(json).unwrap();
    match event {
        TranscriptEvent::TranscriptChunk(chunk) => {
            assert!(chunk.segments.is_empty());
            assert_eq!(chunk.start_time, None);
            assert_eq!(chunk.end_time, None);
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn test_token_event_deserialization() {
    let json = r#"{"type": "transcript", "token": "Hi "}"#;

    let event: TranscriptEvent = serde_json::from_str(json).unwrap();
    match event {
        TranscriptEvent::Transcript {
            token,
            speaker,
            start,
            end,
        } => {
            assert_eq!(token, "Hi ");
            assert_eq!(speaker, None);
            assert_eq!(start, None);
            assert_eq!(end, None);
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn test_final_event_deserialization() {
    let json = r#"{
        "type": "final",
        "teacher_speaker": "speaker_00",
        "speaker_text_stats": {"speaker_00": 12.5, "speaker_01": 3.0}
    }"#;

    let event: TranscriptEvent = serde_json::from_str(json).unwrap();
    match event {
        TranscriptEvent::Final(payload) => {
            assert_eq!(payload.teacher_speaker.as_deref(), Some("speaker_00"));
            let stats = payload.speaker_text_stats.unwrap();
            assert_eq!(stats.get("speaker_00"), Some(&12.5));
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn test_terminal_event_deserialization() {
    let done: TranscriptEvent = serde_json::from_str(r#"{"type": "done"}"#).unwrap();
    assert!(matches!(done, TranscriptEvent::Done));

    let error: TranscriptEvent =
        serde_json::from_str(r#"{"type": "error", "message": "boom"}"#).unwrap();
    match error {
        TranscriptEvent::Error { message } => assert_eq!(message, "boom"),
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn test_event_serialization_roundtrip_tag() {
    let json = serde_json::to_string(&TranscriptEvent::Done).unwrap();
    assert!(json.contains("\"type\":\"done\""));

    let event = TranscriptEvent::Transcript {
        token: "word".to_string(),
        speaker: Some("SPEAKER_01".to_string()),
        start: None,
        end: None,
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"transcript\""));
    assert!(json.contains("\"token\":\"word\""));
}
