//! Speaker role resolution
//!
//! Maps raw diarization tags (e.g. "SPEAKER_01") to stable presentation
//! roles: the teacher (identified asynchronously by the final snapshot)
//! versus numbered students, with localized labels and stable colors.
//! Diarization, the upstream process that produces the tags, is not our
//! concern — we only clean up its output for display.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Languages the UI labels are localized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

/// Localized role labels for one language.
#[derive(Debug, Clone, Copy)]
pub struct SpeakerLabels {
    pub teacher: &'static str,
    pub student: &'static str,
}

const TEACHER_COLOR: &str = "#54a00d";
const NEUTRAL_COLOR: &str = "#757575";
const STUDENT_COLORS: [&str; 5] = ["#2196F3", "#df2ad0", "#1f2ce0", "#f5972b", "#1be025"];
const GENERIC_COLORS: [&str; 5] = ["#2196F3", "#FF9800", "#9C27B0", "#f5972b", "#00BCD4"];

pub fn labels(language: Language) -> SpeakerLabels {
    match language {
        Language::En => SpeakerLabels {
            teacher: "TEACHER",
            student: "STUDENT",
        },
        Language::Zh => SpeakerLabels {
            teacher: "老师",
            student: "学生",
        },
    }
}

/// Normalize a raw speaker tag: trimmed and uppercased. This is the stable
/// identity key used everywhere downstream.
pub fn normalize_speaker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn speaker_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^SPEAKER_(\d+)$").expect("valid speaker tag regex"))
}

fn speaker_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)SPEAKER_(\d+)").expect("valid speaker number regex"))
}

/// Whether a tag is clean diarization output (`SPEAKER_<n>`). The timeline
/// only trusts these; the chat view accepts everything.
pub fn is_diarized_speaker(speaker: &str) -> bool {
    speaker_tag_re().is_match(speaker)
}

/// Extract the numeric suffix from a speaker tag, if any.
pub fn speaker_number(speaker: &str) -> Option<usize> {
    speaker_number_re()
        .captures(speaker)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Resolve the display label for a speaker tag.
///
/// Until the teacher identity is known every tag is shown as-is (uppercased).
/// Once known, the teacher gets the localized teacher label and numbered
/// speakers become numbered students.
pub fn speaker_label(speaker: &str, teacher_speaker: Option<&str>, language: Language) -> String {
    let labels = labels(language);

    let Some(teacher) = teacher_speaker else {
        return speaker.to_uppercase();
    };

    if speaker == teacher {
        return labels.teacher.to_string();
    }
    if speaker.eq_ignore_ascii_case("student") {
        return labels.student.to_string();
    }
    if let Some(number) = speaker_number(speaker) {
        return format!("{}_{}", labels.student.to_uppercase(), number);
    }
    if speaker.eq_ignore_ascii_case("speaker") {
        return labels.student.to_uppercase();
    }

    speaker.to_string()
}

/// Resolve the display color for a speaker tag.
///
/// The teacher color is fixed. Students are colored from a dedicated palette
/// by their numeric suffix; unnumbered tags fall back to a generic palette or
/// a neutral gray.
pub fn speaker_color(speaker: &str, teacher_speaker: Option<&str>) -> &'static str {
    if teacher_speaker == Some(speaker) {
        return TEACHER_COLOR;
    }

    if teacher_speaker.is_some() {
        if let Some(number) = speaker_number(speaker) {
            return STUDENT_COLORS[number % STUDENT_COLORS.len()];
        }
    }

    match speaker_number(speaker) {
        Some(number) => GENERIC_COLORS[number % GENERIC_COLORS.len()],
        None => NEUTRAL_COLOR,
    }
}

/// Detect the majority script of the accumulated transcript text.
/// Any CJK ideograph flips the session to Chinese labels.
pub fn detect_language(text: &str) -> Language {
    if text.chars().any(is_cjk) {
        Language::Zh
    } else {
        Language::En
    }
}

pub(crate) fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Format seconds as `m:ss` for axis labels and tooltips.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn timeline_heading(language: Language) -> &'static str {
    match language {
        Language::En => "Speaking Timeline",
        Language::Zh => "发言时间轴",
    }
}

pub fn total_duration_label(language: Language) -> &'static str {
    match language {
        Language::En => "Total Duration",
        Language::Zh => "总时长",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_tags() {
        assert_eq!(normalize_speaker("  speaker_01 "), "SPEAKER_01");
        assert_eq!(normalize_speaker(""), "");
    }

    #[test]
    fn diarized_pattern_is_anchored() {
        assert!(is_diarized_speaker("SPEAKER_00"));
        assert!(is_diarized_speaker("speaker_12"));
        assert!(!is_diarized_speaker("SPEAKER_"));
        assert!(!is_diarized_speaker("XSPEAKER_00"));
        assert!(!is_diarized_speaker("SPEAKER_00X"));
        assert!(!is_diarized_speaker("STUDENT"));
    }

    #[test]
    fn labels_before_teacher_known() {
        assert_eq!(speaker_label("speaker_01", None, Language::En), "SPEAKER_01");
    }

    #[test]
    fn labels_after_teacher_known() {
        let teacher = Some("SPEAKER_00");
        assert_eq!(
            speaker_label("SPEAKER_00", teacher, Language::En),
            "TEACHER"
        );
        assert_eq!(
            speaker_label("SPEAKER_03", teacher, Language::En),
            "STUDENT_3"
        );
        assert_eq!(speaker_label("SPEAKER_00", teacher, Language::Zh), "老师");
        assert_eq!(speaker_label("SPEAKER_2", teacher, Language::Zh), "学生_2");
        assert_eq!(speaker_label("NARRATOR", teacher, Language::En), "NARRATOR");
    }

    #[test]
    fn teacher_color_is_fixed() {
        assert_eq!(speaker_color("SPEAKER_00", Some("SPEAKER_00")), "#54a00d");
    }

    #[test]
    fn student_colors_cycle_by_number() {
        let teacher = Some("SPEAKER_00");
        assert_eq!(speaker_color("SPEAKER_1", teacher), STUDENT_COLORS[1]);
        assert_eq!(speaker_color("SPEAKER_6", teacher), STUDENT_COLORS[1]);
        // No teacher known yet: generic palette.
        assert_eq!(speaker_color("SPEAKER_2", None), GENERIC_COLORS[2]);
        assert_eq!(speaker_color("NARRATOR", None), "#757575");
    }

    #[test]
    fn language_detection() {
        assert_eq!(detect_language("Hello class"), Language::En);
        assert_eq!(detect_language("大家好"), Language::Zh);
        assert_eq!(detect_language("mixed 你好"), Language::Zh);
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.4), "1:05");
        assert_eq!(format_time(600.0), "10:00");
    }
}
