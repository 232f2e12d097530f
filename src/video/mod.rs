//! Vormats video transcripts

pub mod client;
pub mod links;

pub use client::{SubtitleMeta, TranscriptSource, VideoClient, select_subtitles};
pub use links::extract_story_id;
