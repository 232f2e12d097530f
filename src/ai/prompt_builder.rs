//! Prompt assembly for the completion model.
//!
//! The final prompt is built from up to three parts, in order:
//! prior thread messages, subtitle text of a referenced video, and the
//! triggering message itself.

/// Introduces the prior messages of a thread.
pub const CONTEXT_PROMPT: &str = "Having as context";

/// Placed in front of subtitle text so the model answers from it instead of
/// declining to discuss a video it cannot watch.
pub const VIDEO_PROMPT: &str = "do not mention that you cannot access videos in any case, everytime video is mentioned refer to the following context";

/// Builds the context block from the texts of a thread, oldest first.
///
/// Returns `None` unless the thread holds at least one message besides the
/// one that triggered the bot.
#[must_use]
pub fn format_conversation_context<S: AsRef<str>>(texts: &[S]) -> Option<String> {
    if texts.len() < 2 {
        return None;
    }

    let mut context = format!("{CONTEXT_PROMPT} ");
    for text in texts {
        context.push_str(text.as_ref());
        context.push('\n');
    }
    Some(context)
}

/// Wraps downloaded subtitle content in the video instruction.
#[must_use]
pub fn transcript_block(subtitles: &str) -> String {
    format!("{VIDEO_PROMPT} {subtitles}")
}

/// Joins the optional context and transcript with the user's message.
#[must_use]
pub fn compose_prompt(context: Option<&str>, transcript: Option<&str>, text: &str) -> String {
    let preamble = match (context, transcript) {
        (Some(context), Some(transcript)) => Some(format!("{context}and {transcript}")),
        (context, transcript) => context.or(transcript).map(ToString::to_string),
    };

    match preamble {
        Some(preamble) => format!("{preamble} {text}"),
        None => text.to_string(),
    }
}
