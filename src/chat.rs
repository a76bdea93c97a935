use crate::session::Message;
use crate::shelf::Shelf;

pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";
pub const EMPTY_SHELF_NOTICE: &str =
    "Please select some products first to generate a personalized routine.";

/// Conversation state machine: Idle or AwaitingResponse. At most one
/// request is in flight; attempts to start another while awaiting are
/// silently ignored. Failures never enter the transcript.
#[derive(Debug, Default)]
pub struct ChatController {
    transcript: Vec<Message>,
    awaiting_response: bool,
    notice: Option<String>,
    error_line: Option<String>,
}

impl ChatController {
    pub fn from_transcript(transcript: Vec<Message>) -> Self {
        Self {
            transcript,
            ..Self::default()
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting_response
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn error_line(&self) -> Option<&str> {
        self.error_line.as_deref()
    }

    /// Appends the trimmed input as a user turn and moves to
    /// AwaitingResponse. Returns `None` for empty input or while a
    /// request is already outstanding.
    pub fn try_begin_user_turn(&mut self, input: &str) -> Option<String> {
        if self.awaiting_response {
            return None;
        }
        let prompt = input.trim();
        if prompt.is_empty() {
            return None;
        }
        Some(self.begin(prompt.to_string()))
    }

    /// Like `try_begin_user_turn`, but the prompt is synthesized from the
    /// shelf. An empty shelf produces a local notice and no request.
    pub fn try_begin_routine_turn(&mut self, shelf: &Shelf) -> Option<String> {
        if self.awaiting_response {
            return None;
        }
        if shelf.is_empty() {
            self.notice = Some(EMPTY_SHELF_NOTICE.to_string());
            return None;
        }
        Some(self.begin(routine_prompt(shelf)))
    }

    fn begin(&mut self, prompt: String) -> String {
        self.notice = None;
        self.error_line = None;
        self.transcript.push(Message::user(prompt.clone()));
        self.awaiting_response = true;
        prompt
    }

    /// Appends the assistant reply and returns to Idle. Returns whether
    /// the reply was applied; a reply arriving with no outstanding
    /// request is dropped.
    pub fn complete_turn(&mut self, reply: String) -> bool {
        if !self.awaiting_response {
            return false;
        }
        self.transcript.push(Message::assistant(reply));
        self.awaiting_response = false;
        true
    }

    /// Returns to Idle without touching the transcript; the error line
    /// replaces the thinking placeholder.
    pub fn fail_turn(&mut self) {
        if !self.awaiting_response {
            return;
        }
        self.error_line = Some(ERROR_REPLY.to_string());
        self.awaiting_response = false;
    }
}

pub fn routine_prompt(shelf: &Shelf) -> String {
    format!(
        "I have selected these products: {}. Can you help me create a personalized \
         routine using these products? Please provide step-by-step instructions and \
         tips for best results.",
        shelf.routine_summary()
    )
}
