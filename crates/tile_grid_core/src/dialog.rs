//! Modal text prompt
//!
//! The dialog is a plain state machine: it receives pointer presses and key
//! strokes from the session while it is open and reports when the user
//! submits or cancels. Layout is computed here so that hit testing and
//! drawing agree.

use crate::{Key, Point, Rect};
use tracing::debug;

const BOX_WIDTH: f32 = 500.0;
const BOX_HEIGHT: f32 = 300.0;
const FIELD_WIDTH: f32 = 140.0;
const FIELD_HEIGHT: f32 = 32.0;

/// Expected type of a prompt answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Text,
}

impl ValueKind {
    /// Parse a raw answer. Blank text and non-numeric integers fail.
    pub fn parse(&self, raw: &str) -> Option<Answer> {
        let trimmed = raw.trim();
        match self {
            ValueKind::Integer => trimmed.parse::<i64>().ok().map(Answer::Integer),
            ValueKind::Text if trimmed.is_empty() => None,
            ValueKind::Text => Some(Answer::Text(trimmed.to_string())),
        }
    }
}

/// A successfully parsed answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Integer(i64),
    Text(String),
}

impl Answer {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Answer::Integer(value) => Some(*value),
            Answer::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(value) => Some(value),
            Answer::Integer(_) => None,
        }
    }
}

/// Apply each parser to its raw answer.
///
/// Answers that fail to parse are left out rather than padded, so later
/// answers move up. Returns `None` when nothing parsed.
pub fn parse_answers<S: AsRef<str>>(raw: &[S], kinds: &[ValueKind]) -> Option<Vec<Answer>> {
    let answers: Vec<Answer> = raw
        .iter()
        .zip(kinds)
        .filter_map(|(raw, kind)| kind.parse(raw.as_ref()))
        .collect();
    if answers.is_empty() {
        None
    } else {
        Some(answers)
    }
}

/// One labelled text box
#[derive(Debug, Clone, PartialEq)]
pub struct PromptField {
    pub label: String,
    pub kind: ValueKind,
    pub answer: String,
    pub active: bool,
    pub rect: Rect,
}

impl PromptField {
    /// Where the label is drawn, above and left of the text box
    pub fn label_position(&self) -> Point {
        Point::new(self.rect.x - 50.0, self.rect.y - 34.0)
    }
}

/// Progress of a dialog after an input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogStatus {
    Pending,
    /// Return was pressed. Holds the parsed answers, or `None` if none parsed.
    Submitted(Option<Vec<Answer>>),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptDialog {
    frame: Rect,
    fields: Vec<PromptField>,
}

impl PromptDialog {
    /// Lay out a dialog centered on the canvas with one field per prompt.
    /// The first field starts active.
    pub fn new(canvas_width: f32, canvas_height: f32, prompts: &[(&str, ValueKind)]) -> Self {
        let frame = Rect::new(
            canvas_width / 2.0 - BOX_WIDTH / 2.0,
            canvas_height / 2.0 - BOX_HEIGHT / 2.0,
            BOX_WIDTH,
            BOX_HEIGHT,
        );
        let count = prompts.len() as f32;
        let fields = prompts
            .iter()
            .enumerate()
            .map(|(idx, (label, kind))| {
                let slot = (idx + 1) as f32 * BOX_HEIGHT / (count + 1.0);
                // Crowded dialogs spread fields a little further apart
                let y = if prompts.len() < 4 {
                    frame.y - 16.0 + slot
                } else {
                    frame.y - 32.0 + 1.2 * slot
                };
                PromptField {
                    label: label.to_string(),
                    kind: *kind,
                    answer: String::new(),
                    active: idx == 0,
                    rect: Rect::new(frame.x + BOX_WIDTH / 4.0, y, FIELD_WIDTH, FIELD_HEIGHT),
                }
            })
            .collect();
        Self { frame, fields }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn fields(&self) -> &[PromptField] {
        &self.fields
    }

    pub fn active_field(&self) -> Option<usize> {
        self.fields.iter().position(|field| field.active)
    }

    /// Activate the field under the pointer, deactivating all others
    pub fn pointer_down(&mut self, point: Point) {
        for field in self.fields.iter_mut() {
            field.active = field.rect.contains(point);
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        if let Some(field) = self.fields.iter_mut().find(|field| field.active) {
            field.answer.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.active) {
            field.answer.pop();
        }
    }

    /// Handle a key press
    pub fn key_down(&mut self, key: Key) -> DialogStatus {
        match key {
            Key::Return => {
                let answers = self.get_answers();
                debug!("Prompt submitted with {:?}", answers);
                DialogStatus::Submitted(answers)
            }
            Key::Escape => DialogStatus::Cancelled,
            Key::Backspace => {
                self.backspace();
                DialogStatus::Pending
            }
            Key::Char(ch) => {
                self.type_char(ch);
                DialogStatus::Pending
            }
            Key::Up | Key::Down | Key::Tab => DialogStatus::Pending,
        }
    }

    /// Parse each field with its expected kind, dropping failures
    pub fn get_answers(&self) -> Option<Vec<Answer>> {
        let raw: Vec<&str> = self.fields.iter().map(|f| f.answer.as_str()).collect();
        let kinds: Vec<ValueKind> = self.fields.iter().map(|f| f.kind).collect();
        parse_answers(raw.as_slice(), &kinds)
    }
}
