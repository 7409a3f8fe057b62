//! Editor session: one cooperative state machine for the whole editor
//!
//! The session is either `Editing` or `Prompting`. While a prompt is open it
//! receives every input event and the grid, scroll and paint state are
//! frozen. Work that needs the outside world (writing files, picking a file
//! to load, exiting) is returned to the caller as a `SessionEffect`.

use crate::{
    Answer, DialogStatus, GridError, GridGeometry, GridModel, InputEvent, Key, PaintController,
    PaintOutcome, PlacementEditor, Point, PromptDialog, ScrollCommit, ScrollController,
    ScrollDirection, TypePalette, ValueKind,
};
use tracing::{debug, info, warn};

/// Canvas and startup settings
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Used when the startup prompt yields no valid divisor
    pub default_divisions: u32,
    pub palette: TypePalette,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1500,
            canvas_height: 1000,
            default_divisions: 20,
            palette: TypePalette::default(),
        }
    }
}

/// Active editing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Stamp palette types onto the scrolling grid
    #[default]
    Paint,
    /// Drag free tiles out of the template
    Place,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Paint => "Paint",
            Tool::Place => "Place",
        }
    }
}

/// Why a prompt is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    GridDivisions,
    SaveFile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Editing,
    Prompting {
        purpose: PromptPurpose,
        dialog: PromptDialog,
    },
}

/// Work requested from the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    None,
    Quit,
    /// Write the grid to `<file_name>.txt`
    Save { file_name: String },
    /// Pick a grid file and pass its rows to `EditorSession::load_rows`
    Load,
}

/// Everything that exists once the grid size is known
#[derive(Debug, Clone)]
pub struct Document {
    grid: GridModel,
    scroll: ScrollController,
    paint: PaintController,
    placement: PlacementEditor,
}

impl Document {
    fn new(grid: GridModel) -> Self {
        let geometry = *grid.geometry();
        Self {
            grid,
            scroll: ScrollController::new(&geometry),
            paint: PaintController::new(),
            placement: PlacementEditor::new(&geometry),
        }
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    pub fn paint(&self) -> &PaintController {
        &self.paint
    }

    pub fn placement(&self) -> &PlacementEditor {
        &self.placement
    }

    pub fn geometry(&self) -> &GridGeometry {
        self.grid.geometry()
    }

    pub fn vertical_offset(&self) -> f32 {
        self.scroll.vertical_offset()
    }
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    config: SessionConfig,
    mode: Mode,
    tool: Tool,
    document: Option<Document>,
    /// Bumped on every visible change
    revision: u64,
}

impl EditorSession {
    /// Start a session. The first thing the user sees is the grid size prompt.
    pub fn new(config: SessionConfig) -> Self {
        let label = format!("Grid size (divisible by {})", config.canvas_width);
        let dialog = PromptDialog::new(
            config.canvas_width as f32,
            config.canvas_height as f32,
            &[(label.as_str(), ValueKind::Integer)],
        );
        Self {
            config,
            mode: Mode::Prompting {
                purpose: PromptPurpose::GridDivisions,
                dialog,
            },
            tool: Tool::Paint,
            document: None,
            revision: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn palette(&self) -> &TypePalette {
        &self.config.palette
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_prompting(&self) -> bool {
        matches!(self.mode, Mode::Prompting { .. })
    }

    /// The open dialog, if any
    pub fn prompt(&self) -> Option<&PromptDialog> {
        match &self.mode {
            Mode::Prompting { dialog, .. } => Some(dialog),
            Mode::Editing => None,
        }
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Route one input event
    pub fn handle_event(&mut self, event: InputEvent) -> SessionEffect {
        if event == InputEvent::Quit {
            info!("Quit requested");
            return SessionEffect::Quit;
        }
        match self.mode {
            Mode::Prompting { .. } => self.handle_prompt_event(event),
            Mode::Editing => self.handle_editing_event(event),
        }
    }

    /// Fixed-rate update. Scrolling is frozen while a prompt is open.
    pub fn tick(&mut self) -> Option<ScrollCommit> {
        if self.is_prompting() {
            return None;
        }
        let document = self.document.as_mut()?;
        let commit = document.scroll.tick()?;
        let appended = document.grid.ensure_rows(commit.rows_required);
        if appended > 0 {
            debug!(
                "Appended {} row(s), grid now has {} rows",
                appended,
                document.grid.row_count()
            );
        }
        self.touch();
        Some(commit)
    }

    /// Replace the grid with loaded rows and return to the top of it
    pub fn load_rows(&mut self, rows: Vec<Vec<u8>>) -> Result<(), GridError> {
        let geometry = match &self.document {
            Some(document) => *document.geometry(),
            None => GridGeometry::new(
                self.config.canvas_width,
                self.config.canvas_height,
                self.config.default_divisions,
            )?,
        };
        let grid = GridModel::from_rows(geometry, rows)?;
        info!(
            "Loaded grid with {} rows of {} columns",
            grid.row_count(),
            grid.column_count()
        );
        match self.document.as_mut() {
            Some(document) => {
                document.grid = grid;
                let row_count = document.grid.row_count();
                document.scroll.reset(geometry.divisions(), row_count);
                document.paint.reset_stroke_history();
            }
            None => {
                self.document = Some(Document::new(grid));
                self.mode = Mode::Editing;
            }
        }
        self.touch();
        Ok(())
    }

    fn handle_prompt_event(&mut self, event: InputEvent) -> SessionEffect {
        let Mode::Prompting { purpose, dialog } = &mut self.mode else {
            return SessionEffect::None;
        };
        let purpose = *purpose;
        let status = match event {
            InputEvent::PointerDown(point) => {
                dialog.pointer_down(point);
                DialogStatus::Pending
            }
            InputEvent::KeyDown(key) => dialog.key_down(key),
            _ => return SessionEffect::None,
        };
        self.touch();
        match status {
            DialogStatus::Pending => SessionEffect::None,
            DialogStatus::Submitted(answers) => self.finish_prompt(purpose, answers),
            DialogStatus::Cancelled => self.finish_prompt(purpose, None),
        }
    }

    fn finish_prompt(
        &mut self,
        purpose: PromptPurpose,
        answers: Option<Vec<Answer>>,
    ) -> SessionEffect {
        self.mode = Mode::Editing;
        let first = answers.and_then(|answers| answers.into_iter().next());
        match purpose {
            PromptPurpose::GridDivisions => {
                let requested = first.as_ref().and_then(Answer::as_integer);
                self.start_editing(requested);
                SessionEffect::None
            }
            PromptPurpose::SaveFile => match first.as_ref().and_then(Answer::as_text) {
                Some(file_name) => SessionEffect::Save {
                    file_name: file_name.to_string(),
                },
                None => {
                    debug!("Save cancelled");
                    SessionEffect::None
                }
            },
        }
    }

    fn start_editing(&mut self, requested: Option<i64>) {
        let (width, height) = (self.config.canvas_width, self.config.canvas_height);
        let fallback = self.config.default_divisions;
        let requested = match requested.map(u32::try_from) {
            Some(Ok(divisions)) => match GridGeometry::new(width, height, divisions) {
                Ok(geometry) => Some(geometry),
                Err(e) => {
                    warn!("{}; using {} divisions", e, fallback);
                    None
                }
            },
            Some(Err(_)) => {
                warn!("Negative grid size; using {} divisions", fallback);
                None
            }
            None => None,
        };
        let geometry = match requested {
            Some(geometry) => Ok(geometry),
            None => GridGeometry::new(width, height, fallback),
        };

        match geometry {
            Ok(geometry) => {
                info!(
                    "Created {}x{} grid with {}px cells",
                    geometry.columns(),
                    geometry.divisions(),
                    geometry.cell_size()
                );
                self.document = Some(Document::new(GridModel::new(geometry)));
            }
            Err(e) => warn!("Cannot create grid: {}", e),
        }
    }

    fn open_prompt(&mut self, purpose: PromptPurpose, prompts: &[(&str, ValueKind)]) {
        if let Some(document) = self.document.as_mut() {
            document.scroll.halt();
            document.paint.pointer_up();
        }
        self.mode = Mode::Prompting {
            purpose,
            dialog: PromptDialog::new(
                self.config.canvas_width as f32,
                self.config.canvas_height as f32,
                prompts,
            ),
        };
    }

    fn handle_editing_event(&mut self, event: InputEvent) -> SessionEffect {
        let tool = self.tool;
        let Some(document) = self.document.as_mut() else {
            return SessionEffect::None;
        };
        let changed = match event {
            InputEvent::KeyDown(Key::Down) if tool == Tool::Paint => {
                document.scroll.press(ScrollDirection::Down);
                false
            }
            InputEvent::KeyDown(Key::Up) if tool == Tool::Paint => {
                document.scroll.press(ScrollDirection::Up);
                false
            }
            InputEvent::KeyUp(Key::Down) => {
                document.scroll.release(ScrollDirection::Down);
                false
            }
            InputEvent::KeyUp(Key::Up) => {
                document.scroll.release(ScrollDirection::Up);
                false
            }
            InputEvent::KeyDown(Key::Char('r' | 'R')) if tool == Tool::Paint => {
                document.paint.erase_all(&mut document.grid);
                info!("Erased all tiles");
                true
            }
            InputEvent::KeyDown(Key::Char('o' | 'O')) => return SessionEffect::Load,
            InputEvent::KeyDown(Key::Tab) => {
                // The place tool does not scroll
                document.scroll.halt();
                document.paint.pointer_up();
                document.placement.pointer_up();
                self.tool = match tool {
                    Tool::Paint => Tool::Place,
                    Tool::Place => Tool::Paint,
                };
                debug!("Switched to {} tool", self.tool.label());
                true
            }
            InputEvent::KeyDown(Key::Return) => {
                self.open_prompt(PromptPurpose::SaveFile, &[("File name", ValueKind::Text)]);
                true
            }
            InputEvent::PointerDown(point) => {
                Self::pointer_down(document, &self.config.palette, tool, point)
            }
            InputEvent::PointerMove(point) => match tool {
                Tool::Paint => {
                    let offset = document.scroll.vertical_offset();
                    document.paint.pointer_move(point, &mut document.grid, offset)
                        != PaintOutcome::Ignored
                }
                Tool::Place => document.placement.pointer_move(point),
            },
            InputEvent::PointerUp => {
                document.paint.pointer_up();
                let outcome = document.placement.pointer_up();
                debug!("Pointer released: {:?}", outcome);
                tool == Tool::Place
            }
            _ => false,
        };
        if changed {
            self.touch();
        }
        SessionEffect::None
    }

    fn pointer_down(
        document: &mut Document,
        palette: &TypePalette,
        tool: Tool,
        point: Point,
    ) -> bool {
        match tool {
            Tool::Paint => {
                let offset = document.scroll.vertical_offset();
                document
                    .paint
                    .pointer_down(point, &mut document.grid, palette, offset)
                    != PaintOutcome::Ignored
            }
            Tool::Place => document.placement.pointer_down(point).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlacementState;

    fn config() -> SessionConfig {
        SessionConfig {
            canvas_width: 1000,
            canvas_height: 1000,
            default_divisions: 20,
            palette: TypePalette::default(),
        }
    }

    fn type_text(session: &mut EditorSession, text: &str) {
        for ch in text.chars() {
            session.handle_event(InputEvent::KeyDown(Key::Char(ch)));
        }
    }

    fn editing_session(divisions: &str) -> EditorSession {
        let mut session = EditorSession::new(config());
        type_text(&mut session, divisions);
        session.handle_event(InputEvent::KeyDown(Key::Return));
        session
    }

    #[test]
    fn test_starts_with_grid_size_prompt() {
        let session = EditorSession::new(config());
        assert!(session.is_prompting());
        assert!(session.document().is_none());
        let field = &session.prompt().unwrap().fields()[0];
        assert_eq!(field.label, "Grid size (divisible by 1000)");
    }

    #[test]
    fn test_grid_size_answer_creates_grid() {
        let session = editing_session("10");
        assert_eq!(session.mode(), &Mode::Editing);
        let document = session.document().unwrap();
        assert_eq!(document.geometry().cell_size(), 100.0);
        assert_eq!(document.grid().row_count(), 10);
        assert_eq!(document.scroll().last_visible_row(), 9);
    }

    #[test]
    fn test_invalid_grid_size_uses_default() {
        for answer in ["abc", "0", "-4", "5000", ""] {
            let session = editing_session(answer);
            let document = session.document().unwrap();
            assert_eq!(document.geometry().divisions(), 20, "answer {answer:?}");
        }
    }

    #[test]
    fn test_cancelled_grid_size_uses_default() {
        let mut session = EditorSession::new(config());
        session.handle_event(InputEvent::KeyDown(Key::Escape));
        assert!(!session.is_prompting());
        assert_eq!(session.document().unwrap().geometry().divisions(), 20);
    }

    #[test]
    fn test_quit_from_any_mode() {
        let mut session = EditorSession::new(config());
        assert_eq!(session.handle_event(InputEvent::Quit), SessionEffect::Quit);
        let mut session = editing_session("10");
        assert_eq!(session.handle_event(InputEvent::Quit), SessionEffect::Quit);
    }

    #[test]
    fn test_save_prompt_returns_file_name() {
        let mut session = editing_session("10");
        session.handle_event(InputEvent::KeyDown(Key::Return));
        assert!(matches!(
            session.mode(),
            Mode::Prompting {
                purpose: PromptPurpose::SaveFile,
                ..
            }
        ));
        type_text(&mut session, "level1");
        let effect = session.handle_event(InputEvent::KeyDown(Key::Return));
        assert_eq!(
            effect,
            SessionEffect::Save {
                file_name: "level1".to_string()
            }
        );
        assert_eq!(session.mode(), &Mode::Editing);
    }

    #[test]
    fn test_empty_or_cancelled_save_does_nothing() {
        let mut session = editing_session("10");
        session.handle_event(InputEvent::KeyDown(Key::Return));
        assert_eq!(
            session.handle_event(InputEvent::KeyDown(Key::Return)),
            SessionEffect::None
        );
        session.handle_event(InputEvent::KeyDown(Key::Return));
        type_text(&mut session, "abc");
        assert_eq!(
            session.handle_event(InputEvent::KeyDown(Key::Escape)),
            SessionEffect::None
        );
        assert!(!session.is_prompting());
    }

    #[test]
    fn test_state_frozen_while_prompting() {
        let mut session = editing_session("10");
        session.handle_event(InputEvent::KeyDown(Key::Down));
        session.handle_event(InputEvent::KeyDown(Key::Return));
        for _ in 0..20 {
            assert!(session.tick().is_none());
        }
        // Clicking the grid while prompting does not paint
        session.handle_event(InputEvent::PointerDown(Point::new(50.0, 50.0)));
        session.handle_event(InputEvent::KeyDown(Key::Escape));

        let document = session.document().unwrap();
        assert_eq!(document.scroll().first_visible_row(), 0);
        assert_eq!(document.grid().cell_at(0, 0).unwrap().type_index, 0);
        // Scrolling was stopped when the prompt opened
        assert!(session.clone().tick().is_none());
    }

    #[test]
    fn test_scroll_and_paint_through_session() {
        let mut session = editing_session("10");
        session.handle_event(InputEvent::KeyDown(Key::Down));
        let mut commits = 0;
        for _ in 0..5 {
            if session.tick().is_some() {
                commits += 1;
            }
        }
        assert_eq!(commits, 1);
        session.handle_event(InputEvent::KeyUp(Key::Down));
        session.tick();

        // Swatch 1 then paint the top-left visible cell, which is row 2 now
        session.handle_event(InputEvent::PointerDown(Point::new(500.0, 950.0)));
        session.handle_event(InputEvent::PointerUp);
        session.handle_event(InputEvent::PointerDown(Point::new(50.0, 50.0)));
        session.handle_event(InputEvent::PointerUp);

        let document = session.document().unwrap();
        assert_eq!(document.scroll().first_visible_row(), 2);
        assert_eq!(document.grid().row_count(), 12);
        assert_eq!(document.grid().cell_at(0, 2).unwrap().type_index, 1);

        session.handle_event(InputEvent::KeyDown(Key::Char('r')));
        let document = session.document().unwrap();
        assert_eq!(document.grid().cell_at(0, 2).unwrap().type_index, 0);
    }

    #[test]
    fn test_place_tool() {
        let mut session = editing_session("10");
        session.handle_event(InputEvent::KeyDown(Key::Tab));
        assert_eq!(session.tool(), Tool::Place);

        session.handle_event(InputEvent::PointerDown(Point::new(150.0, 850.0)));
        session.handle_event(InputEvent::PointerMove(Point::new(450.0, 550.0)));
        session.handle_event(InputEvent::PointerUp);

        let placement = session.document().unwrap().placement();
        assert_eq!(placement.state(), PlacementState::Idle);
        assert_eq!(placement.tiles().len(), 1);
        assert_eq!(placement.tiles()[0].rect.origin(), Point::new(400.0, 500.0));

        // Scroll keys are ignored by the place tool
        session.handle_event(InputEvent::KeyDown(Key::Down));
        assert!(session.tick().is_none());
    }

    #[test]
    fn test_switching_to_place_stops_scrolling() {
        let mut session = editing_session("10");
        session.handle_event(InputEvent::KeyDown(Key::Down));
        session.handle_event(InputEvent::KeyDown(Key::Tab));
        assert_eq!(session.tool(), Tool::Place);

        let commits = (0..50).filter_map(|_| session.tick()).count();
        assert_eq!(commits, 0);
        let document = session.document().unwrap();
        assert_eq!(document.scroll().first_visible_row(), 0);
        assert_eq!(document.grid().row_count(), 10);

        // Releasing the key after switching back does not jump
        session.handle_event(InputEvent::KeyDown(Key::Tab));
        session.handle_event(InputEvent::KeyUp(Key::Down));
        assert!(session.tick().is_none());
    }

    #[test]
    fn test_load_request_and_rows() {
        let mut session = editing_session("10");
        assert_eq!(
            session.handle_event(InputEvent::KeyDown(Key::Char('o'))),
            SessionEffect::Load
        );
        let rows = vec![vec![1; 10]; 12];
        session.load_rows(rows).unwrap();
        let document = session.document().unwrap();
        assert_eq!(document.grid().row_count(), 12);
        assert_eq!(document.grid().cell_at(9, 11).unwrap().type_index, 1);
        assert_eq!(document.scroll().first_visible_row(), 0);

        let err = session.load_rows(vec![vec![0; 3]]).unwrap_err();
        assert_eq!(
            err,
            GridError::ColumnMismatch {
                expected: 10,
                found: 3
            }
        );
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut session = editing_session("10");
        let before = session.revision();
        session.handle_event(InputEvent::PointerMove(Point::new(10.0, 10.0)));
        assert_eq!(session.revision(), before);
        session.handle_event(InputEvent::PointerDown(Point::new(10.0, 10.0)));
        assert!(session.revision() > before);
    }
}
