use std::path::PathBuf;
use std::time::{Duration, Instant};

use content_builder_config::Config;
use content_builder_engine::{
    BlockKind, BlockLayout, DispatchOutcome, Document, DragInput, Editor, EditorOptions,
    IndicatorPlacement, LayoutMetrics, MoveOutcome, Node, SnapPolicy, StackLayout, io,
};
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

/// Columns reserved for drag handles on the left of the document panel.
pub const GUTTER: u16 = 2;

/// One top-level block as drawn in the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub start: usize,
    pub end: usize,
    pub first_row: u16,
    pub lines: Vec<String>,
}

impl RenderedBlock {
    pub fn rows(&self) -> std::ops::Range<u16> {
        let height = u16::try_from(self.lines.len()).unwrap_or(u16::MAX);
        self.first_row..self.first_row.saturating_add(height)
    }
}

pub fn editor_options(config: &Config) -> EditorOptions {
    EditorOptions {
        snap: SnapPolicy {
            ratio: config.snap.ratio,
            min: config.snap.min,
            max: config.snap.max,
        },
        press_suppression: Duration::from_millis(config.press_suppression_ms),
        history_limit: config.history_limit,
    }
}

pub fn stack_layout(config: &Config) -> StackLayout {
    StackLayout::new(LayoutMetrics {
        line_height: config.layout.line_height.max(1.0),
        px_scale: config.layout.px_scale,
        origin_y: 0.0,
    })
}

fn prefixed(node: &Node, first: &str, rest: &str) -> Vec<String> {
    node.text_content()
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{}{line}", if i == 0 { first } else { rest }))
        .collect()
}

/// Terminal lines for a top-level block, one per laid-out text line.
pub fn block_lines(node: &Node) -> Vec<String> {
    match node.block_kind() {
        Some(BlockKind::Heading { level }) => {
            let marker = format!("{} ", "#".repeat(usize::from(*level)));
            let pad = " ".repeat(marker.len());
            prefixed(node, &marker, &pad)
        }
        Some(BlockKind::BulletList) => node
            .content()
            .iter()
            .flat_map(|item| prefixed(item, "• ", "  "))
            .collect(),
        Some(BlockKind::OrderedList { start }) => node
            .content()
            .iter()
            .enumerate()
            .flat_map(|(i, item)| {
                let marker = format!("{}. ", *start as usize + i);
                let pad = " ".repeat(marker.len());
                prefixed(item, &marker, &pad)
            })
            .collect(),
        Some(BlockKind::Blockquote) => prefixed(node, "> ", "> "),
        Some(BlockKind::CodeBlock { .. }) => prefixed(node, "│ ", "│ "),
        Some(BlockKind::HorizontalRule) => vec!["─".repeat(24)],
        _ => prefixed(node, "", ""),
    }
}

/// Position, kind and first line of every top-level block.
pub fn outline(doc: &Document) -> Vec<String> {
    doc.top_level_blocks()
        .map(|block| {
            let kind = block.node.block_kind().map_or("?", BlockKind::name);
            let text = block.node.text_content();
            let first = text.lines().next().unwrap_or_default();
            format!("{:>5}..{:<5} {kind:<14} {first}", block.start, block.end)
        })
        .collect()
}

pub struct App {
    editor: Editor<StackLayout>,
    path: PathBuf,
    content_area: Option<Rect>,
    pub status: String,
    pub dirty: bool,
}

impl App {
    pub fn new(doc: Document, path: PathBuf, config: &Config) -> Self {
        let editor = Editor::new(doc, stack_layout(config), editor_options(config));
        Self {
            editor,
            path,
            content_area: None,
            status: String::new(),
            dirty: false,
        }
    }

    pub fn editor(&self) -> &Editor<StackLayout> {
        &self.editor
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Inner area of the document panel, recorded on every draw.
    pub fn set_content_area(&mut self, area: Rect) {
        self.content_area = Some(area);
    }

    fn line_height(&self) -> f64 {
        self.editor.layout().metrics.line_height
    }

    fn y_to_row(&self, y: f64) -> u16 {
        (y / self.line_height()).round().clamp(0.0, f64::from(u16::MAX)) as u16
    }

    /// Layout Y at the middle of a terminal row.
    pub fn row_to_y(&self, row: u16) -> f64 {
        (f64::from(row) + 0.5) * self.line_height()
    }

    pub fn rendered_blocks(&self) -> Vec<RenderedBlock> {
        let doc = self.editor.document();
        let bounds = self.editor.layout().block_bounds(doc);
        let mut next_free = 0u16;
        doc.top_level_blocks()
            .zip(bounds)
            .map(|(block, bounds)| {
                let rendered = RenderedBlock {
                    start: block.start,
                    end: block.end,
                    first_row: self.y_to_row(bounds.top).max(next_free),
                    lines: block_lines(block.node),
                };
                next_free = rendered.rows().end;
                rendered
            })
            .collect()
    }

    /// Row the drop indicator sits on, if one is showing.
    pub fn indicator_row(&self) -> Option<u16> {
        match self.editor.indicator() {
            IndicatorPlacement::Hidden => None,
            IndicatorPlacement::Line { y, .. } | IndicatorPlacement::DocumentEnd { y, .. } => {
                Some(self.y_to_row(y))
            }
        }
    }

    fn handle_at(&self, row: u16) -> Option<usize> {
        self.rendered_blocks()
            .into_iter()
            .find(|block| block.rows().contains(&row))
            .map(|block| block.start)
    }

    fn to_content(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        let area = self.content_area?;
        let inside = column >= area.x
            && column < area.x.saturating_add(area.width)
            && row >= area.y
            && row < area.y.saturating_add(area.height);
        inside.then(|| (column - area.x, row - area.y))
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        let Some((column, row)) = self.to_content(event.column, event.row) else {
            if self.editor.session().is_active() {
                self.dispatch(DragInput::Leave);
            }
            return;
        };
        let x = f64::from(column);
        let y = self.row_to_y(row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) if column < GUTTER => {
                if let Some(pos) = self.handle_at(row) {
                    self.dispatch(DragInput::PointerDown {
                        pos,
                        at: Instant::now(),
                    });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let session = self.editor.session();
                if session.is_active() && !session.is_dragging() {
                    self.dispatch(DragInput::DragStart);
                }
                self.dispatch(DragInput::PointerMove { x, y });
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let input = if self.editor.session().is_dragging() {
                    DragInput::Drop { x, y }
                } else {
                    DragInput::DragEnd
                };
                self.dispatch(input);
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, input: DragInput) {
        let DispatchOutcome::Finished(outcome) = self.editor.dispatch(input) else {
            return;
        };
        self.status = match outcome {
            MoveOutcome::Moved {
                source, insert_pos, ..
            } => {
                self.dirty = true;
                format!("Moved block {}..{} to {insert_pos}", source.start, source.end)
            }
            MoveOutcome::Cancelled(reason) => format!("Move cancelled ({reason:?})"),
            MoveOutcome::Rejected(err) => format!("Move rejected: {err}"),
        };
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.editor.session().is_active() {
                    self.dispatch(DragInput::Cancel);
                }
            }
            KeyCode::Char('u') => {
                self.status = match self.editor.undo() {
                    Some(patch) => {
                        self.dirty = true;
                        format!("Undone (version {})", patch.version)
                    }
                    None => "Nothing to undo".to_string(),
                };
            }
            KeyCode::Char('r') => {
                self.status = match self.editor.redo() {
                    Some(patch) => {
                        self.dirty = true;
                        format!("Redone (version {})", patch.version)
                    }
                    None => "Nothing to redo".to_string(),
                };
            }
            KeyCode::Char('s') => self.save(),
            _ => {}
        }
        false
    }

    fn save(&mut self) {
        match io::write_document(&self.path, self.editor.document()) {
            Ok(()) => {
                self.dirty = false;
                self.status = format!("Saved {}", self.path.display());
            }
            Err(e) => {
                log::error!("saving {} failed: {e}", self.path.display());
                self.status = format!("Save failed: {e}");
            }
        }
    }
}
