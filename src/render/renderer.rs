use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameSession, Position};
use crate::storage::RecordStore;

/// Which screen the presentation layer is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    Paused,
    GameOver { new_record: bool },
}

const TITLE: &str = "SNAKE ULTRA";

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<S: RecordStore>(
        &self,
        frame: &mut Frame,
        screen: Screen,
        session: &GameSession<S>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(session);
        frame.render_widget(stats, chunks[0]);

        let board_area = self.board_area(chunks[1], session);

        match screen {
            Screen::Menu => {
                frame.render_widget(self.render_menu(session), board_area);
            }
            Screen::Playing => {
                frame.render_widget(self.render_grid(session), board_area);
            }
            Screen::Paused => {
                frame.render_widget(self.render_grid(session), board_area);
                let popup = centered(board_area, 32, 5);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_pause(), popup);
            }
            Screen::GameOver { new_record } => {
                frame.render_widget(self.render_game_over(session, new_record), board_area);
            }
        }

        let controls = self.render_controls(screen);
        frame.render_widget(controls, chunks[2]);
    }

    /// The board is two terminal columns per cell plus a border
    fn board_area<S: RecordStore>(&self, area: Rect, session: &GameSession<S>) -> Rect {
        let grid = session.grid();
        let width = (grid.width() * 2 + 2) as u16;
        let height = (grid.height() + 2) as u16;
        centered(area, width, height)
    }

    fn render_grid<S: RecordStore>(&self, session: &GameSession<S>) -> Paragraph<'_> {
        let grid = session.grid();
        let snake = session.snake();
        let head = snake.head();
        let food = session.food().position();
        let mut lines = Vec::with_capacity(grid.height());

        for y in 0..grid.height() {
            let mut spans = Vec::with_capacity(grid.width());

            for x in 0..grid.width() {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        "██",
                        Style::default()
                            .fg(Color::Blue)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snake.contains(pos) {
                    Span::styled("██", Style::default().fg(Color::Green))
                } else if pos == food {
                    Span::styled("▐▌", Style::default().fg(Color::Red))
                } else {
                    Span::styled("· ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats<S: RecordStore>(&self, session: &GameSession<S>) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                session.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Record: ", Style::default().fg(Color::Yellow)),
            Span::styled(session.record().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(session.speed().to_string(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_menu<S: RecordStore>(&self, session: &GameSession<S>) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                TITLE,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Record: ", Style::default().fg(Color::Yellow)),
                Span::styled(session.record().to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_pause(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled("P", Style::default().fg(Color::Cyan)),
                Span::styled(" to continue", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_game_over<S: RecordStore>(
        &self,
        session: &GameSession<S>,
        new_record: bool,
    ) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    session.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Record: ", Style::default().fg(Color::Yellow)),
                Span::styled(session.record().to_string(), Style::default().fg(Color::White)),
            ]),
        ];

        if new_record {
            text.push(Line::from(Span::styled(
                "New record!",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, screen: Screen) -> Paragraph<'_> {
        let line = match screen {
            Screen::Playing | Screen::Paused => Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("P", Style::default().fg(Color::Cyan)),
                Span::raw(" to pause | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
            Screen::Menu | Screen::GameOver { .. } => Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::Green)),
                Span::raw(" to play | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rectangle centred in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use crate::storage::MemoryRecordStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(screen: Screen, session: &GameSession<MemoryRecordStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        let renderer = Renderer::new();
        terminal
            .draw(|frame| renderer.render(frame, screen, session))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn session() -> GameSession<MemoryRecordStore> {
        GameSession::new(GameConfig::default(), MemoryRecordStore::new(12))
    }

    #[test]
    fn test_menu_shows_title_and_record() {
        let screen = draw(Screen::Menu, &session());
        assert!(screen.contains(TITLE));
        assert!(screen.contains("Record: 12"));
    }

    #[test]
    fn test_hud_while_playing() {
        let screen = draw(Screen::Playing, &session());
        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("Speed: 10"));
        assert!(screen.contains("Snake"));
    }

    #[test]
    fn test_pause_overlay() {
        let screen = draw(Screen::Paused, &session());
        assert!(screen.contains("PAUSED"));
    }

    #[test]
    fn test_game_over_panel() {
        let session = session();
        let screen = draw(Screen::GameOver { new_record: false }, &session);
        assert!(screen.contains("GAME OVER"));
        assert!(!screen.contains("New record!"));

        let screen = draw(Screen::GameOver { new_record: true }, &session);
        assert!(screen.contains("New record!"));
    }

    #[test]
    fn test_centered_clips_to_area() {
        let area = Rect::new(0, 0, 10, 5);
        let rect = centered(area, 40, 40);
        assert_eq!(rect.width, 10);
        assert_eq!(rect.height, 5);

        let rect = centered(area, 4, 1);
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (3, 2, 4, 1));
    }
}
