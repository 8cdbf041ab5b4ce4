use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::i18n::Phrase;
use crate::core::state::{App, Presentation};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::input_box;
use crate::tui::components::{LandingPage, MessageList, TitleBar};

/// Animation ticks per second for spinners.
const TICKS_PER_SEC: f32 = 12.0;

pub fn tick(elapsed: Duration) -> usize {
    (elapsed.as_secs_f32() * TICKS_PER_SEC) as usize
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, elapsed: Duration) {
    let tick = tick(elapsed);
    let area = frame.area();
    tui.input_box.disabled = app.is_loading;
    tui.input_box.tick = tick;

    match app.presentation {
        Presentation::Closed => {
            LandingPage::new(&mut tui.input_box, app.language, elapsed)
                .render(frame, area);
        }
        Presentation::Open => {
            use Constraint::{Length, Min};
            let layout = Layout::vertical([Length(1), Min(0), Length(input_box::HEIGHT)]);
            let [title_area, main_area, input_area] = layout.areas(area);

            TitleBar::new(
                Phrase::Title.text(app.language),
                app.status_message.as_str(),
                Phrase::CloseHint.text(app.language),
            )
            .render(frame, title_area);

            MessageList::new(
                &mut tui.message_list,
                app.messages.messages(),
                app.language,
                app.is_loading,
                tick,
            )
            .render(frame, main_area);

            tui.input_box.render(frame, input_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| draw_ui(f, app, tui, Duration::ZERO))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn closed_shows_entry_form() {
        let app = test_app();
        let mut tui = TuiState::new(app.language);
        let text = draw(&app, &mut tui);
        assert!(text.contains("Ask anything."));
        assert!(!text.contains("Esc to close"));
    }

    #[test]
    fn open_shows_thread_and_disables_input_while_loading() {
        let mut app = test_app();
        let mut tui = TuiState::new(app.language);
        update(&mut app, Action::Submit("hello there".into()));

        let text = draw(&app, &mut tui);
        assert!(text.contains("Esc to close"));
        assert!(text.contains("hello there"));
        assert!(text.contains("Thinking..."));
        assert!(tui.input_box.disabled);
    }

    #[test]
    fn tick_advances_with_time() {
        assert_eq!(tick(Duration::ZERO), 0);
        assert_eq!(tick(Duration::from_secs(1)), 12);
    }
}
