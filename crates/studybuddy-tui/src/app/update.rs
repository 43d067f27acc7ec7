use studybuddy_core::TaskKind;

use super::{App, Screen};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(12);
                return false;
            }
            _ => {}
        }

        // Help overlay
        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::NavigateBack) {
                self.show_help = false;
            }
            return false;
        }

        if self.screen == Screen::FilePicker {
            self.handle_file_picker_action(action);
            return false;
        }

        match action {
            Action::OpenFilePicker => {
                self.notice = None;
                // Reopen where the picker was last left, with fresh listings
                self.file_picker.refresh_entries();
                self.screen = Screen::FilePicker;
            }
            Action::Generate(task) => self.trigger(task),
            Action::CycleTab => {
                self.result_tab = next_tab(self.result_tab);
                self.scroll = 0;
            }
            Action::MoveDown => self.scroll_by(1),
            Action::MoveUp => self.scroll = self.scroll.saturating_sub(1),
            Action::PageDown => self.scroll_by(self.visible_rows.max(1)),
            Action::PageUp => {
                let page = self.visible_rows.max(1).min(u16::MAX as usize) as u16;
                self.scroll = self.scroll.saturating_sub(page);
            }
            Action::GoTop => self.scroll = 0,
            Action::GoBottom => self.scroll = self.max_scroll(),
            Action::ToggleHelp => self.show_help = true,
            Action::NavigateBack => self.notice = None,
            _ => {}
        }
        false
    }

    fn scroll_by(&mut self, lines: usize) {
        let target = (self.scroll as usize).saturating_add(lines);
        self.scroll = target.min(self.max_scroll() as usize) as u16;
    }

    fn max_scroll(&self) -> u16 {
        let count = self.result_line_count().saturating_sub(1);
        count.min(u16::MAX as usize) as u16
    }
}

fn next_tab(tab: TaskKind) -> TaskKind {
    match tab {
        TaskKind::Summary => TaskKind::Flashcards,
        TaskKind::Flashcards => TaskKind::Quiz,
        TaskKind::Quiz => TaskKind::Summary,
    }
}
