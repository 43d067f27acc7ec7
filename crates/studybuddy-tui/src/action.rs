use studybuddy_core::TaskKind;

/// User intents produced by [`crate::input::map_event`] and consumed by
/// [`crate::app::App::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveDown,
    MoveUp,
    PageDown,
    PageUp,
    GoTop,
    GoBottom,
    /// Enter: open a directory or pick a file in the file picker.
    DrillIn,
    /// Esc: leave the picker, close the help, or dismiss a notice.
    NavigateBack,
    OpenFilePicker,
    Generate(TaskKind),
    CycleTab,
    ToggleHelp,
    Tick,
    Resize(u16, u16),
    None,
}
