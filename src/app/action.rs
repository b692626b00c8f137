/// User intents produced by key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavigateUp,
    NavigateDown,
    GoToTop,
    GoToBottom,
    /// Open the selected album, or play the selected track
    Open,
    Back,
    /// Focus the filter input
    Search,
    ToggleSort,
    TogglePlayPause,
    /// Re-dispatch the current route
    Reload,
}

impl Action {
    pub fn description(self) -> &'static str {
        match self {
            Action::Quit => "quit",
            Action::NavigateUp => "up",
            Action::NavigateDown => "down",
            Action::GoToTop => "top",
            Action::GoToBottom => "bottom",
            Action::Open => "open",
            Action::Back => "back",
            Action::Search => "search",
            Action::ToggleSort => "sort",
            Action::TogglePlayPause => "play/pause",
            Action::Reload => "reload",
        }
    }
}
