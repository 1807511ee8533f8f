#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Help,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    Toggle,
    Exit,
}

/// Paging keys of a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Next,
    Previous,
    First,
    Last,
    Grow,
    Shrink,
    Reload,
}

/// Keys that trigger a row action on the selected row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKeyAction {
    Update,
    Details,
}
