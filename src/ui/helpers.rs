use anyhow::Error;
use ratatui::layout::{Constraint, Layout, Rect};

/// Produce a rectangle centered within `area` spanning the requested percent
/// of the width and height. Used for the modal form popups.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let side_x = (100 - percent_x) / 2;
    let side_y = (100 - percent_y) / 2;

    let [_, middle, _] = Layout::horizontal([
        Constraint::Percentage(side_x),
        Constraint::Percentage(percent_x),
        Constraint::Percentage(side_x),
    ])
    .areas(area);

    let [_, popup, _] = Layout::vertical([
        Constraint::Percentage(side_y),
        Constraint::Percentage(percent_y),
        Constraint::Percentage(side_y),
    ])
    .areas(middle);

    popup
}

/// Extract the most relevant message from a chained error. The deepest cause
/// is usually the one worth showing ("Connection refused" rather than
/// "failed to load books").
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
