use std::fmt::Write;
use std::time::Duration;

use minefield_core::{CellView, GameSession};

pub fn glyph(view: CellView) -> char {
    use CellView::*;
    match view {
        HiddenDefault => '#',
        RevealedBlank => '.',
        RevealedNumber(count) => char::from(b'0' + count),
        Flagged => 'F',
        ExplodedMine => 'X',
        UnflaggedMineShown => '*',
        IncorrectlyFlaggedShown => '!',
    }
}

fn clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

/// Draws the status line and the whole board, columns labelled with `x` and rows with `y`.
pub fn board(game: &GameSession) -> String {
    let (width, _) = game.size();
    let mut out = String::new();

    // writing into a String cannot fail
    let _ = writeln!(
        out,
        "Time: {} / {}  Mines: {}  Flags: {}",
        clock(game.elapsed()),
        clock(game.time_limit()),
        game.mine_count(),
        game.flagged_count(),
    );

    out.push_str("   ");
    for x in 0..width {
        let _ = write!(out, "{x:>3}");
    }

    for change in game.iter_views() {
        let (x, y) = change.coords;
        if x == 0 {
            let _ = write!(out, "\n{y:>3}");
        }
        let _ = write!(out, "{:>3}", glyph(change.view));
    }
    out.push('\n');
    out
}
