use tui_match3::core::{GameConfig, GameSnapshot, GameState, Grid};
use tui_match3::term::{token_color, AnchorY, GameView, Viewport};
use tui_match3::types::{Coord, Token};

fn board_snapshot(rows: &[&str]) -> GameSnapshot {
    let mut snap = GameSnapshot::default();
    snap.write_grid(&Grid::from_rows(rows));
    snap.running = true;
    snap
}

fn all_text(fb: &tui_match3::term::FrameBuffer) -> String {
    (0..fb.height()).map(|y| fb.row_text(y) + "\n").collect()
}

#[test]
fn term_view_renders_border_corners() {
    let snap = GameState::new(GameConfig::default()).unwrap().snapshot();
    let view = GameView::default();

    // 6x6 board, 2 chars per cell => 12x6, plus border => 14x8.
    let fb = view.render(&snap, None, Viewport::new(14, 8));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(13, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 7).unwrap().ch, '└');
    assert_eq!(fb.get(13, 7).unwrap().ch, '┘');
}

#[test]
fn term_view_puts_row_zero_at_the_bottom() {
    let snap = board_snapshot(&["000", "111", "212"]);
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, None, Viewport::new(8, 5));

    // Inside border: (1,1) origin. Board row y=0 is the last screen row.
    let bottom = fb.get(1, 3).unwrap();
    assert_eq!(bottom.ch, '●');
    assert_eq!(bottom.style.fg, token_color(Token::new(2)));
    assert_eq!(fb.get(1, 1).unwrap().style.fg, token_color(Token::new(0)));
    assert_eq!(
        view.cell_origin(&snap, Viewport::new(8, 5), Coord::new(2, 0)),
        Some((5, 3))
    );
}

#[test]
fn term_view_marks_empty_cells() {
    let snap = board_snapshot(&["..", "01"]);
    let fb = GameView::default().render(&snap, None, Viewport::new(6, 4));
    assert_eq!(fb.get(1, 1).unwrap().ch, '·');
    assert_eq!(fb.get(3, 1).unwrap().ch, '·');
    assert_eq!(fb.get(1, 2).unwrap().ch, '●');
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut snap = board_snapshot(&["012", "120", "201"]);
    snap.points = 1234;
    snap.round_goal = 1500;
    snap.timer_ms = 12_345;

    let view = GameView::default();
    let text = all_text(&view.render(&snap, None, Viewport::new(40, 20)));
    assert!(text.contains("POINTS"));
    assert!(text.contains("1234"));
    assert!(text.contains("1500"));
    assert!(text.contains("12.3"));
    assert!(text.contains("NORMAL"));

    // Too narrow: board only.
    let narrow = all_text(&view.render(&snap, None, Viewport::new(10, 20)));
    assert!(!narrow.contains("POINTS"));
}

#[test]
fn term_view_shows_game_over_after_a_round() {
    let mut game = GameState::new(GameConfig {
        round_ms: 16,
        ..GameConfig::default()
    })
    .unwrap();
    let view = GameView::default();

    let idle = all_text(&view.render(&game.snapshot(), None, Viewport::new(30, 12)));
    assert!(idle.contains("N: new"));
    assert!(!idle.contains("GAME OVER"));

    game.start_round(false);
    game.on_tick(16);
    let over = all_text(&view.render(&game.snapshot(), None, Viewport::new(30, 12)));
    assert!(over.contains("GAME OVER"));
}

#[test]
fn term_view_centers_board_by_default_on_tall_viewports() {
    let snap = GameState::new(GameConfig::default()).unwrap().snapshot();
    let fb = GameView::default().render(&snap, None, Viewport::new(14, 20));

    // start_y = (20 - 8) / 2 = 6 => top-left corner at (0,6).
    assert_eq!(fb.get(0, 6).unwrap().ch, '┌');
}
