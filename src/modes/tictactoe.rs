use std::f32::consts::TAU;
use std::ops::Range;

use log::debug;
use rand::seq::IteratorRandom;
use rand::Rng;

use crate::config::{AI_DELAY, MOVE_DEBOUNCE, PLACE_TENSION};
use crate::modes::{Cue, FrameInput, HudSignal, ModeOutput, TurnState};
use crate::shapes::{board_cell_at, board_cell_center, board_mark_groups};
use crate::simulation::{ModeCanvas, Rgb, ScreenPlane, Vec3};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Half size of a drawn mark
const MARK_EXTENT: f32 = 1.3;

const X_TINT: Rgb = Rgb::new(1.0, 0.35, 0.45);
const O_TINT: Rgb = Rgb::new(0.35, 0.85, 1.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

/// Player (X) against a random AI (O)
#[derive(Clone, Debug, PartialEq)]
pub struct TicTacToeGame {
    board: [Option<Mark>; 9],
    turn: TurnState,
    selection: Option<usize>,
    clock: f32,
    last_move_time: f32,
    ai_due: f32,
    groups: [Range<usize>; 9],
}

impl TicTacToeGame {
    pub fn enter(canvas: &mut ModeCanvas<'_>) -> Self {
        let (_, groups) = board_mark_groups(canvas.len());
        Self {
            board: [None; 9],
            turn: TurnState::PlayerTurn,
            selection: None,
            clock: 0.0,
            last_move_time: -MOVE_DEBOUNCE,
            ai_due: 0.0,
            groups,
        }
    }

    pub fn board(&self) -> &[Option<Mark>; 9] {
        &self.board
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    /// Cell under the primary control point, if any
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn marks(&self) -> usize {
        self.board.iter().filter(|c| c.is_some()).count()
    }

    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|line| {
            let first = self.board[line[0]]?;
            line.iter()
                .all(|&c| self.board[c] == Some(first))
                .then_some(first)
        })
    }

    /// Place `mark` in `cell`. Occupied cells, out-of-range cells and
    /// finished boards are rejected.
    pub fn try_place(&mut self, cell: usize, mark: Mark) -> bool {
        if cell >= 9 || self.turn.is_terminal() || self.board[cell].is_some() {
            return false;
        }
        self.board[cell] = Some(mark);
        self.last_move_time = self.clock;

        self.turn = match (self.winner(), mark) {
            (Some(Mark::X), _) => TurnState::PlayerWon,
            (Some(Mark::O), _) => TurnState::AiWon,
            (None, _) if self.marks() == 9 => TurnState::Draw,
            (None, Mark::X) => {
                self.ai_due = self.clock + AI_DELAY;
                TurnState::AiThinking
            }
            (None, Mark::O) => TurnState::PlayerTurn,
        };
        debug!("{:?} placed in cell {}, now {:?}", mark, cell, self.turn);
        true
    }

    pub fn frame<R: Rng>(
        &mut self,
        input: &FrameInput<'_>,
        canvas: &mut ModeCanvas<'_>,
        rng: &mut R,
    ) -> ModeOutput {
        self.clock += input.dt.max(0.0);
        let primary = input.primary();
        self.selection = primary.and_then(|c| board_cell_at(input.world(c)));

        let mut placed = None;
        match self.turn {
            TurnState::PlayerTurn => {
                let pinched = primary.is_some_and(|c| c.tension > PLACE_TENSION);
                let rested = self.clock - self.last_move_time >= MOVE_DEBOUNCE;
                if let (true, true, Some(cell)) = (pinched, rested, self.selection) {
                    if self.try_place(cell, Mark::X) {
                        placed = Some(cell);
                    }
                }
            }
            TurnState::AiThinking if self.clock >= self.ai_due => {
                let choice = (0..9).filter(|&c| self.board[c].is_none()).choose(rng);
                if let Some(cell) = choice {
                    if self.try_place(cell, Mark::O) {
                        placed = Some(cell);
                    }
                }
            }
            _ => {}
        }

        let cue = placed.map(|cell| {
            self.draw_mark(canvas, cell);
            match self.turn {
                TurnState::PlayerWon => Cue::Win,
                TurnState::AiWon => Cue::Lose,
                TurnState::Draw => Cue::Draw,
                _ => Cue::Place,
            }
        });

        ModeOutput::hud(HudSignal::Turn(self.turn)).with_cue(cue)
    }

    /// Pull a cell's reserve particles into its mark
    fn draw_mark(&self, canvas: &mut ModeCanvas<'_>, cell: usize) {
        let Some(mark) = self.board[cell] else {
            return;
        };
        let center = board_cell_center(cell);
        let group = self.groups[cell].clone();
        let n = group.len().max(1) as f32;
        for (k, i) in group.clone().enumerate() {
            let t = k as f32 / n;
            let offset = match mark {
                Mark::X => {
                    let along = ((k / 2) as f32 * 2.0 / n) * 2.0 - 1.0;
                    let slope = if k % 2 == 0 { 1.0 } else { -1.0 };
                    Vec3::new(along * MARK_EXTENT, along * MARK_EXTENT * slope, 0.3)
                }
                Mark::O => {
                    let angle = t * TAU;
                    Vec3::new(angle.cos() * MARK_EXTENT, angle.sin() * MARK_EXTENT, 0.3)
                }
            };
            canvas.targets.set_live(i, center + offset);
        }
        let tint = match mark {
            Mark::X => X_TINT,
            Mark::O => O_TINT,
        };
        canvas.styles.tint_range(group, tint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::ControlPoint;
    use crate::simulation::{Burst, StyleBuffer, TargetBuffer, ViewExtent};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn with_canvas<T>(count: usize, f: impl FnOnce(&mut ModeCanvas<'_>) -> T) -> T {
        let mut targets = TargetBuffer::new(vec![Vec3::ZERO; count]);
        let mut styles = StyleBuffer::new(count, Rgb::WHITE);
        let mut bursts: Vec<Burst> = Vec::new();
        let mut canvas = ModeCanvas {
            targets: &mut targets,
            styles: &mut styles,
            bursts: &mut bursts,
            base_color: Rgb::WHITE,
        };
        f(&mut canvas)
    }

    #[test]
    fn test_occupied_cell_rejected() {
        with_canvas(900, |canvas| {
            let mut game = TicTacToeGame::enter(canvas);
            assert!(game.try_place(4, Mark::X));
            assert!(!game.try_place(4, Mark::O));
            assert!(!game.try_place(9, Mark::O));
            assert_eq!(game.marks(), 1);
            assert_eq!(game.board()[4], Some(Mark::X));
        });
    }

    #[test]
    fn test_completed_line_is_terminal() {
        with_canvas(900, |canvas| {
            let mut game = TicTacToeGame::enter(canvas);
            assert!(game.try_place(0, Mark::X));
            assert!(game.try_place(3, Mark::O));
            assert!(game.try_place(1, Mark::X));
            assert!(game.try_place(4, Mark::O));
            assert!(game.try_place(2, Mark::X));
            assert_eq!(game.turn(), TurnState::PlayerWon);
            assert_eq!(game.winner(), Some(Mark::X));
            assert!(!game.try_place(5, Mark::O));
            assert!(!game.try_place(8, Mark::X));
            assert_eq!(game.marks(), 5);
        });
    }

    #[test]
    fn test_full_board_is_draw() {
        with_canvas(900, |canvas| {
            let mut game = TicTacToeGame::enter(canvas);
            // X O X / X O O / O X X
            for (cell, mark) in [
                (0, Mark::X),
                (1, Mark::O),
                (2, Mark::X),
                (4, Mark::O),
                (3, Mark::X),
                (5, Mark::O),
                (7, Mark::X),
                (6, Mark::O),
                (8, Mark::X),
            ] {
                assert!(game.try_place(cell, mark));
            }
            assert_eq!(game.winner(), None);
            assert_eq!(game.turn(), TurnState::Draw);
        });
    }

    #[test]
    fn test_ai_answers_after_delay() {
        with_canvas(2000, |canvas| {
            let mut rng = StdRng::seed_from_u64(9);
            let mut game = TicTacToeGame::enter(canvas);
            let pinch = [ControlPoint::pointer(0.0, 0.0, 0.95)];
            let extent = ViewExtent::default();

            let input = FrameInput::new(&pinch, 0.016, 0.0, extent);
            let out = game.frame(&input, canvas, &mut rng);
            assert_eq!(out.cue, Some(Cue::Place));
            assert_eq!(game.board()[4], Some(Mark::X));
            assert_eq!(game.turn(), TurnState::AiThinking);

            let mut t = 0.0;
            while t < AI_DELAY - 0.1 {
                game.frame(&input, canvas, &mut rng);
                t += 0.016;
            }
            assert_eq!(game.marks(), 1, "AI moved before its delay");

            for _ in 0..100 {
                game.frame(&input, canvas, &mut rng);
            }
            assert_eq!(game.marks(), 2);
            assert_eq!(game.turn(), TurnState::PlayerTurn);
        });
    }

    #[test]
    fn test_marks_drawn_at_cell() {
        with_canvas(2000, |canvas| {
            let mut game = TicTacToeGame::enter(canvas);
            assert!(game.try_place(0, Mark::O));
            game.draw_mark(canvas, 0);
            let center = board_cell_center(0);
            for i in game.groups[0].clone() {
                let d = canvas.targets.live()[i].distance_xy(center);
                assert!((d - MARK_EXTENT).abs() < 1e-3);
                assert_eq!(canvas.styles.tint[i], O_TINT);
            }
        });
    }
}
