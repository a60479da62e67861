//! Per-mode state machines. Each game claims particles through the
//! `ModeCanvas` and reports a small HUD signal every frame.

mod balloon;
mod fog;
mod memory;
mod snake;
mod tictactoe;

pub use balloon::BalloonGame;
pub use fog::FogGame;
pub use memory::{MemoryGame, MemoryPhase};
pub use snake::SnakeGame;
pub use tictactoe::{Mark, TicTacToeGame};

use std::fmt;

use rand::Rng;

use crate::audio::AudioBands;
use crate::config::{
    AUDIO_EXCITATION, BALLOON_GRAVITY, BALLOON_SCATTER, BALLOON_STIFFNESS, REFERENCE_FPS,
    SELECTION_ATTRACT, SWIRL_BASE_SPIN, SWIRL_GRIP_SPIN, THUNDER_BASE_CRACKLE, THUNDER_DAMPING,
    THUNDER_GRIP_CRACKLE,
};
use crate::gesture::ControlPoint;
use crate::shapes::{board_cell_center, Mode};
use crate::simulation::{ForceProfile, Interaction, ModeCanvas, ModeField, Vec3, ViewExtent};

/// Everything a mode sees about the current frame
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    pub controls: &'a [ControlPoint],
    pub dt: f32,
    pub elapsed: f32,
    pub extent: ViewExtent,
}

impl<'a> FrameInput<'a> {
    pub fn new(controls: &'a [ControlPoint], dt: f32, elapsed: f32, extent: ViewExtent) -> Self {
        Self {
            controls,
            dt,
            elapsed,
            extent,
        }
    }

    /// First active control point
    pub fn primary(&self) -> Option<&'a ControlPoint> {
        self.controls.iter().find(|c| c.active)
    }

    pub fn active(&self) -> impl Iterator<Item = &'a ControlPoint> + 'a {
        self.controls.iter().filter(|c| c.active)
    }

    /// Highest grip among active control points, 0 without any
    pub fn max_tension(&self) -> f32 {
        self.active().map(|c| c.tension).fold(0.0, f32::max)
    }

    pub fn world(&self, control: &ControlPoint) -> Vec3 {
        control.world(self.extent)
    }
}

/// Tic-tac-toe turn indicator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    PlayerTurn,
    AiThinking,
    PlayerWon,
    AiWon,
    Draw,
}

impl TurnState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnState::PlayerWon | TurnState::AiWon | TurnState::Draw)
    }

    pub fn label(self) -> &'static str {
        match self {
            TurnState::PlayerTurn => "your turn",
            TurnState::AiThinking => "AI thinking",
            TurnState::PlayerWon => "you win",
            TurnState::AiWon => "AI wins",
            TurnState::Draw => "draw",
        }
    }
}

/// Small per-frame status for the HUD
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HudSignal {
    None,
    Score(u32),
    Level(u32),
    Turn(TurnState),
    Reveal { index: usize, ratio: f32 },
}

impl fmt::Display for HudSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HudSignal::None => Ok(()),
            HudSignal::Score(score) => write!(f, "score {}", score),
            HudSignal::Level(level) => write!(f, "level {}", level),
            HudSignal::Turn(turn) => f.write_str(turn.label()),
            HudSignal::Reveal { index, ratio } => {
                write!(f, "glyph {} {:.0}% revealed", index + 1, ratio * 100.0)
            }
        }
    }
}

/// One-shot event a front end may turn into sound or flashes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Eat,
    Pop,
    Place,
    Win,
    Lose,
    Draw,
    Miss,
    LevelUp,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeOutput {
    pub hud: HudSignal,
    pub cue: Option<Cue>,
}

impl ModeOutput {
    pub fn hud(hud: HudSignal) -> Self {
        Self { hud, cue: None }
    }

    pub fn with_cue(mut self, cue: Option<Cue>) -> Self {
        if cue.is_some() {
            self.cue = cue;
        }
        self
    }
}

impl Default for ModeOutput {
    fn default() -> Self {
        Self::hud(HudSignal::None)
    }
}

/// Mode-local state, rebuilt from scratch on every mode switch
#[derive(Clone, Debug, PartialEq)]
pub enum ModeState {
    Idle,
    Snake(SnakeGame),
    TicTacToe(TicTacToeGame),
    Memory(MemoryGame),
    BalloonPop(BalloonGame),
    FogReveal(FogGame),
}

impl ModeState {
    /// Fresh state for `mode`; targets must already hold the mode's formation
    pub fn enter<R: Rng>(mode: Mode, canvas: &mut ModeCanvas<'_>, rng: &mut R) -> ModeState {
        match mode {
            Mode::Snake => ModeState::Snake(SnakeGame::enter(canvas)),
            Mode::TicTacToe => ModeState::TicTacToe(TicTacToeGame::enter(canvas)),
            Mode::Memory => ModeState::Memory(MemoryGame::enter(canvas, rng)),
            Mode::BalloonPop => ModeState::BalloonPop(BalloonGame::enter(canvas)),
            Mode::FogReveal => ModeState::FogReveal(FogGame::enter(canvas)),
            _ => ModeState::Idle,
        }
    }

    /// Advance one frame and rewrite claimed targets / styles
    pub fn frame<R: Rng>(
        &mut self,
        input: &FrameInput<'_>,
        canvas: &mut ModeCanvas<'_>,
        rng: &mut R,
    ) -> ModeOutput {
        match self {
            ModeState::Idle => ModeOutput::default(),
            ModeState::Snake(game) => game.frame(input, canvas, rng),
            ModeState::TicTacToe(game) => game.frame(input, canvas, rng),
            ModeState::Memory(game) => game.frame(input, canvas, rng),
            ModeState::BalloonPop(game) => game.frame(input, canvas, rng),
            ModeState::FogReveal(game) => game.frame(input, canvas),
        }
    }

    /// Re-derive tints that depend on the base color after it changed.
    /// Modes that repaint every frame need nothing here.
    pub fn repaint(&self, canvas: &mut ModeCanvas<'_>) {
        if let ModeState::FogReveal(game) = self {
            game.paint(canvas);
        }
    }

    /// Forces for this frame, resolved once before the particle loop
    pub fn profile(&self, mode: Mode, input: &FrameInput<'_>, audio: AudioBands) -> ForceProfile {
        let grip = input.max_tension();
        match (mode, self) {
            (Mode::Vortex | Mode::Tornado, _) => ForceProfile {
                field: ModeField::Swirl {
                    spin: SWIRL_BASE_SPIN + SWIRL_GRIP_SPIN * grip,
                },
                ..ForceProfile::default()
            },
            (Mode::Thunder, _) => {
                let excitation = audio.clamped().level * AUDIO_EXCITATION;
                let kick = THUNDER_BASE_CRACKLE + THUNDER_GRIP_CRACKLE * grip + excitation;
                ForceProfile {
                    damping: THUNDER_DAMPING,
                    // Per-frame velocity kick expressed as a force
                    field: ModeField::Crackle {
                        amplitude: kick * REFERENCE_FPS,
                    },
                    ..ForceProfile::default()
                }
            }
            (_, ModeState::TicTacToe(game)) => ForceProfile {
                interaction: match game.selection() {
                    Some(cell) => Interaction::AttractTo {
                        point: board_cell_center(cell),
                        strength: SELECTION_ATTRACT,
                    },
                    None => Interaction::Disabled,
                },
                ..ForceProfile::default()
            },
            (_, ModeState::BalloonPop(_)) => ForceProfile {
                stiffness: BALLOON_STIFFNESS,
                interaction: Interaction::Disabled,
                field: ModeField::Ballistic {
                    gravity: BALLOON_GRAVITY,
                    scatter: BALLOON_SCATTER,
                },
                ..ForceProfile::default()
            },
            (_, ModeState::FogReveal(_)) => ForceProfile {
                interaction: Interaction::Disabled,
                ..ForceProfile::default()
            },
            _ => ForceProfile::default(),
        }
    }
}
