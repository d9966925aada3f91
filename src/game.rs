use crate::config::{self, Bounds, Config, ConfigError, Surface};
use crate::square::{Point, Rgb, Square, SquareId};
use log::{debug, info, trace};
use rand::Rng;

/// Fixed parameters of a round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    pub round_seconds: u32,
    pub size: f32,
    pub drift: f32,
    pub movement: Bounds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub score: u32,
    pub time_remaining: u32,
    pub active: bool,
    /// Live squares in spawn order.
    pub squares: Vec<Square>,
    pub high_score: u32,
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Counted { time_remaining: u32 },
    Ended { score: u32, high_score: u32 },
}

pub struct Game<R> {
    state: GameState,
    rules: Rules,
    surface: Surface,
    rng: R,
    next_id: u64,
    update: bool,
}

impl Rules {
    pub fn from_config(config: &Config) -> Self {
        Self {
            round_seconds: config.game.round_seconds,
            size: config.squares.size,
            drift: config.squares.drift,
            movement: config.squares.movement,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl GameState {
    fn new(round_seconds: u32) -> Self {
        Self {
            score: 0,
            time_remaining: round_seconds,
            active: false,
            squares: Vec::new(),
            high_score: 0,
        }
    }
}

impl<R: Rng> Game<R> {
    pub fn new(rules: Rules, surface: Surface, rng: R) -> Result<Self, ConfigError> {
        config::check_size(rules.size)?;
        config::check_drift(rules.drift)?;
        rules.movement.check()?;
        surface.check_fits(rules.size)?;

        Ok(Self {
            state: GameState::new(rules.round_seconds),
            rules,
            surface,
            rng,
            next_id: 0,
            update: true,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Returns whether the state changed since the last call.
    pub fn update(&mut self) -> bool {
        std::mem::replace(&mut self.update, false)
    }

    pub fn start_game(&mut self) {
        self.state.score = 0;
        self.state.time_remaining = self.rules.round_seconds;
        self.state.squares.clear();
        self.state.active = true;
        self.update = true;

        info!("round started ({}s)", self.rules.round_seconds);
    }

    pub fn on_tick(&mut self) -> Tick {
        if !self.state.active {
            return Tick::Idle;
        }

        self.update = true;

        if self.state.time_remaining > 0 {
            self.state.time_remaining -= 1;
            self.drift_squares();
            self.spawn_square();

            debug!(
                "tick: {} remaining, {} squares",
                self.state.time_remaining,
                self.state.squares.len()
            );

            Tick::Counted {
                time_remaining: self.state.time_remaining,
            }
        } else {
            self.end_game();
            Tick::Ended {
                score: self.state.score,
                high_score: self.state.high_score,
            }
        }
    }

    pub fn spawn_square(&mut self) -> SquareId {
        let size = self.rules.size;
        let x = self.rng.gen_range(size..=self.surface.width as f32 - size);
        let y = self.rng.gen_range(size..=self.surface.height as f32 - size);
        let id = SquareId(self.next_id);
        self.next_id += 1;

        trace!("spawn {:?} at ({:.1}, {:.1})", id, x, y);

        self.state.squares.push(Square {
            id,
            color: Rgb::random(&mut self.rng),
            size,
            position: Point::new(x, y),
        });
        self.update = true;

        id
    }

    pub fn drift_squares(&mut self) {
        let drift = self.rules.drift;
        let bounds = self.rules.movement;

        for square in self.state.squares.iter_mut() {
            let dx = self.rng.gen_range(-drift..=drift);
            let dy = self.rng.gen_range(-drift..=drift);
            square.position.x = bounds.clamp_x(square.position.x + dx);
            square.position.y = bounds.clamp_y(square.position.y + dy);
        }

        if !self.state.squares.is_empty() {
            self.update = true;
        }
    }

    /// Removes the square and scores it. Unknown ids are ignored.
    pub fn remove_square(&mut self, id: SquareId) -> bool {
        let Some(index) = self.state.squares.iter().position(|s| s.id == id) else {
            return false;
        };

        self.state.squares.remove(index);
        self.state.score += 1;
        if self.state.score > self.state.high_score {
            self.state.high_score = self.state.score;
        }
        self.update = true;

        true
    }

    pub fn end_game(&mut self) {
        self.state.active = false;
        self.update = true;

        info!(
            "round over: score {}, high score {}",
            self.state.score, self.state.high_score
        );
    }

    /// Topmost live square under `point`.
    pub fn square_at(&self, point: Point) -> Option<SquareId> {
        self.state
            .squares
            .iter()
            .rev()
            .find(|s| s.contains(point))
            .map(|s| s.id)
    }

    pub fn tap(&mut self, point: Point) -> bool {
        if !self.state.active {
            return false;
        }

        match self.square_at(point) {
            Some(id) => {
                debug!("tap hit {:?}", id);
                self.remove_square(id)
            }
            None => false,
        }
    }
}
