use crate::grid::{Cell, Grid, GridView};
use crate::kernel::{count, KernelCache};
use crate::sampler::FieldSampler;

/// The two composable update rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Tree,
    Life,
}

/// Tunable rule parameters. Each has a declared range; writes clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    SpreadChance,
    SpontaneousChance,
    SpreadRadius,
    ConversionChance,
    SurvivalChance,
}

impl Param {
    pub fn range(self) -> (f64, f64) {
        match self {
            Param::SpreadChance
            | Param::SpontaneousChance
            | Param::ConversionChance
            | Param::SurvivalChance => (0.0, 1.0),
            Param::SpreadRadius => (1.0, 10.0),
        }
    }
}

/// Tree growth/spread rule parameters.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    pub enabled: bool,
    /// Chance per tick that an empty cell near a tree sprouts.
    pub spread_chance: f64,
    /// Chance per tick that any empty cell sprouts spontaneously.
    pub spontaneous_chance: f64,
    /// Neighborhood radius for spread.
    pub spread_radius: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spread_chance: 0.02,
            spontaneous_chance: 0.0001,
            spread_radius: 2,
        }
    }
}

/// Game-of-Life rule parameters.
#[derive(Debug, Clone)]
pub struct LifeConfig {
    pub enabled: bool,
    /// Chance that a tree touched by a live cell converts.
    pub conversion_chance: f64,
    /// Failure gate: chance a should-be-alive candidate actually survives.
    pub survival_chance: f64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            conversion_chance: 0.5,
            survival_chance: 0.95,
        }
    }
}

/// Full rule configuration, read once per tick. Mutation goes through
/// `set`/`toggle` between ticks, so a tick never sees a half-written value.
#[derive(Debug, Clone, Default)]
pub struct RuleConfig {
    pub tree: TreeConfig,
    pub life: LifeConfig,
}

impl RuleConfig {
    /// Write a parameter, clamped to its declared range.
    pub fn set(&mut self, param: Param, value: f64) {
        let (lo, hi) = param.range();
        let v = value.clamp(lo, hi);
        match param {
            Param::SpreadChance => self.tree.spread_chance = v,
            Param::SpontaneousChance => self.tree.spontaneous_chance = v,
            Param::SpreadRadius => self.tree.spread_radius = v.round() as u32,
            Param::ConversionChance => self.life.conversion_chance = v,
            Param::SurvivalChance => self.life.survival_chance = v,
        }
    }

    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::SpreadChance => self.tree.spread_chance,
            Param::SpontaneousChance => self.tree.spontaneous_chance,
            Param::SpreadRadius => self.tree.spread_radius as f64,
            Param::ConversionChance => self.life.conversion_chance,
            Param::SurvivalChance => self.life.survival_chance,
        }
    }

    pub fn enabled(&self, rule: RuleKind) -> bool {
        match rule {
            RuleKind::Tree => self.tree.enabled,
            RuleKind::Life => self.life.enabled,
        }
    }

    /// Flip a rule's enabled flag. Never touches grid state.
    pub fn toggle(&mut self, rule: RuleKind) {
        match rule {
            RuleKind::Tree => self.tree.enabled = !self.tree.enabled,
            RuleKind::Life => self.life.enabled = !self.life.enabled,
        }
    }
}

/// Commands the presentation layer can issue. Dispatch is an exhaustive
/// match, so there is no string-keyed lookup to typo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    ToggleRule(RuleKind),
    SetParam(Param, f64),
    Randomize(f64),
    Clear,
}

/// The simulation engine: owns the grid, the kernel cache, the sampler and
/// the rule configuration, and advances everything one tick at a time.
pub struct Simulation {
    grid: Grid,
    kernels: KernelCache,
    sampler: FieldSampler,
    pub config: RuleConfig,
    generation: u64,
}

impl Simulation {
    pub fn new(width: u32, height: u32, sampler: FieldSampler) -> Self {
        Self {
            grid: Grid::new(width, height),
            kernels: KernelCache::new(),
            sampler,
            config: RuleConfig::default(),
            generation: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width
    }

    pub fn height(&self) -> u32 {
        self.grid.height
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Read-only view of the live grid for rendering and inspection.
    pub fn snapshot(&self) -> GridView<'_> {
        self.grid.view()
    }

    pub fn population(&self, state: Cell) -> u64 {
        self.grid.population(state)
    }

    /// Advance one tick: tree rule first, then Game-of-Life. Trees must be
    /// placed before Life gets a chance to consume them.
    pub fn tick(&mut self) {
        if self.config.tree.enabled {
            self.tree_step();
        }
        if self.config.life.enabled {
            self.life_step();
        }
        self.generation += 1;
    }

    /// Dispatch a presentation-layer command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::ToggleRule(rule) => self.config.toggle(rule),
            Command::SetParam(param, value) => self.config.set(param, value),
            Command::Randomize(density) => self.randomize(density),
            Command::Clear => self.clear(),
        }
    }

    /// Brush edit: square block of side `2*radius + 1`, clamped to bounds.
    pub fn edit(&mut self, row: i32, col: i32, radius: u32, cell: Cell) {
        self.grid.brush(row, col, radius, cell);
    }

    /// Refill the grid: Alive with probability `density`, else Empty.
    pub fn randomize(&mut self, density: f64) {
        let density = density.clamp(0.0, 1.0);
        self.grid.randomize(density, self.sampler.rng());
        self.generation = 0;
    }

    pub fn clear(&mut self) {
        self.grid.fill(Cell::Empty);
        self.generation = 0;
    }

    // ── Tree rule ───────────────────────────────────────────────────────

    /// Spontaneous generation, then spread. Both stages write Tree into
    /// empty cells of the live buffer in place; spread reads a count map
    /// frozen before it starts writing, so traversal order cannot matter.
    fn tree_step(&mut self) {
        let len = self.grid.view().cells().len();

        let spontaneous = self.config.tree.spontaneous_chance;
        if spontaneous > 0.0 {
            let field = self.sampler.field(len);
            let cells = self.grid.live_mut();
            for (cell, &draw) in cells.iter_mut().zip(field.iter()) {
                if *cell == Cell::Empty && (draw as f64) < spontaneous {
                    *cell = Cell::Tree;
                }
            }
        }

        let spread = self.config.tree.spread_chance;
        if spread > 0.0 && self.grid.population(Cell::Tree) > 0 {
            let kernel = self.kernels.get(self.config.tree.spread_radius);
            let counts = count(self.grid.view(), kernel, |c| c == Cell::Tree);
            let field = self.sampler.field(len);
            let cells = self.grid.live_mut();
            for i in 0..len {
                if cells[i] == Cell::Empty && counts[i] >= 1 && (field[i] as f64) < spread {
                    cells[i] = Cell::Tree;
                }
            }
        }
    }

    // ── Game-of-Life rule ───────────────────────────────────────────────

    fn life_step(&mut self) {
        if self.grid.population(Cell::Alive) == 0 {
            self.bootstrap();
            return;
        }

        let len = self.grid.view().cells().len();
        let conversion = self.config.life.conversion_chance;
        let survival = self.config.life.survival_chance;

        let kernel = self.kernels.get(1);
        let counts = count(self.grid.view(), kernel, |c| c == Cell::Alive);
        let conversion_field = self.sampler.field(len);
        let gate_field = self.sampler.field(len);

        let (live, scratch) = self.grid.split();
        let cells = live.cells();
        for i in 0..len {
            let n = counts[i];
            let candidate = match cells[i] {
                Cell::Alive => n == 2 || n == 3,
                Cell::Empty => n == 3,
                Cell::Tree => n >= 1 && (conversion_field[i] as f64) < conversion,
            };
            scratch[i] = if candidate {
                // One shared Bernoulli gate per candidate, regardless of
                // whether it came from survival, birth or conversion.
                if (gate_field[i] as f64) < survival {
                    Cell::Alive
                } else {
                    Cell::Empty
                }
            } else if cells[i] == Cell::Tree {
                Cell::Tree
            } else {
                Cell::Empty
            };
        }
        self.grid.swap();
    }

    /// Reseed a dead grid: the first 2x2 block of empty cells, scanning
    /// row-major, is set alive directly. The rest of the rule body is
    /// skipped for this tick.
    fn bootstrap(&mut self) {
        let h = self.grid.height;
        let w = self.grid.width;
        for row in 0..h.saturating_sub(1) {
            for col in 0..w.saturating_sub(1) {
                let empty = self.grid.get(row, col) == Cell::Empty
                    && self.grid.get(row, col + 1) == Cell::Empty
                    && self.grid.get(row + 1, col) == Cell::Empty
                    && self.grid.get(row + 1, col + 1) == Cell::Empty;
                if empty {
                    self.grid.set(row, col, Cell::Alive);
                    self.grid.set(row, col + 1, Cell::Alive);
                    self.grid.set(row + 1, col, Cell::Alive);
                    self.grid.set(row + 1, col + 1, Cell::Alive);
                    return;
                }
            }
        }
    }
}
