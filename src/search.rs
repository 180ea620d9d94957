use {
    crate::*,
    static_assertions::const_assert,
    std::{
        collections::{HashSet, VecDeque},
        mem::transmute,
        ops::{Index, IndexMut},
    },
    strum::{EnumCount, IntoEnumIterator},
};

/// Four `u16` lanes, one per resource kind, packed into 8 aligned bytes
///
/// Both stocks and rates are quads, so accruing one step of production is a single `u64`
/// addition.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(align(8))]
pub struct Quad([u16; ResourceKind::COUNT]);

const_assert!(std::mem::size_of::<Quad>() == std::mem::size_of::<u64>());

impl Quad {
    #[inline(always)]
    const fn as_u64(self) -> u64 {
        // SAFETY: `Quad` has `align(8)`, and it's 8 bytes
        unsafe { transmute(self) }
    }

    #[inline(always)]
    const fn from_u64(value: u64) -> Self {
        // SAFETY: `Quad` has `align(8)`, and it's 8 bytes
        unsafe { transmute(value) }
    }
}

impl Index<ResourceKind> for Quad {
    type Output = u16;

    fn index(&self, kind: ResourceKind) -> &u16 {
        &self.0[kind as usize]
    }
}

impl IndexMut<ResourceKind> for Quad {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut u16 {
        &mut self.0[kind as usize]
    }
}

/// A point-in-time snapshot during search: accumulated-but-unspent stocks, per-step production
/// rates, and the time steps left before the horizon
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct State {
    stocks: Quad,
    rates: Quad,
    remaining: u16,
}

impl State {
    fn initial(horizon: u16) -> Self {
        let mut rates: Quad = Quad::default();

        rates[ResourceKind::Primary] = 1_u16;

        Self {
            stocks: Quad::default(),
            rates,
            remaining: horizon,
        }
    }

    /// Advances one time step without building anything
    ///
    /// Stocks stay low enough under capping that no lane can carry into its neighbor, so the
    /// whole accrual is one `u64` add.
    #[inline(always)]
    const fn step(self) -> Self {
        Self {
            stocks: Quad::from_u64(self.stocks.as_u64() + self.rates.as_u64()),
            rates: self.rates,
            remaining: self.remaining - 1_u16,
        }
    }

    fn can_afford(&self, unit: ResourceKind, recipe: Recipe) -> bool {
        self.stocks[ResourceKind::Primary] >= recipe.primary
            && unit
                .chained_input()
                .map_or(true, |input| self.stocks[input] >= recipe.extra)
    }

    /// Pays a recipe, accrues this step's production at the old rates, then brings the new unit
    /// online for the next step
    fn build(mut self, unit: ResourceKind, recipe: Recipe) -> Self {
        self.stocks[ResourceKind::Primary] -= recipe.primary;

        if let Some(input) = unit.chained_input() {
            self.stocks[input] -= recipe.extra;
        }

        let mut next: Self = self.step();

        next.rates[unit] += 1_u16;

        next
    }
}

#[derive(Debug, PartialEq)]
pub enum SearchError {
    /// The visited set outgrew its element bound before the frontier emptied
    VisitedLimitExceeded { limit: usize },
}

/// Default bound on visited-set growth
///
/// Realistic horizons (at most around 40 steps) stay well below this under canonicalization; an
/// engine that reaches it surfaces the overflow instead of degrading into swap.
pub const DEFAULT_VISITED_LIMIT: usize = 1_usize << 26_u32;

/// Breadth-first exploration of one scenario's state space up to a fixed horizon
///
/// Returns the maximum `Target` stock observed across all visited states. Canonicalization and
/// memoization are what make realistic horizons tractable; they can be switched off
/// independently, which never changes the result, only the cost (the cross-check tests rely on
/// this).
pub struct Explorer<'s> {
    scenario: &'s Scenario,
    horizon: u16,
    visited_limit: usize,
    canonicalize: bool,
    memoize: bool,
}

impl<'s> Explorer<'s> {
    pub fn new(scenario: &'s Scenario, horizon: u16) -> Self {
        Self {
            scenario,
            horizon,
            visited_limit: DEFAULT_VISITED_LIMIT,
            canonicalize: true,
            memoize: true,
        }
    }

    /// Disables stock and rate capping, leaving a plain exhaustive traversal. Only tractable for
    /// tiny horizons.
    pub fn without_canonicalization(mut self) -> Self {
        self.canonicalize = false;

        self
    }

    /// Disables the visited set, so identical states are re-expanded
    pub fn without_memoization(mut self) -> Self {
        self.memoize = false;

        self
    }

    pub fn with_visited_limit(mut self, visited_limit: usize) -> Self {
        self.visited_limit = visited_limit;

        self
    }

    /// Clamps a non-terminal state onto its canonical representative
    ///
    /// Rates of non-target kinds are capped at the max single-step spend of that resource: surplus
    /// production above that can never be spent in one step by any recipe. Stocks are then capped
    /// at `remaining * spend_cap - rate * (remaining - 1)`, the most that could still be consumed
    /// before the horizon even with zero further production. Neither clamp touches the `Target`
    /// lane, so the running best is unaffected.
    fn canonicalize(&self, mut state: State) -> State {
        let remaining: u32 = u32::from(state.remaining);

        for resource in ResourceKind::CAPPED {
            let spend_cap: u16 = self.scenario.spend_cap(resource);
            let rate: u16 = state.rates[resource].min(spend_cap);

            // `rate <= spend_cap`, so the bound can't underflow, but keep the subtraction
            // saturating in case the cap formula is ever loosened
            let stock_bound: u32 = (remaining * u32::from(spend_cap))
                .saturating_sub(u32::from(rate) * (remaining - 1_u32));

            state.rates[resource] = rate;
            state.stocks[resource] = u32::from(state.stocks[resource]).min(stock_bound) as u16;
        }

        state
    }

    /// Processes the frontier to exhaustion and returns the best attainable `Target` stock
    pub fn run(&self) -> Result<u16, SearchError> {
        let mut best: u16 = 0_u16;
        let mut frontier: VecDeque<State> = VecDeque::new();
        let mut visited: HashSet<State> = HashSet::new();

        frontier.push_back(State::initial(self.horizon));

        while let Some(state) = frontier.pop_front() {
            best = best.max(state.stocks[ResourceKind::Target]);

            if state.remaining == 0_u16 {
                continue;
            }

            let state: State = if self.canonicalize {
                self.canonicalize(state)
            } else {
                state
            };

            if self.memoize {
                if !visited.insert(state) {
                    continue;
                }

                if visited.len() > self.visited_limit {
                    return Err(SearchError::VisitedLimitExceeded {
                        limit: self.visited_limit,
                    });
                }
            }

            frontier.push_back(state.step());

            for unit in ResourceKind::iter() {
                let recipe: Recipe = self.scenario.recipe(unit);

                if state.can_afford(unit, recipe) {
                    frontier.push_back(state.build(unit, recipe));
                }
            }
        }

        Ok(best)
    }
}

/// Runs the engine with full canonicalization and memoization
pub fn best_target(scenario: &Scenario, horizon: u16) -> Result<u16, SearchError> {
    Explorer::new(scenario, horizon).run()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::scenario::tests::{scenario_a, scenario_b},
    };

    #[test]
    fn test_scenario_a_horizon_24() {
        assert_eq!(best_target(&scenario_a(), 24_u16), Ok(9_u16));
    }

    #[test]
    fn test_scenario_b_horizon_24() {
        assert_eq!(best_target(&scenario_b(), 24_u16), Ok(12_u16));
    }

    #[test]
    fn test_scenario_a_horizon_32() {
        assert_eq!(best_target(&scenario_a(), 32_u16), Ok(56_u16));
    }

    #[test]
    fn test_scenario_b_horizon_32() {
        assert_eq!(best_target(&scenario_b(), 32_u16), Ok(62_u16));
    }

    #[test]
    fn test_degenerate_horizons() {
        for scenario in [scenario_a(), scenario_b()] {
            assert_eq!(best_target(&scenario, 0_u16), Ok(0_u16));
            assert_eq!(best_target(&scenario, 1_u16), Ok(0_u16));
        }
    }

    #[test]
    fn test_monotonic_in_horizon() {
        for scenario in [scenario_a(), scenario_b()] {
            let mut prev: u16 = 0_u16;

            for horizon in 0_u16..=14_u16 {
                let best: u16 = best_target(&scenario, horizon).unwrap();

                assert!(
                    best >= prev,
                    "best dropped from {prev} to {best} at horizon {horizon}"
                );

                prev = best;
            }
        }
    }

    #[test]
    fn test_canonicalization_preserves_results() {
        for scenario in [scenario_a(), scenario_b()] {
            for horizon in 0_u16..=6_u16 {
                assert_eq!(
                    Explorer::new(&scenario, horizon)
                        .without_canonicalization()
                        .without_memoization()
                        .run(),
                    best_target(&scenario, horizon)
                );
            }
        }
    }

    #[test]
    fn test_memoization_preserves_results() {
        for scenario in [scenario_a(), scenario_b()] {
            assert_eq!(
                Explorer::new(&scenario, 10_u16).without_memoization().run(),
                best_target(&scenario, 10_u16)
            );
        }
    }

    #[test]
    fn test_visited_limit_overflow() {
        assert_eq!(
            Explorer::new(&scenario_a(), 24_u16)
                .with_visited_limit(100_usize)
                .run(),
            Err(SearchError::VisitedLimitExceeded { limit: 100_usize })
        );
    }
}
