use {
    crate::*,
    nom::{
        character::complete::line_ending,
        combinator::{all_consuming, map_res, opt},
        multi::many0,
        sequence::terminated,
        Err, IResult,
    },
    rayon::prelude::*,
    std::time::Instant,
};

/// The scenarios of one input, in line order
///
/// Each scenario's search is fully independent, so batches fan out across `rayon` workers and
/// only the per-scenario scalars are collected.
#[derive(Debug, PartialEq)]
pub struct ScenarioList(Vec<Scenario>);

impl ScenarioList {
    #[inline]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.0
    }

    /// Runs the engine once per scenario, up to `cutoff` scenarios, at the given horizon
    ///
    /// Any scenario's search error aborts the batch; there's no partial result.
    pub fn best_per_scenario(
        &self,
        horizon: u16,
        cutoff: usize,
        verbose: bool,
    ) -> Result<Vec<u16>, SearchError> {
        self.0
            .par_iter()
            .take(cutoff)
            .map(|scenario| {
                let start: Instant = Instant::now();
                let best: u16 = best_target(scenario, horizon)?;

                if verbose {
                    println!(
                        "Scenario {} finished in {}ms",
                        scenario.id(),
                        start.elapsed().as_millis()
                    );
                }

                Ok(best)
            })
            .collect()
    }

    /// First report variant: the sum of `scenario_id * best` over per-scenario results
    pub fn weighted_sum(&self, bests: &[u16]) -> u64 {
        self.0
            .iter()
            .zip(bests.iter())
            .map(|(scenario, best)| u64::from(scenario.id()) * u64::from(*best))
            .sum()
    }

    /// Second report variant: the product of per-scenario results
    pub fn product(bests: &[u16]) -> u64 {
        bests.iter().copied().map(u64::from).product()
    }
}

impl Parse for ScenarioList {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map_res(
            many0(terminated(Scenario::parse, opt(line_ending))),
            |scenarios: Vec<Scenario>| -> Result<Self, ScenarioError> {
                for (index, scenario) in scenarios.iter().enumerate() {
                    let expected: u16 = index as u16 + 1_u16;

                    if scenario.id() != expected {
                        return Err(ScenarioError::NonConsecutiveId {
                            expected,
                            actual: scenario.id(),
                        });
                    }
                }

                Ok(Self(scenarios))
            },
        )(input)
    }
}

impl<'i> TryFrom<&'i str> for ScenarioList {
    type Error = Err<nom::error::Error<&'i str>>;

    /// Converts a whole input into a scenario list
    ///
    /// A line the scenario parser can't consume fails the conversion outright; a list truncated
    /// at the first bad line would silently feed the reports a prefix of the input.
    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(all_consuming(Self::parse)(input)?.1)
    }
}
