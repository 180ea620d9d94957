use {
    crate::*,
    nom::{
        bytes::complete::tag,
        combinator::map_res,
        sequence::{delimited, tuple},
        Err, IResult,
    },
    static_assertions::const_assert,
    strum::{EnumCount, EnumIter, IntoEnumIterator},
};

/// One of the four countable resource kinds, in dependency order
///
/// Each kind doubles as the kind of the producer unit that generates it: a `Primary` unit costs
/// only `Primary` stock, a `Secondary` unit costs only `Primary` stock, a `Tertiary` unit costs
/// `Primary` and `Secondary` stock, and a `Target` unit costs `Primary` and `Tertiary` stock.
/// `Target` stock is the optimization objective.
#[derive(Clone, Copy, Debug, EnumCount, EnumIter, PartialEq)]
#[repr(u8)]
pub enum ResourceKind {
    Primary,
    Secondary,
    Tertiary,
    Target,
}

// The packed search state and the capping tables both assume exactly four kinds
const_assert!(ResourceKind::COUNT == 4_usize);

impl ResourceKind {
    /// The non-target kinds, whose stocks and rates the search canonicalizes
    pub const CAPPED: [Self; Self::COUNT - 1_usize] =
        [Self::Primary, Self::Secondary, Self::Tertiary];

    /// The resource the chained cost component of this unit kind draws from, if any
    #[inline]
    pub const fn chained_input(self) -> Option<Self> {
        match self {
            Self::Primary | Self::Secondary => None,
            Self::Tertiary => Some(Self::Secondary),
            Self::Target => Some(Self::Tertiary),
        }
    }
}

/// Cost of constructing one producer unit
///
/// `primary` is the `Primary`-stock component present in every recipe. `extra` is the chained
/// component; the stock it draws from is implied by the unit kind (see
/// [`ResourceKind::chained_input`]), and it is zero for the two kinds with no chained input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Recipe {
    pub primary: u16,
    pub extra: u16,
}

impl Recipe {
    pub const fn new(primary: u16, extra: u16) -> Self {
        Self { primary, extra }
    }
}

#[derive(Debug, PartialEq)]
pub enum ScenarioError {
    /// A recipe's cost component is zero where the dependency order requires a positive cost
    ZeroCost { unit: ResourceKind },

    /// A scenario line did not contain exactly the six expected cost integers
    WrongCostCount { actual: usize },

    /// Scenario ids must count up from 1 in input order
    NonConsecutiveId { expected: u16, actual: u16 },
}

/// One immutable problem instance: an id, a cost table, and the precomputed per-resource spend
/// caps the pruning policy keys off of
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scenario {
    id: u16,
    recipes: [Recipe; ResourceKind::COUNT],
    spend_caps: [u16; ResourceKind::COUNT - 1_usize],
}

impl Scenario {
    /// Validates a cost table and precomputes the spend caps
    ///
    /// Every recipe must have a positive `primary` component, and the two chained recipes must
    /// have a positive `extra` component: a free unit would make the production-rate state space
    /// unbounded, so it's rejected up front rather than looped on.
    pub fn try_new(id: u16, recipes: [Recipe; ResourceKind::COUNT]) -> Result<Self, ScenarioError> {
        use ResourceKind::*;

        for (unit, recipe) in ResourceKind::iter().zip(recipes) {
            if recipe.primary == 0_u16 || (unit.chained_input().is_some() && recipe.extra == 0_u16)
            {
                return Err(ScenarioError::ZeroCost { unit });
            }
        }

        // The max single-step spend of each non-target resource across all recipes that consume
        // it. `Primary` is consumed by all four recipes; `Secondary` and `Tertiary` each by one.
        let spend_caps: [u16; ResourceKind::COUNT - 1_usize] = [
            recipes
                .iter()
                .map(|recipe| recipe.primary)
                .max()
                .unwrap_or_default(),
            recipes[Tertiary as usize].extra,
            recipes[Target as usize].extra,
        ];

        Ok(Self {
            id,
            recipes,
            spend_caps,
        })
    }

    /// Builds a scenario from the six cost integers of one input line, in line order:
    /// primary-unit cost, secondary-unit cost, then the two components of each chained recipe
    pub fn try_from_id_and_costs(id: u16, costs: &[u16]) -> Result<Self, ScenarioError> {
        match *costs {
            [primary, secondary, tertiary_primary, tertiary_extra, target_primary, target_extra] => {
                Self::try_new(
                    id,
                    [
                        Recipe::new(primary, 0_u16),
                        Recipe::new(secondary, 0_u16),
                        Recipe::new(tertiary_primary, tertiary_extra),
                        Recipe::new(target_primary, target_extra),
                    ],
                )
            }
            _ => Err(ScenarioError::WrongCostCount {
                actual: costs.len(),
            }),
        }
    }

    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    #[inline]
    pub fn recipe(&self, unit: ResourceKind) -> Recipe {
        self.recipes[unit as usize]
    }

    /// Max single-step spend of a non-target resource; `Target` stock is never capped
    #[inline]
    pub fn spend_cap(&self, resource: ResourceKind) -> u16 {
        debug_assert!(resource != ResourceKind::Target);

        self.spend_caps[resource as usize]
    }
}

impl Parse for Scenario {
    /// Parses one scenario line
    ///
    /// Only the `Blueprint <id>:` header is matched structurally; the six costs are pulled out by
    /// integer position, so the flavor text between them doesn't matter.
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map_res(
            tuple((
                delimited(tag("Blueprint "), parse_uint::<u16>, tag(":")),
                line_uints::<u16>,
            )),
            |(id, costs)| Self::try_from_id_and_costs(id, &costs),
        )(input)
    }
}

impl<'i> TryFrom<&'i str> for Scenario {
    type Error = Err<nom::error::Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SCENARIO_A_STR: &str = "Blueprint 1: \
        Each ore robot costs 4 ore. \
        Each clay robot costs 2 ore. \
        Each obsidian robot costs 3 ore and 14 clay. \
        Each geode robot costs 2 ore and 7 obsidian.";

    pub(crate) fn scenario_a() -> Scenario {
        Scenario::try_new(
            1_u16,
            [
                Recipe::new(4_u16, 0_u16),
                Recipe::new(2_u16, 0_u16),
                Recipe::new(3_u16, 14_u16),
                Recipe::new(2_u16, 7_u16),
            ],
        )
        .unwrap()
    }

    pub(crate) fn scenario_b() -> Scenario {
        Scenario::try_new(
            2_u16,
            [
                Recipe::new(2_u16, 0_u16),
                Recipe::new(3_u16, 0_u16),
                Recipe::new(3_u16, 8_u16),
                Recipe::new(3_u16, 12_u16),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_scenario_try_from_str() {
        assert_eq!(SCENARIO_A_STR.try_into(), Ok(scenario_a()));
    }

    #[test]
    fn test_spend_caps() {
        use ResourceKind::*;

        let scenario: Scenario = scenario_a();

        assert_eq!(scenario.spend_cap(Primary), 4_u16);
        assert_eq!(scenario.spend_cap(Secondary), 14_u16);
        assert_eq!(scenario.spend_cap(Tertiary), 7_u16);
    }

    #[test]
    fn test_zero_cost_is_rejected() {
        use ResourceKind::*;

        assert_eq!(
            Scenario::try_new(
                1_u16,
                [
                    Recipe::new(4_u16, 0_u16),
                    Recipe::new(0_u16, 0_u16),
                    Recipe::new(3_u16, 14_u16),
                    Recipe::new(2_u16, 7_u16),
                ],
            ),
            Err(ScenarioError::ZeroCost { unit: Secondary })
        );
        assert_eq!(
            Scenario::try_new(
                1_u16,
                [
                    Recipe::new(4_u16, 0_u16),
                    Recipe::new(2_u16, 0_u16),
                    Recipe::new(3_u16, 14_u16),
                    Recipe::new(2_u16, 0_u16),
                ],
            ),
            Err(ScenarioError::ZeroCost { unit: Target })
        );
    }

    #[test]
    fn test_wrong_cost_count_is_rejected() {
        assert_eq!(
            Scenario::try_from_id_and_costs(1_u16, &[4_u16, 2_u16, 3_u16]),
            Err(ScenarioError::WrongCostCount { actual: 3_usize })
        );
        assert!(Scenario::try_from("Blueprint 1: 4 2 3 14 2 7 9").is_err());
    }
}
