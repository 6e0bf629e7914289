use std::{io, path::PathBuf};

use anyhow::Context as _;
use raidsplit_engine::{
    Context, GroupConstraints, MutationWeights, Roster, RosterIndex, SearchLimits, TokenSlotSet,
};
use raidsplit_evolution::{Evolution, EvolutionParams, ModelKind};
use raidsplit_strategy::StrategyKind;

use crate::{printer, report::AssignmentReport, stop_key};

const DEFAULTS: GroupConstraints = GroupConstraints::DEFAULT;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ModelArg {
    /// Elitism plus mutated clones of tournament winners
    #[default]
    Generational,
    /// Every individual is replaced by its mutated clone
    MutationOnly,
    /// Mutated clones only replace parents they beat
    MutationOnlyStrict,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Generational => Self::Generational,
            ModelArg::MutationOnly => Self::MutationOnly,
            ModelArg::MutationOnlyStrict => Self::MutationOnlyStrict,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ConstraintsArg {
    /// Minimum group size
    #[arg(long, default_value_t = DEFAULTS.min_group_size)]
    min_size: usize,
    /// Maximum group size
    #[arg(long, default_value_t = DEFAULTS.max_group_size)]
    size: usize,
    /// Number of tanks in every group
    #[arg(long, default_value_t = DEFAULTS.required_tanks)]
    tanks: usize,
    /// Minimum number of groups
    #[arg(long, default_value_t = DEFAULTS.min_group_count)]
    min: usize,
    /// Maximum number of groups
    #[arg(long, default_value_t = DEFAULTS.max_group_count)]
    max: usize,
    /// Minimum healers / group size ratio
    #[arg(long, default_value_t = DEFAULTS.healer_min_ratio)]
    healer_min: f64,
    /// Maximum healers / group size ratio
    #[arg(long, default_value_t = DEFAULTS.healer_max_ratio)]
    healer_max: f64,
}

impl ConstraintsArg {
    fn to_constraints(&self) -> GroupConstraints {
        GroupConstraints {
            min_group_size: self.min_size,
            max_group_size: self.size,
            required_tanks: self.tanks,
            healer_min_ratio: self.healer_min,
            healer_max_ratio: self.healer_max,
            min_group_count: self.min,
            max_group_count: self.max,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct OptimizeArg {
    /// Roster CSV file: player, role, character, class, main[, token slots]
    roster: PathBuf,
    /// Loot balancing strategy (armor or token)
    #[arg(long, default_value = "armor")]
    strategy: StrategyKind,
    /// Token slots balanced by the token strategy, e.g. `head/legs`
    #[arg(long)]
    token_slots: Option<TokenSlotSet>,
    #[command(flatten)]
    constraints: ConstraintsArg,
    /// Number of populations evolved in parallel
    #[arg(long, default_value_t = 12)]
    npops: usize,
    /// Individuals per population
    #[arg(long, default_value_t = 3000)]
    popsize: usize,
    #[arg(long, default_value_t = 2000)]
    generations: usize,
    /// Evolution model
    #[arg(long, value_enum, default_value_t)]
    model: ModelArg,
    /// Random seed; drawn at random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Draw weight of the group-count shrinking operator
    #[arg(long, default_value_t = 0)]
    resize_weight: u32,
    /// Skip re-checking every offspring against the constraints
    #[arg(long)]
    no_check: bool,
    /// Output file path for the JSON report
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &OptimizeArg) -> anyhow::Result<()> {
    let roster = Roster::from_path(&arg.roster)
        .with_context(|| format!("Failed to load roster: {}", arg.roster.display()))?;
    log::info!(
        "Loaded {} characters of {} players",
        roster.len(),
        roster.player_count()
    );

    let constraints = arg
        .constraints
        .to_constraints()
        .tightened(&RosterIndex::new(&roster))
        .context("Invalid group constraints")?;
    let weights = MutationWeights {
        resize: arg.resize_weight,
        ..MutationWeights::default()
    };
    let ctx = Context::new(roster, constraints, SearchLimits::default())
        .context("Invalid group constraints")?
        .with_mutation_weights(weights);

    let token_slots = arg.token_slots.unwrap_or_default();
    let strategy = arg.strategy.build(&ctx, token_slots);

    let seed = arg.seed.unwrap_or_else(rand::random);
    let params = EvolutionParams {
        model: arg.model.into(),
        seed,
        check_viability: !arg.no_check,
        ..EvolutionParams::new(arg.npops, arg.popsize, arg.generations)
    };
    log::info!(
        "Evolving {} populations of {} for {} generations ({} model, {} strategy, seed {seed})",
        params.population_count,
        params.population_size,
        params.generations,
        params.model,
        strategy.name()
    );

    let evolution = Evolution::new(&ctx, strategy.as_ref(), params);
    let result = stop_key::run_stoppable(&evolution)?;
    log::info!(
        "Evolution {} after {} generations in {:.1}s",
        result.stop_reason,
        result.generations,
        result.elapsed.as_secs_f64()
    );
    let best = result
        .best()
        .context("No individual survived the evolution")?;

    printer::print_assignment(
        &mut io::stderr().lock(),
        &ctx,
        best.genome(),
        strategy.as_ref(),
    )
    .context("Failed to print the assignment")?;

    let report = AssignmentReport::new(&ctx, arg.strategy, token_slots, params, &result, best);
    report.save(arg.output.as_deref())?;
    if let Some(path) = &arg.output {
        eprintln!("Report saved to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum as _;

    use super::*;

    #[test]
    fn test_model_arg_maps_to_model_kind() {
        for arg in ModelArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_owned();
            assert_eq!(ModelKind::from(*arg).to_string(), name);
        }
        assert_eq!(ModelKind::from(ModelArg::default()), ModelKind::default());
    }
}
