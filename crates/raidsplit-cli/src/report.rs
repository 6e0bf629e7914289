use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use raidsplit_engine::{Context, Genome, GroupConstraints, MutationWeights, Roster, TokenSlotSet};
use raidsplit_evolution::{EvolutionParams, EvolutionResult, genetic::Individual};
use raidsplit_strategy::StrategyKind;
use serde::{Deserialize, Serialize};

/// Saved result of an optimisation run.
///
/// `genome` is authoritative; `groups` and `bench` repeat it with character
/// names for readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AssignmentReport {
    pub optimized_at: DateTime<Utc>,
    pub strategy: String,
    pub token_slots: String,
    pub constraints: GroupConstraints,
    pub mutation_weights: MutationWeights,
    pub evolution: EvolutionParams,
    pub generations_run: usize,
    pub fitness: f64,
    pub genome: Genome,
    pub groups: Vec<Vec<String>>,
    pub bench: Vec<String>,
}

impl AssignmentReport {
    pub fn new(
        ctx: &Context,
        strategy: StrategyKind,
        token_slots: TokenSlotSet,
        evolution: EvolutionParams,
        result: &EvolutionResult,
        best: &Individual,
    ) -> Self {
        let genome = best.genome();
        let roster = ctx.roster();
        Self {
            optimized_at: Utc::now(),
            strategy: strategy.to_string(),
            token_slots: token_slots.to_string(),
            constraints: *ctx.constraints(),
            mutation_weights: *ctx.mutation_weights(),
            evolution,
            generations_run: result.generations,
            fitness: best.fitness(),
            genome: genome.clone(),
            groups: (0..genome.group_count())
                .map(|group| names(roster, genome.members(group)))
                .collect(),
            bench: names(roster, genome.bench()),
        }
    }

    /// Writes the report as pretty JSON to `path`, or to stdout when there is none.
    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<()> {
        match path {
            Some(path) => {
                let file = File::create(path).with_context(|| {
                    format!("Failed to create assignment report: {}", path.display())
                })?;
                self.write_json(BufWriter::new(file)).with_context(|| {
                    format!("Failed to write assignment report: {}", path.display())
                })
            }
            None => self
                .write_json(io::stdout().lock())
                .context("Failed to write assignment report to stdout"),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open assignment report: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse assignment report: {}", path.display()))
    }

    fn write_json<W>(&self, mut writer: W) -> anyhow::Result<()>
    where
        W: Write,
    {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

fn names<I>(roster: &Roster, members: I) -> Vec<String>
where
    I: IntoIterator<Item = usize>,
{
    members
        .into_iter()
        .map(|cid| roster.character(cid).name.clone())
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use raidsplit_engine::{RosterRecord, SearchLimits};
    use raidsplit_evolution::StopReason;

    use super::*;

    /// A viable one-group report over three characters, with its context.
    pub(crate) fn sample_report() -> (Context, AssignmentReport) {
        let roster = Roster::from_records(vec![
            RosterRecord::new("alice", "tank", "Alitank", "warrior", true),
            RosterRecord::new("alice", "ranged", "Alimage", "mage", false),
            RosterRecord::new("bob", "healer", "Bobheal", "priest", true),
        ])
        .unwrap();
        let constraints = GroupConstraints {
            min_group_size: 2,
            max_group_size: 2,
            required_tanks: 1,
            healer_min_ratio: 0.5,
            healer_max_ratio: 0.5,
            min_group_count: 1,
            max_group_count: 1,
        };
        let ctx = Context::new(roster, constraints, SearchLimits::default()).unwrap();
        let genome = Genome::from_distribution(1, vec![Some(0), None, Some(0)]);

        let strategy = StrategyKind::Armor.build(&ctx, TokenSlotSet::EMPTY);
        let best = Individual::evaluate(genome, &ctx, strategy.as_ref());
        let result = EvolutionResult {
            hall_of_fame: vec![best.clone()],
            generations: 4,
            stop_reason: StopReason::Completed,
            elapsed: Duration::ZERO,
        };
        let params = EvolutionParams::new(1, 1, 4);
        let report = AssignmentReport::new(
            &ctx,
            StrategyKind::Armor,
            TokenSlotSet::EMPTY,
            params,
            &result,
            &best,
        );
        (ctx, report)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::{testing::sample_report, *};

    #[test]
    fn test_report_names_groups() {
        let (ctx, report) = sample_report();

        assert!(report.genome.is_viable(&ctx));
        assert_eq!(report.groups, [["Alitank", "Bobheal"]]);
        assert_eq!(report.bench, ["Alimage"]);
        assert_eq!(report.strategy, "armor");
        assert_eq!(report.generations_run, 4);
    }

    #[test]
    fn test_save_and_load() {
        let (_, report) = sample_report();
        let path = env::temp_dir().join(format!("raidsplit-report-{}.json", process::id()));

        report.save(Some(&path)).unwrap();
        let loaded = AssignmentReport::load(&path);
        fs::remove_file(&path).unwrap();

        let loaded = loaded.unwrap();
        assert_eq!(loaded.genome, report.genome);
        assert_eq!(loaded.constraints, report.constraints);
        assert_eq!(loaded.evolution, report.evolution);
        assert_eq!(loaded.groups, report.groups);
    }

    #[test]
    fn test_load_names_the_report() {
        let path = env::temp_dir().join("raidsplit-missing-report.json");
        let err = AssignmentReport::load(&path).unwrap_err();
        assert!(err.to_string().contains("assignment report"), "{err}");
    }
}
