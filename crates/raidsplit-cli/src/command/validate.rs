use std::path::PathBuf;

use anyhow::{Context as _, bail};
use raidsplit_engine::{Context, Roster, SearchLimits, Violation};

use crate::report::AssignmentReport;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ValidateArg {
    /// Roster CSV file the report was computed from
    roster: PathBuf,
    /// JSON report written by `optimize`
    report: PathBuf,
}

pub(crate) fn run(arg: &ValidateArg) -> anyhow::Result<()> {
    let report = AssignmentReport::load(&arg.report)?;
    let roster = Roster::from_path(&arg.roster)
        .with_context(|| format!("Failed to load roster: {}", arg.roster.display()))?;

    let ctx = report_context(roster, &report)?;
    match report.genome.check(&ctx) {
        Ok(()) => {
            println!("viable");
            Ok(())
        }
        Err(violation) => {
            println!("{}", describe(&ctx, violation));
            bail!("Assignment is not viable")
        }
    }
}

/// Rebuilds the context a report was computed in.
///
/// Fails when the report's genome does not match the roster length or has a
/// group count outside the report's own constraints.
fn report_context(roster: Roster, report: &AssignmentReport) -> anyhow::Result<Context> {
    let genome = &report.genome;
    if genome.distribution().len() != roster.len() {
        bail!(
            "Report assigns {} characters but the roster has {}",
            genome.distribution().len(),
            roster.len()
        );
    }

    let ctx = Context::new(roster, report.constraints, SearchLimits::default())
        .context("Invalid group constraints in report")?;
    let group_counts = ctx.constraints().group_counts();
    if !group_counts.contains(&genome.group_count()) {
        bail!(
            "Report has {} groups, outside the allowed range {}..={}",
            genome.group_count(),
            group_counts.start(),
            group_counts.end()
        );
    }
    Ok(ctx)
}

/// Names the character a violation points at, when there is one.
fn describe(ctx: &Context, violation: Violation) -> String {
    match violation {
        Violation::BenchedMain { cid } | Violation::GroupOutOfRange { cid, .. } => {
            format!("{violation} ({})", ctx.character(cid).name)
        }
        Violation::DuplicatePlayer { player, .. } => {
            format!("{violation} ({})", ctx.roster().player_name(player))
        }
        Violation::BadSize { .. }
        | Violation::BadTankCount { .. }
        | Violation::BadHealerRatio { .. } => violation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use raidsplit_engine::Genome;

    use super::*;
    use crate::report::testing::sample_report;

    #[test]
    fn test_viable_report() {
        let (ctx, report) = sample_report();
        let rebuilt = report_context(ctx.roster().clone(), &report).unwrap();
        assert_eq!(report.genome.check(&rebuilt), Ok(()));
    }

    #[test]
    fn test_reject_group_count_out_of_range() {
        let (ctx, mut report) = sample_report();
        report.genome = Genome::from_distribution(1_000_000, vec![Some(0), None, Some(0)]);

        let err = report_context(ctx.roster().clone(), &report).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Report has 1000000 groups, outside the allowed range 1..=1"
        );
    }

    #[test]
    fn test_reject_roster_mismatch() {
        let (ctx, mut report) = sample_report();
        report.genome = Genome::from_distribution(1, vec![Some(0), Some(0)]);

        let err = report_context(ctx.roster().clone(), &report).unwrap_err();
        assert!(err.to_string().contains("roster has 3"), "{err}");
    }

    #[test]
    fn test_describe_names_the_character() {
        let (ctx, _) = sample_report();
        let genome = Genome::from_distribution(1, vec![Some(0), None, None]);
        let violation = genome.check(&ctx).unwrap_err();
        assert!(describe(&ctx, violation).contains("Bobheal"));
    }
}
