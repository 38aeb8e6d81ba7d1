// SPDX-License-Identifier: GPL-3.0-or-later
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cinegrade_application::{
    explain, AppState, ReleaseCandidate, UpgradeOptions, Winner,
};
use cinegrade_config::load as load_config;
use cinegrade_domain::{ScoringResult, SizeContext};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "cinegrade",
    about = "Score, rank and compare media releases against quality profiles",
    version
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one release and explain the result
    Score(ScoreArgs),
    /// Rank several releases, best first
    Rank(RankArgs),
    /// Compare two releases head to head
    Compare(CompareArgs),
    /// Decide whether a candidate should replace an existing release
    Upgrade(UpgradeArgs),
    /// List the custom formats a release matches
    Formats(FormatsArgs),
    /// List available scoring profiles
    Profiles,
}

#[derive(Args, Debug)]
struct ProfileArg {
    /// Profile id (defaults to the configured default profile)
    #[arg(long, short)]
    profile: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Media {
    Movie,
    Tv,
}

#[derive(Args, Debug, Default)]
struct SizeArgs {
    /// File size, in bytes or with a KB/MB/GB/TB suffix
    #[arg(long, value_parser = parse_size)]
    size: Option<u64>,
    /// Media type used for size limits
    #[arg(long, value_enum)]
    media: Option<Media>,
    /// Treat the release as a season pack
    #[arg(long)]
    season_pack: bool,
    /// Number of episodes in the season pack
    #[arg(long)]
    episodes: Option<u32>,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    name: String,
    #[command(flatten)]
    profile: ProfileArg,
    #[command(flatten)]
    size: SizeArgs,
}

#[derive(Args, Debug)]
struct RankArgs {
    names: Vec<String>,
    /// Read release names from a file, one per line
    #[arg(long)]
    file: Option<PathBuf>,
    #[command(flatten)]
    profile: ProfileArg,
}

#[derive(Args, Debug)]
struct CompareArgs {
    a: String,
    b: String,
    #[command(flatten)]
    profile: ProfileArg,
}

#[derive(Args, Debug)]
struct UpgradeArgs {
    existing: String,
    candidate: String,
    #[command(flatten)]
    profile: ProfileArg,
    /// Required score improvement (defaults to the profile's upgrade delta)
    #[arg(long)]
    min_improvement: Option<i64>,
    /// Accept equal scores as upgrades
    #[arg(long)]
    sidegrade: bool,
    /// Upgrade even when the existing release meets the profile cutoff
    #[arg(long)]
    ignore_cutoff: bool,
}

#[derive(Args, Debug)]
struct FormatsArgs {
    name: String,
    /// Show every format with per-condition results
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.telemetry.log_level);

    let state = AppState::new(config)?;
    state.on_start();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli.command, &state, cli.json, &mut out)
}

fn init_tracing(default_level: &str) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn run(command: &Command, state: &AppState, json: bool, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Score(args) => {
            let profile = state.profile(args.profile.profile.as_deref())?;
            let candidate = candidate_with_size(&args.name, &args.size)?;
            let result = state.engine.score_candidate(&candidate, &profile);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
            } else {
                write!(out, "{}", explain(&result))?;
            }
        }
        Command::Rank(args) => {
            let profile = state.profile(args.profile.profile.as_deref())?;
            let names = rank_inputs(args)?;
            let candidates: Vec<ReleaseCandidate> =
                names.into_iter().map(ReleaseCandidate::from).collect();
            let ranked = state.engine.rank(&candidates, &profile);
            info!(target: "cli", profile = %profile.id, releases = ranked.len(), "ranked releases");
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&ranked)?)?;
            } else {
                for entry in &ranked {
                    writeln!(
                        out,
                        "{:>3}. {:>8}  {}{}",
                        entry.rank,
                        entry.result.total_score,
                        entry.result.release_name,
                        status_suffix(&entry.result)
                    )?;
                }
            }
        }
        Command::Compare(args) => {
            let profile = state.profile(args.profile.profile.as_deref())?;
            let comparison =
                state
                    .engine
                    .compare(&args.a.as_str().into(), &args.b.as_str().into(), &profile);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&comparison)?)?;
            } else {
                let winner = match comparison.winner {
                    Winner::A => format!("A ({})", args.a),
                    Winner::B => format!("B ({})", args.b),
                    Winner::Tie => "tie".to_string(),
                };
                writeln!(out, "Winner: {winner}")?;
                writeln!(
                    out,
                    "A: {:>8}  {}{}",
                    comparison.score_a.total_score,
                    args.a,
                    status_suffix(&comparison.score_a)
                )?;
                writeln!(
                    out,
                    "B: {:>8}  {}{}",
                    comparison.score_b.total_score,
                    args.b,
                    status_suffix(&comparison.score_b)
                )?;
                writeln!(out, "Delta: {}", comparison.delta)?;
            }
        }
        Command::Upgrade(args) => {
            let profile = state.profile(args.profile.profile.as_deref())?;
            let mut options = UpgradeOptions::from_profile(&profile);
            if let Some(minimum) = args.min_improvement {
                options.minimum_improvement = minimum;
            }
            options.allow_sidegrade = args.sidegrade;
            options.respect_cutoff = !args.ignore_cutoff;

            let decision = state.engine.is_upgrade(
                &args.existing.as_str().into(),
                &args.candidate.as_str().into(),
                &profile,
                &options,
            );
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&decision)?)?;
            } else {
                writeln!(
                    out,
                    "Upgrade: {} ({})",
                    if decision.is_upgrade { "yes" } else { "no" },
                    decision.reason
                )?;
                writeln!(out, "Improvement: {}", decision.improvement)?;
                writeln!(
                    out,
                    "Existing: {:>8}  {}",
                    decision.existing.total_score, args.existing
                )?;
                writeln!(
                    out,
                    "Candidate: {:>7}  {}",
                    decision.candidate.total_score, args.candidate
                )?;
            }
        }
        Command::Formats(args) => {
            if args.verbose {
                let attributes = state.engine.parse(&args.name);
                let matches = state.engine.inspect(&attributes);
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&matches)?)?;
                } else {
                    for format_match in &matches {
                        let mark = if format_match.matched { 'x' } else { ' ' };
                        writeln!(out, "[{mark}] {}", format_match.format.id)?;
                        for evaluation in &format_match.evaluations {
                            writeln!(
                                out,
                                "      {} {}{}{}",
                                if evaluation.matches { '+' } else { '-' },
                                evaluation.condition.name,
                                if evaluation.condition.required { "" } else { " (optional)" },
                                if evaluation.condition.negate { " (negated)" } else { "" },
                            )?;
                        }
                    }
                }
            } else {
                let ids = state.engine.matched_rule_ids(&args.name, None);
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&ids)?)?;
                } else {
                    for id in ids {
                        writeln!(out, "{id}")?;
                    }
                }
            }
        }
        Command::Profiles => {
            let profiles = state.profiles();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&profiles)?)?;
            } else {
                for profile in &profiles {
                    let cutoff = if profile.upgrade_until == i64::MAX {
                        "none".to_string()
                    } else {
                        profile.upgrade_until.to_string()
                    };
                    writeln!(
                        out,
                        "{:<20} {} (min {}, cutoff {})",
                        profile.id, profile.name, profile.min_score, cutoff
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn candidate_with_size(name: &str, size: &SizeArgs) -> Result<ReleaseCandidate> {
    let candidate = ReleaseCandidate::new(name);
    let Some(bytes) = size.size else {
        if size.media.is_some() || size.season_pack || size.episodes.is_some() {
            bail!("--media, --season-pack and --episodes require --size");
        }
        return Ok(candidate);
    };

    let context = match (size.media.unwrap_or(Media::Movie), size.season_pack) {
        (Media::Movie, false) => SizeContext::movie(),
        (Media::Movie, true) => bail!("--season-pack requires --media tv"),
        (Media::Tv, false) => SizeContext::episode(),
        (Media::Tv, true) => SizeContext::season_pack(size.episodes),
    };
    Ok(candidate.with_size(bytes, context))
}

fn rank_inputs(args: &RankArgs) -> Result<Vec<String>> {
    let mut names = args.names.clone();
    if let Some(path) = &args.file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading release list {}", path.display()))?;
        names.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }
    if names.is_empty() {
        bail!("no releases to rank; pass names or --file");
    }
    Ok(names)
}

fn status_suffix(result: &ScoringResult) -> &'static str {
    if result.is_banned {
        "  [banned]"
    } else if result.size_rejected {
        "  [size rejected]"
    } else if !result.meets_minimum {
        "  [below minimum]"
    } else {
        ""
    }
}

/// Parse `1234`, `700MB`, `1.5 GB` and similar into bytes (binary units).
fn parse_size(input: &str) -> Result<u64, String> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let value: f64 = number
        .parse()
        .map_err(|_| format!("invalid size '{input}'"))?;

    let multiplier: f64 = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1.0,
        "K" | "KB" | "KIB" => 1024.0,
        "M" | "MB" | "MIB" => 1024.0 * 1024.0,
        "G" | "GB" | "GIB" => 1024.0 * 1024.0 * 1024.0,
        "T" | "TB" | "TIB" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        other => return Err(format!("unknown size unit '{other}'")),
    };

    Ok((value * multiplier).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegrade_config::AppConfig;

    fn state() -> AppState {
        AppState::new(AppConfig::default()).unwrap()
    }

    fn run_to_string(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("cinegrade").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(&cli.command, &state(), cli.json, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_parse_size_units() {
        assert_eq!(parse_size("1234"), Ok(1234));
        assert_eq!(parse_size("50MB"), Ok(50 * 1024 * 1024));
        assert_eq!(parse_size("1.5 GB"), Ok(1536 * 1024 * 1024));
        assert_eq!(parse_size("2t"), Ok(2 * 1024u64.pow(4)));
        assert!(parse_size("ten").is_err());
        assert!(parse_size("5 parsecs").is_err());
    }

    #[test]
    fn test_score_explains_ban() {
        let text = run_to_string(&[
            "score",
            "Movie.2024.2160p.UHD.BluRay.HDR.x265-BiTOR",
        ])
        .unwrap();
        assert!(text.contains("Score: -inf (BANNED)"));
        assert!(text.contains("Fake HDR Groups"));
    }

    #[test]
    fn test_score_with_episode_size() {
        let text = run_to_string(&[
            "score",
            "Show.S01E01.1080p.WEB-DL.DDP5.1.H.264-NTb",
            "--profile",
            "balanced-1080p",
            "--size",
            "50MB",
            "--media",
            "tv",
        ])
        .unwrap();
        assert!(text.contains("Size rejected: Size 50.00 MB is below episode minimum of 100 MB"));
    }

    #[test]
    fn test_score_json_output() {
        let text = run_to_string(&[
            "--json",
            "score",
            "Oppenheimer.2023.1080p.BluRay.x264-YTS.MX",
        ])
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["release_name"], "Oppenheimer.2023.1080p.BluRay.x264-YTS.MX");
        assert_eq!(value["profile_name"], "Maximum Quality");
    }

    #[test]
    fn test_size_flags_need_size() {
        assert!(run_to_string(&["score", "Show.S01.1080p-GRP", "--season-pack"]).is_err());
        assert!(run_to_string(&["score", "Film.2020-GRP", "--size", "1GB", "--season-pack"]).is_err());
    }

    #[test]
    fn test_rank_reads_file_and_args() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "# candidates\nOppenheimer.2023.1080p.BluRay.x264-YTS.MX\n\nMovie.2024.2160p.UHD.BluRay.HDR.x265-BiTOR"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let text = run_to_string(&[
            "rank",
            "Oppenheimer.2023.2160p.UHD.BluRay.REMUX.DV.HDR.TrueHD.Atmos.7.1-FraMeSToR",
            "--file",
            &path,
        ])
        .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  1."));
        assert!(lines[0].contains("FraMeSToR"));
        assert!(lines[2].contains("BiTOR"));
        assert!(lines[2].ends_with("[banned]"));
    }

    #[test]
    fn test_rank_without_input_fails() {
        assert!(run_to_string(&["rank"]).is_err());
    }

    #[test]
    fn test_compare_and_upgrade() {
        let remux = "Oppenheimer.2023.2160p.UHD.BluRay.REMUX.DV.HDR.TrueHD.Atmos.7.1-FraMeSToR";
        let micro = "Oppenheimer.2023.1080p.BluRay.x264-YTS.MX";

        let text = run_to_string(&["compare", remux, micro]).unwrap();
        assert!(text.starts_with("Winner: A"));

        let text = run_to_string(&["upgrade", micro, remux]).unwrap();
        assert!(text.starts_with("Upgrade: yes"));

        let text = run_to_string(&["upgrade", remux, micro]).unwrap();
        assert!(text.starts_with("Upgrade: no"));
    }

    #[test]
    fn test_formats_lists_matched_ids() {
        let text = run_to_string(&["formats", "Movie.2024.2160p.UHD.BluRay.HDR.x265-BiTOR"]).unwrap();
        assert!(text.lines().any(|line| line == "banned-fake-hdr"));
        assert!(text.lines().any(|line| line == "res-2160p"));

        let verbose =
            run_to_string(&["formats", "-v", "Movie.2024.2160p.UHD.BluRay.HDR.x265-BiTOR"]).unwrap();
        assert!(verbose.contains("[x] banned-fake-hdr"));
        assert!(verbose.contains("+ BiTOR (optional)"));
    }

    #[test]
    fn test_profiles_listing() {
        let text = run_to_string(&["profiles"]).unwrap();
        assert!(text.contains("maximum-quality"));
        assert!(text.contains("defaults"));
        assert!(text.contains("cutoff none"));
    }

    #[test]
    fn test_unknown_profile_is_an_error() {
        assert!(run_to_string(&["score", "Film.2020-GRP", "--profile", "nope"]).is_err());
    }
}
