// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

use crate::firefly::{SpawnBand, SwarmConfig, MAX_FIREFLIES};
use crate::scene::SceneConfig;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  duskfall --fps 60 --sunset-ms 8000 --firefly-delay-ms 9000 --buildup-ms 20000 --max-fireflies 200 --trees 80 --stars 150 --spawn-band 0.3,0.8 --pixel-scale 8";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_params_usage_for_help() -> String {
    if !color_enabled_stdout() {
        return DEFAULT_PARAMS_USAGE.to_string();
    }
    let (heading, rest) = DEFAULT_PARAMS_USAGE
        .split_once('\n')
        .unwrap_or((DEFAULT_PARAMS_USAGE, ""));
    let rest = rest.replacen("duskfall", "\x1b[1;34mduskfall\x1b[0m", 1);
    format!("\x1b[1;36m{}\x1b[0m\n{}", heading, rest)
}

/// `LOW,HIGH` fractions of the viewport height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandRange {
    pub low: f32,
    pub high: f32,
}

impl FromStr for BandRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| "expected: LOW,HIGH".to_string())?;
        let low: f32 = a
            .trim()
            .parse()
            .map_err(|_| "invalid low value".to_string())?;
        let high: f32 = b
            .trim()
            .parse()
            .map_err(|_| "invalid high value".to_string())?;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low >= high {
            return Err("band must satisfy 0 <= low < high <= 1".to_string());
        }
        Ok(Self { low, high })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "duskfall",
    version,
    disable_version_flag = true,
    about = "A forest sunset that fades into a night full of fireflies"
)]
pub struct Args {
    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on any keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed for the forest layout and firefly flights (default: random)"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "log-file",
        value_name = "PATH",
        help_heading = "GENERAL",
        help = "Write logs to PATH (filter with RUST_LOG; default info). Without it, logs go to stderr (default warn) and anything RUST_LOG lets through draws over the scene"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "sunset-ms",
        default_value_t = 8000,
        help_heading = "SCENE",
        help = "Sunset length in ms (min 1 max 600000)"
    )]
    pub sunset_ms: u64,

    #[arg(
        long = "firefly-delay-ms",
        default_value_t = 9000,
        help_heading = "SCENE",
        help = "Time before the first fireflies appear, in ms (min 0 max 600000)"
    )]
    pub firefly_delay_ms: u64,

    #[arg(
        long = "buildup-ms",
        default_value_t = 20000,
        help_heading = "SCENE",
        help = "Time for the swarm to reach full size, in ms (min 1 max 600000)"
    )]
    pub buildup_ms: u64,

    #[arg(
        long = "max-fireflies",
        default_value_t = 200,
        help_heading = "SCENE",
        help = "Swarm size (min 0 max 200)"
    )]
    pub max_fireflies: usize,

    #[arg(
        long = "spawn-band",
        default_value = "0.3,0.8",
        help_heading = "SCENE",
        help = "Vertical band fireflies spawn in, as LOW,HIGH fractions of the height"
    )]
    pub spawn_band: BandRange,

    #[arg(
        long = "trees",
        default_value_t = 80,
        help_heading = "SCENE",
        help = "Number of trees (min 0 max 500)"
    )]
    pub trees: usize,

    #[arg(
        long = "stars",
        default_value_t = 150,
        help_heading = "SCENE",
        help = "Star pattern length; roughly a third become visible (min 0 max 2000)"
    )]
    pub stars: usize,

    #[arg(
        long = "pixel-scale",
        default_value_t = 8.0,
        help_heading = "APPEARANCE",
        help = "Scene pixels per terminal half-cell (min 1 max 32)"
    )]
    pub pixel_scale: f32,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 16, 8/256, 24/32). Default: 24-bit if COLORTERM says so, else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "perf-stats",
        help_heading = "PERFORMANCE",
        help = "Print performance statistics summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

/// Range problems in the scene options, one message per bad flag.
pub fn validate_scene(args: &Args) -> Vec<String> {
    let mut errors = Vec::new();
    let mut check = |name: &str, v: u64, min: u64, max: u64| {
        if v < min || v > max {
            errors.push(format!(
                "failed to apply {} {} (min {} max {})",
                name, v, min, max
            ));
        }
    };
    check("--sunset-ms", args.sunset_ms, 1, 600_000);
    check("--firefly-delay-ms", args.firefly_delay_ms, 0, 600_000);
    check("--buildup-ms", args.buildup_ms, 1, 600_000);
    check(
        "--max-fireflies",
        args.max_fireflies as u64,
        0,
        MAX_FIREFLIES as u64,
    );
    check("--trees", args.trees as u64, 0, 500);
    check("--stars", args.stars as u64, 0, 2000);
    errors
}

impl Args {
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            sunset_duration: Duration::from_millis(self.sunset_ms),
            firefly_start_delay: Duration::from_millis(self.firefly_delay_ms),
            tree_count: self.trees,
            star_count: self.stars,
            swarm: SwarmConfig {
                max_fireflies: self.max_fireflies.min(MAX_FIREFLIES),
                buildup: Duration::from_millis(self.buildup_ms),
                spawn_band: SpawnBand {
                    low: self.spawn_band.low,
                    high: self.spawn_band.high,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("duskfall").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_the_scene_constants() {
        let args = parse(&[]);
        assert!(validate_scene(&args).is_empty());
        assert_eq!(args.scene_config(), SceneConfig::default());
    }

    #[test]
    fn log_file_help_warns_about_stderr() {
        let cmd = Args::command();
        let help = cmd
            .get_arguments()
            .find(|a| a.get_id() == "log_file")
            .and_then(|a| a.get_help())
            .map(|h| h.to_string())
            .unwrap_or_default();
        assert!(help.contains("stderr"), "help = {}", help);
        assert!(help.contains("RUST_LOG"));
    }

    #[test]
    fn band_parses_and_rejects_inverted_ranges() {
        let b: BandRange = "0.2, 0.9".parse().unwrap();
        assert_eq!(b, BandRange { low: 0.2, high: 0.9 });
        assert!("0.9,0.2".parse::<BandRange>().is_err());
        assert!("0.5".parse::<BandRange>().is_err());
        assert!("0,1.5".parse::<BandRange>().is_err());
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let args = parse(&["--max-fireflies", "500", "--sunset-ms", "0"]);
        let errors = validate_scene(&args);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("--sunset-ms"));
        assert!(errors[1].contains("--max-fireflies"));
    }

    #[test]
    fn overrides_flow_into_the_scene_config() {
        let args = parse(&[
            "--sunset-ms",
            "1000",
            "--firefly-delay-ms",
            "0",
            "--max-fireflies",
            "50",
            "--spawn-band",
            "0.1,0.5",
        ]);
        let cfg = args.scene_config();
        assert_eq!(cfg.sunset_duration, Duration::from_secs(1));
        assert_eq!(cfg.firefly_start_delay, Duration::ZERO);
        assert_eq!(cfg.swarm.max_fireflies, 50);
        assert_eq!(cfg.swarm.spawn_band, SpawnBand { low: 0.1, high: 0.5 });
    }
}
