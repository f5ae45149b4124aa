// Copyright (c) 2026 rezky_nightky

mod cell;
mod clock;
mod color;
mod config;
mod firefly;
mod frame;
mod geometry;
mod palette;
mod raster;
mod runtime;
mod scene;
mod surface;
mod terminal;

use std::env;
use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::color::Rgb;
use crate::config::{color_enabled_stdout, default_params_usage_for_help, validate_scene, Args};
use crate::frame::Frame;
use crate::raster::Canvas;
use crate::runtime::ColorMode;
use crate::scene::{FrameReport, SceneSession};
use crate::surface::Surface;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" || term == "linux" {
        return ColorMode::Color16;
    }

    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> ColorMode {
    match args.colormode {
        None => detect_color_mode_auto(),
        Some(16) => ColorMode::Color16,
        Some(8 | 256) => ColorMode::Color256,
        Some(24 | 32) => ColorMode::TrueColor,
        Some(m) => {
            eprintln!("invalid --colormode: {} (allowed: 16, 8/256, 24/32)", m);
            std::process::exit(1);
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    builder.format_timestamp_millis();
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder
            .target(env_logger::Target::Pipe(Box::new(file)))
            .write_style(env_logger::WriteStyle::Never);
    }
    builder.init();
    Ok(())
}

#[derive(Default)]
struct PerfStats {
    frames: u64,
    drawn_frames: u64,
    work_sum_s: f64,
    work_max_s: f32,
    overshoot_frames: u64,
    last: Option<FrameReport>,
}

impl PerfStats {
    fn record(&mut self, drawn: bool, work_s: f32, period_s: f32, report: FrameReport) {
        self.frames = self.frames.saturating_add(1);
        if drawn {
            self.drawn_frames = self.drawn_frames.saturating_add(1);
        }
        self.work_sum_s += work_s as f64;
        self.work_max_s = self.work_max_s.max(work_s);
        if work_s > period_s {
            self.overshoot_frames = self.overshoot_frames.saturating_add(1);
        }
        self.last = Some(report);
    }

    fn print(&self, elapsed: Duration, target_fps: f64) {
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);
        let frames = self.frames.max(1) as f64;

        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  target_fps: {:.3}", target_fps);
        println!("  avg_fps: {:.3}", self.frames as f64 / elapsed_s);
        println!("  frames: {}", self.frames);
        println!(
            "  drawn_frames: {} ({:.1}%)",
            self.drawn_frames,
            self.drawn_frames as f64 / frames * 100.0
        );
        println!("  avg_work_ms: {:.3}", self.work_sum_s / frames * 1000.0);
        println!("  max_work_ms: {:.3}", self.work_max_s as f64 * 1000.0);
        println!(
            "  overshoot_frames: {} ({:.1}%)",
            self.overshoot_frames,
            self.overshoot_frames as f64 / frames * 100.0
        );
        if let Some(r) = self.last {
            println!("  scene_elapsed_s: {:.3}", r.elapsed.as_secs_f64());
            println!("  last_delta_ms: {:.3}", r.delta.as_secs_f64() * 1000.0);
            println!("  sunset_progress: {:.3}", r.sunset_progress);
            println!("  firefly_progress: {:.3}", r.firefly_progress);
            println!(
                "  fireflies: {} ({} lit)",
                r.fireflies, r.active_fireflies
            );
        }
    }
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        println!("BITCOLOR CHECK:");
        println!(
            "  COLORTERM: {}",
            if colorterm.is_empty() {
                "(unset)"
            } else {
                colorterm.as_str()
            }
        );
        println!(
            "  TERM: {}",
            if term.is_empty() { "(unset)" } else { term.as_str() }
        );
        println!("  auto_detected: {}", detect_color_mode_auto().label());
        println!("  effective: {}", detect_color_mode(&args).label());
        return Ok(());
    }

    let color_mode = detect_color_mode(&args);
    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let pixel_scale = require_f64_range("--pixel-scale", args.pixel_scale as f64, 1.0, 32.0) as f32;
    let end_after = args.duration.and_then(|s| {
        if !s.is_finite() {
            eprintln!("failed to apply --duration {} (must be a finite number)", s);
            std::process::exit(1);
        }
        if s <= 0.0 {
            return None;
        }
        Some(Duration::from_secs_f64(require_f64_range(
            "--duration",
            s,
            0.1,
            86400.0,
        )))
    });

    let errors = validate_scene(&args);
    if !errors.is_empty() {
        for e in errors {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
    let scene_config = args.scene_config();
    let seed = args.seed.unwrap_or_else(rand::random);

    init_logging(args.log_file.as_deref())?;
    log::info!("color mode: {}", color_mode.label());

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    let mut canvas = Canvas::for_terminal(w, h, pixel_scale);
    let mut frame = Frame::new(w, h);
    let mut session = SceneSession::new(scene_config, canvas.viewport(), seed);

    let start_time = Instant::now();
    let end_time = end_after.map(|d| start_time + d);
    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let mut next_frame = start_time;
    let mut perf = PerfStats::default();
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw.max(1), nh.max(1))),
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if args.screensaver {
                            running = false;
                            break;
                        }
                        match (k.code, k.modifiers) {
                            (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => running = false,
                            (KeyCode::Char('c'), KeyModifiers::CONTROL) => running = false,
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            canvas = Canvas::for_terminal(nw, nh, pixel_scale);
            frame = Frame::new(nw, nh);
            log::debug!(
                "terminal resized to {}x{} ({}x{} canvas pixels)",
                nw,
                nh,
                canvas.width(),
                canvas.height()
            );
        }

        let work_start = Instant::now();
        canvas.clear(Rgb::new(0, 0, 0));
        let report = session.step(work_start, &mut canvas);
        canvas.present(&mut frame, color_mode);
        let drawn = frame.has_changes();
        if drawn {
            term.draw(&mut frame)?;
        }
        let work_s = work_start.elapsed().as_secs_f32();
        perf.record(drawn, work_s, target_period.as_secs_f32(), report);

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    drop(term);
    log::info!(
        "stopped after {} frames ({:?})",
        perf.frames,
        start_time.elapsed()
    );
    if args.perf_stats {
        perf.print(start_time.elapsed(), target_fps);
    }

    Ok(())
}
