//! Desktop breathing runner.
//!
//! Draws the breathing output as a terminal gauge (or prints phase labels
//! in dry-run mode) until Ctrl-C.
//!
//! # Usage
//!
//! ```sh
//! # 60 bpm, symmetric, on/off
//! cargo run --bin breathe --features desktop
//!
//! # Sick hamster: fast, short inhale, smooth PWM glow
//! cargo run --bin breathe --features desktop -- --bpm 90 --illness 1.5 --alpha 0.3 --pwm
//!
//! # Timing only
//! cargo run --bin breathe --features desktop -- --dry-run
//! ```
//!
//! Set `RUST_LOG=debug` to log every phase transition.

use anyhow::Context;
use clap::Parser;
use rs_breathe::hal::{ConsoleObserver, TerminalGauge, ThreadPacer};
use rs_breathe::{breathe, BinaryExhale, BreathingConfig, CancelToken, OutputMode, RunOutcome};

#[derive(Debug, Parser)]
#[command(name = "breathe", about = "Make an output breathe like a living thing")]
struct Args {
    /// Nominal beats per minute
    #[arg(long, default_value_t = 60.0)]
    bpm: f64,

    /// Illness multiplier on the breathing rate (1.0 = healthy)
    #[arg(long, default_value_t = 1.0)]
    illness: f64,

    /// Fraction of each cycle spent inhaling, strictly between 0 and 1
    #[arg(long, default_value_t = 0.5)]
    alpha: f64,

    /// Ramp the output with PWM steps instead of switching it on and off
    #[arg(long)]
    pwm: bool,

    /// PWM steps per phase
    #[arg(long, default_value_t = rs_breathe::DEFAULT_PWM_STEPS)]
    steps: u32,

    /// Print phase labels instead of driving the gauge
    #[arg(long)]
    dry_run: bool,

    /// Keep the output on while exhaling in binary mode
    #[arg(long)]
    hold_exhale: bool,

    /// Print the computed profile and exit
    #[arg(long)]
    describe: bool,

    /// With --describe, print the profile as JSON
    #[cfg(feature = "json")]
    #[arg(long, requires = "describe")]
    json: bool,
}

impl Args {
    fn config(&self) -> BreathingConfig {
        BreathingConfig::default()
            .with_bpm(self.bpm)
            .with_illness_factor(self.illness)
            .with_alpha(self.alpha)
            .with_mode(if self.pwm {
                OutputMode::Pwm
            } else {
                OutputMode::Binary
            })
            .with_pwm_steps(self.steps)
            .with_dry_run(self.dry_run)
            .with_binary_exhale(if self.hold_exhale {
                BinaryExhale::Hold
            } else {
                BinaryExhale::Release
            })
    }
}

fn describe(args: &Args, config: &BreathingConfig) -> anyhow::Result<()> {
    let profile = config.profile().context("invalid breathing parameters")?;

    #[cfg(feature = "json")]
    {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&profile.summary())?);
            return Ok(());
        }
    }
    #[cfg(not(feature = "json"))]
    let _ = args;

    println!("{profile}");
    println!("Inhale: {:?}", profile.inhale_duration());
    println!("Exhale: {:?}", profile.exhale_duration());
    Ok(())
}

fn run_blocking(config: BreathingConfig, cancel: CancelToken) -> anyhow::Result<RunOutcome> {
    let device = (!config.dry_run).then(TerminalGauge::stderr);
    let outcome = breathe(
        &config,
        device,
        &mut ThreadPacer::new(),
        &cancel,
        &mut ConsoleObserver,
    )?;
    Ok(outcome)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config();

    if args.describe {
        return describe(&args, &config);
    }

    // Fail fast before spawning anything.
    config.profile().context("invalid breathing parameters")?;
    config.waveform().context("invalid waveform parameters")?;

    let cancel = CancelToken::new();
    let mut task = {
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || run_blocking(config, cancel))
    };

    let outcome = tokio::select! {
        joined = &mut task => joined??,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl-C")?;
            cancel.cancel();
            task.await??
        }
    };

    log::info!(
        "completed {} cycles, {} steps",
        outcome.cycles_completed,
        outcome.steps_applied
    );
    Ok(())
}
