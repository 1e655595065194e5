//! ESP32-C3 SuperMini breathing LED firmware.
//!
//! Breathes an LED on GPIO2 until the BOOT button (GPIO9) is pressed.
//! Parameters are baked in at build time from environment variables:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `BREATHE_BPM` | Beats per minute | 60 |
//! | `BREATHE_ILLNESS` | Illness factor | 1.0 |
//! | `BREATHE_ALPHA` | Inhale fraction | 0.5 |
//! | `BREATHE_MODE` | `binary` or `pwm` | `pwm` |
//! | `BREATHE_STEPS` | PWM steps per phase | 1000 |
//!
//! # Build
//!
//! ```bash
//! BREATHE_BPM=90 BREATHE_ILLNESS=1.5 BREATHE_ALPHA=0.3 \
//!     cargo build --release --bin esp32_main --features esp32 \
//!     --target riscv32imc-esp-espidf
//! ```

use std::str::FromStr;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use esp_idf_hal::peripherals::Peripherals;
use rs_breathe::hal::esp32::{pins, Esp32Led, Esp32StopButton};
use rs_breathe::hal::{ConsoleObserver, ThreadPacer};
use rs_breathe::{
    breathe, BreathingConfig, CancelToken, Config, DeviceConfig, OutputConfig, OutputMode,
};

/// How often the stop button is sampled.
const BUTTON_POLL: Duration = Duration::from_millis(50);

fn env_or<T>(name: &str, value: Option<&'static str>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(text) => text
            .trim()
            .parse()
            .with_context(|| format!("{name}={text:?} is not a valid value")),
        None => Ok(default),
    }
}

fn load_config() -> anyhow::Result<Config> {
    let mode = match option_env!("BREATHE_MODE") {
        Some(text) => OutputMode::from_text(text)
            .ok_or_else(|| anyhow!("BREATHE_MODE={text:?} is not binary or pwm"))?,
        None => OutputMode::Pwm,
    };

    let breathing = BreathingConfig::default()
        .with_bpm(env_or("BREATHE_BPM", option_env!("BREATHE_BPM"), 60.0)?)
        .with_illness_factor(env_or("BREATHE_ILLNESS", option_env!("BREATHE_ILLNESS"), 1.0)?)
        .with_alpha(env_or("BREATHE_ALPHA", option_env!("BREATHE_ALPHA"), 0.5)?)
        .with_pwm_steps(env_or(
            "BREATHE_STEPS",
            option_env!("BREATHE_STEPS"),
            rs_breathe::DEFAULT_PWM_STEPS,
        )?)
        .with_mode(mode);

    Ok(Config::default()
        .with_breathing(breathing)
        .with_output(OutputConfig::default().with_gpio(pins::LED))
        .with_device(DeviceConfig::default().with_name("SuperMini LED")))
}

fn main() -> anyhow::Result<()> {
    esp_idf_hal::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = load_config()?;
    let profile = config
        .breathing
        .profile()
        .context("invalid breathing parameters")?;
    log::info!("{} starting", config.device.name);
    log::info!(
        "{:.1} breaths/min, inhale {:?}, exhale {:?}, {} mode",
        profile.breathing_cycle(),
        profile.inhale_duration(),
        profile.exhale_duration(),
        config.breathing.mode.as_str()
    );

    let peripherals = Peripherals::take()?;
    let led = Esp32Led::new(
        peripherals.pins.gpio2,
        peripherals.ledc.timer0,
        peripherals.ledc.channel0,
        &config.output,
    )?;
    let button = Esp32StopButton::new(peripherals.pins.gpio9)?;

    let cancel = CancelToken::new();
    let watcher = {
        let cancel = cancel.clone();
        thread::Builder::new()
            .name("stop-button".into())
            .stack_size(4096)
            .spawn(move || button.watch(&cancel, BUTTON_POLL))?
    };

    let outcome = breathe(
        &config.breathing,
        Some(led),
        &mut ThreadPacer::new(),
        &cancel,
        &mut ConsoleObserver,
    );
    // Stop the watcher whether the loop was cancelled or failed.
    cancel.cancel();
    if watcher.join().is_err() {
        log::warn!("stop button thread panicked");
    }

    let outcome = outcome?;
    log::info!(
        "stopped after {} cycles ({} steps)",
        outcome.cycles_completed,
        outcome.steps_applied
    );
    Ok(())
}
