//! Linux sysfs GPIO board, with an optional sysfs PWM buzzer.
//!
//! ```text
//!   /sys/class/gpio/export          ← "17"
//!   /sys/class/gpio/gpio17/direction ← "out" | "in"
//!   /sys/class/gpio/gpio17/value     ↔ "0" | "1"
//!
//!   /sys/class/pwm/pwmchip0/export   ← "0"
//!   /sys/class/pwm/pwmchip0/pwm0/{period,duty_cycle,enable}
//! ```
//!
//! Both roots are configurable so the adapter can run against a scratch
//! directory in tests.  The legacy interface cannot select a pull-up;
//! button lines rely on the board's default bias (GPIO2-8 on a Pi are
//! pulled up at reset) or on a device-tree overlay.

use core::time::Duration;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use embedded_hal::digital::PinState;
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::app::ports::{PinMode, PinPort};
use crate::error::GpioError;
use crate::game::channel::Pin;
use crate::pins::{BUTTON_RELEASED, BUZZER_DUTY_PERCENT, LED_OFF};

fn level_text(level: PinState) -> &'static str {
    match level {
        PinState::Low => "0",
        PinState::High => "1",
    }
}

fn write_attr(path: &Path, value: &str) -> io::Result<()> {
    fs::write(path, value)
}

// ═══════════════════════════════════════════════════════════════
//  PWM buzzer
// ═══════════════════════════════════════════════════════════════

/// One exported sysfs PWM channel driving a passive buzzer.
pub struct SysfsPwm {
    chip_dir: PathBuf,
    channel: u32,
    // Tones from concurrent sampler workers play one at a time.
    busy: Mutex<()>,
}

impl SysfsPwm {
    /// Export `channel` on `pwmchip<chip>` below `root`.
    pub fn open(root: impl AsRef<Path>, chip: u32, channel: u32) -> Result<Self, GpioError> {
        let chip_dir = root.as_ref().join(format!("pwmchip{chip}"));
        if !chip_dir.is_dir() {
            return Err(GpioError::PwmUnavailable(format!(
                "{} does not exist",
                chip_dir.display()
            )));
        }

        let pwm = Self {
            chip_dir,
            channel,
            busy: Mutex::new(()),
        };
        if !pwm.channel_dir().is_dir() {
            write_attr(&pwm.chip_dir.join("export"), &channel.to_string())
                .map_err(|e| GpioError::PwmUnavailable(e.to_string()))?;
        }
        if !pwm.channel_dir().is_dir() {
            return Err(GpioError::PwmUnavailable(format!(
                "pwm{channel} did not appear under {}",
                pwm.chip_dir.display()
            )));
        }
        info!("buzzer on {}/pwm{channel}", pwm.chip_dir.display());
        Ok(pwm)
    }

    fn channel_dir(&self) -> PathBuf {
        self.chip_dir.join(format!("pwm{}", self.channel))
    }

    fn attr(&self, name: &str) -> PathBuf {
        self.channel_dir().join(name)
    }

    /// Square wave at `frequency_hz` for `duration`.  Blocks.
    pub fn tone(&self, frequency_hz: u32, duration: Duration) -> io::Result<()> {
        if frequency_hz == 0 {
            return Ok(());
        }
        let _busy = self.busy.lock();
        let period_ns = 1_000_000_000u64 / u64::from(frequency_hz);
        let duty_ns = period_ns * BUZZER_DUTY_PERCENT / 100;

        // duty_cycle may never exceed period, so zero it before resizing.
        write_attr(&self.attr("duty_cycle"), "0")?;
        write_attr(&self.attr("period"), &period_ns.to_string())?;
        write_attr(&self.attr("duty_cycle"), &duty_ns.to_string())?;
        write_attr(&self.attr("enable"), "1")?;
        thread::sleep(duration);
        write_attr(&self.attr("enable"), "0")
    }

    fn close(&self) {
        let _busy = self.busy.lock();
        let _ = write_attr(&self.attr("enable"), "0");
        if let Err(e) = write_attr(&self.chip_dir.join("unexport"), &self.channel.to_string()) {
            debug!("pwm{} unexport: {e}", self.channel);
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  GPIO board
// ═══════════════════════════════════════════════════════════════

pub struct SysfsBoard {
    root: PathBuf,
    configured: Mutex<Vec<(Pin, PinMode)>>,
    buzzer: Option<SysfsPwm>,
    released: AtomicBool,
}

impl SysfsBoard {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            configured: Mutex::new(Vec::new()),
            buzzer: None,
            released: AtomicBool::new(false),
        }
    }

    pub fn with_buzzer(mut self, buzzer: SysfsPwm) -> Self {
        self.buzzer = Some(buzzer);
        self
    }

    fn pin_dir(&self, pin: Pin) -> PathBuf {
        self.root.join(format!("gpio{pin}"))
    }

    fn export(&self, pin: Pin) -> Result<(), GpioError> {
        if self.pin_dir(pin).is_dir() {
            return Ok(());
        }
        write_attr(&self.root.join("export"), &pin.to_string()).map_err(|e| {
            GpioError::ExportFailed {
                pin,
                reason: e.to_string(),
            }
        })?;
        if self.pin_dir(pin).is_dir() {
            Ok(())
        } else {
            Err(GpioError::ExportFailed {
                pin,
                reason: format!("{} did not appear", self.pin_dir(pin).display()),
            })
        }
    }

    fn write_level(&self, pin: Pin, level: PinState) -> io::Result<()> {
        write_attr(&self.pin_dir(pin).join("value"), level_text(level))
    }
}

impl PinPort for SysfsBoard {
    fn set_pin_mode(&self, pin: Pin, mode: PinMode) -> Result<(), GpioError> {
        self.export(pin)?;

        // "high" sets direction and level in one write: no glitch on a
        // freshly exported active-low LED.
        let direction = match mode {
            PinMode::Output if LED_OFF == PinState::High => "high",
            PinMode::Output => "low",
            PinMode::InputPullUp => "in",
        };
        write_attr(&self.pin_dir(pin).join("direction"), direction).map_err(|e| {
            GpioError::ModeFailed {
                pin,
                reason: e.to_string(),
            }
        })?;

        let mut configured = self.configured.lock();
        configured.retain(|(p, _)| *p != pin);
        configured.push((pin, mode));
        debug!("GPIO{pin} -> {direction}");
        Ok(())
    }

    fn drive_led(&self, pin: Pin, level: PinState) {
        // Same lock as `release`, so no drive can land after the final OFF.
        let _configured = self.configured.lock();
        if self.released.load(Ordering::Acquire) {
            return;
        }
        if let Err(e) = self.write_level(pin, level) {
            warn!("GPIO{pin} write failed: {e}");
        }
    }

    fn read_button(&self, pin: Pin) -> PinState {
        match fs::read_to_string(self.pin_dir(pin).join("value")) {
            Ok(text) if text.trim() == "0" => PinState::Low,
            Ok(_) => PinState::High,
            Err(e) => {
                warn!("GPIO{pin} read failed: {e}");
                BUTTON_RELEASED
            }
        }
    }

    fn supports_tone(&self) -> bool {
        self.buzzer.is_some()
    }

    fn play_tone(&self, frequency_hz: u32, duration: Duration) {
        if self.released.load(Ordering::Acquire) {
            return;
        }
        if let Some(buzzer) = &self.buzzer {
            if let Err(e) = buzzer.tone(frequency_hz, duration) {
                warn!("tone {frequency_hz} Hz failed: {e}");
            }
        }
    }

    fn release(&self) {
        let mut guard = self.configured.lock();
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }

        let configured = std::mem::take(&mut *guard);
        for (pin, mode) in &configured {
            if *mode == PinMode::Output {
                if let Err(e) = self.write_level(*pin, LED_OFF) {
                    warn!("GPIO{pin} off on release failed: {e}");
                }
            }
            if let Err(e) = write_attr(&self.root.join("unexport"), &pin.to_string()) {
                debug!("GPIO{pin} unexport: {e}");
            }
        }
        drop(guard);
        if let Some(buzzer) = &self.buzzer {
            buzzer.close();
        }
        info!("released {} GPIO lines", configured.len());
    }
}

impl Drop for SysfsBoard {
    fn drop(&mut self) {
        self.release();
    }
}
