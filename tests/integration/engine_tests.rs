//! Pulse-generation behaviour of one engine + runner pair.
//!
//! Most tests drive the runner against [`RecordingPort`] and assert on
//! the exact write/wait sequence.

use core::num::NonZeroU16;

use analog_emu::adapters::EspGpioPort;
use analog_emu::engine::{Parameters, PwmEngine, PwmRunner, Skew};
use embedded_hal::digital::PinState;

use crate::mock_hw::{PortCall, RecordingPort};

fn engine(cycles: u16, ext: u16, max: u16, skew: Skew) -> PwmEngine {
    PwmEngine::with_parameters(Parameters {
        cycle_count: cycles,
        cycle_length_extension_us: ext,
        max_duty_value: NonZeroU16::new(max).unwrap(),
        skew,
    })
}

// ── Duty proportionality ──────────────────────────────────────

#[test]
fn high_count_equals_duty_for_both_skews() {
    for skew in [Skew::High, Skew::Low] {
        let engine = engine(1, 0, 255, skew);
        let mut runner = PwmRunner::new(&engine, RecordingPort::new());

        for (pin, duty) in [(1u8, 1u16), (2, 64), (3, 128), (4, 254), (5, 255)] {
            engine.set_voltage(pin, duty);
        }
        runner.run();

        let port = runner.port();
        for (pin, duty) in [(1u8, 1usize), (2, 64), (3, 128), (4, 254), (5, 255)] {
            assert_eq!(port.writes_for(pin).len(), 255, "{skew:?} GPIO{pin}");
            assert_eq!(port.high_count(pin), duty, "{skew:?} GPIO{pin}");
        }
    }
}

#[test]
fn proportionality_scales_with_cycle_count() {
    let engine = engine(3, 0, 10, Skew::Low);
    let mut runner = PwmRunner::new(&engine, RecordingPort::new());
    engine.set_voltage(7, 4);

    let report = runner.run();
    assert_eq!(report.steps, 30);
    assert_eq!(runner.port().writes_for(7).len(), 30);
    assert_eq!(runner.port().high_count(7), 12);
}

#[test]
fn custom_max_duty_value_sets_sweep_length() {
    let engine = engine(1, 0, 1023, Skew::High);
    let mut runner = PwmRunner::new(&engine, RecordingPort::new());
    engine.set_voltage(4, 512);

    runner.run();
    assert_eq!(runner.port().writes_for(4).len(), 1023);
    assert_eq!(runner.port().high_count(4), 512);
}

// ── Zero removes ──────────────────────────────────────────────

#[test]
fn zero_forces_low_and_stops_writes() {
    let engine = engine(1, 0, 255, Skew::High);
    let mut runner = PwmRunner::new(&engine, RecordingPort::new());

    engine.set_voltage(5, 100);
    runner.run();
    assert_eq!(runner.active_pins().get(&5), Some(&100));

    runner.port_mut().clear();
    engine.set_voltage(5, 0);
    let report = runner.run();

    assert_eq!(report.committed, 1);
    assert!(!runner.active_pins().contains_key(&5));
    // Exactly one write: the commit-phase off level, before any sweep step.
    assert_eq!(runner.port().writes_for(5), [PinState::Low]);
    assert_eq!(
        runner.port().calls.first(),
        Some(&PortCall::Write {
            pin: 5,
            level: PinState::Low
        })
    );
}

#[test]
fn zero_is_off_regardless_of_skew_or_max() {
    for skew in [Skew::High, Skew::Low] {
        let engine = engine(2, 0, 3, skew);
        let mut runner = PwmRunner::new(&engine, RecordingPort::new());
        engine.set_voltage(9, 0);
        runner.run();
        assert_eq!(runner.port().writes_for(9), [PinState::Low]);
    }
}

// ── Last write wins ───────────────────────────────────────────

#[test]
fn last_write_before_commit_wins() {
    let engine = engine(1, 0, 255, Skew::Low);
    let mut runner = PwmRunner::new(&engine, RecordingPort::new());

    engine.set_voltage(5, 10);
    engine.set_voltage(5, 200);
    let report = runner.run();

    assert_eq!(report.committed, 1);
    assert_eq!(runner.active_pins().get(&5), Some(&200));
    assert_eq!(runner.port().high_count(5), 200);
}

#[test]
fn nonzero_after_zero_in_same_batch_keeps_pin_active() {
    let engine = engine(0, 0, 255, Skew::Low);
    let mut runner = PwmRunner::new(&engine, RecordingPort::new());

    engine.set_voltage(5, 0);
    engine.set_voltage(5, 50);
    runner.run();

    assert_eq!(runner.active_pins().get(&5), Some(&50));
    assert_eq!(runner.port().write_count(), 0);
}

// ── No mid-sweep reconfiguration ──────────────────────────────

#[test]
fn setters_during_pulse_phase_wait_for_next_run() {
    let engine = engine(1, 3, 8, Skew::Low);
    let port = RecordingPort::with_delay_hook(|n| {
        if n == 0 {
            engine.set_cycle_length_extension(99);
            engine.set_skew(Skew::High);
            engine.set_cycle_count(2);
            engine.set_max_duty_value(NonZeroU16::new(4).unwrap());
            engine.set_voltage(6, 8);
        }
    });
    let mut runner = PwmRunner::new(&engine, port);
    engine.set_voltage(6, 2);

    let first = runner.run();
    assert_eq!(first.steps, 8);
    assert_eq!(runner.port().delays(), [3; 8]);
    // Low skew, duty 2 of 8: HIGH on the first two steps only.
    assert_eq!(
        runner.port().writes_for(6),
        [
            PinState::High,
            PinState::High,
            PinState::Low,
            PinState::Low,
            PinState::Low,
            PinState::Low,
            PinState::Low,
            PinState::Low,
        ]
    );
    assert_eq!(runner.active_pins().get(&6), Some(&2));
    assert!(engine.has_pending());

    runner.port_mut().clear();
    let second = runner.run();
    assert_eq!(second.steps, 8);
    assert_eq!(second.params.skew, Skew::High);
    assert_eq!(runner.port().delays(), [99; 8]);
    assert_eq!(runner.active_pins().get(&6), Some(&8));
    // Duty 8 is above the new max of 4: full on.
    assert_eq!(runner.port().high_count(6), 8);
}

// ── Idle level ────────────────────────────────────────────────

#[test]
fn high_skew_rests_high_for_every_active_pin() {
    let engine = engine(1, 0, 255, Skew::High);
    let mut runner = PwmRunner::new(&engine, RecordingPort::new());
    for (pin, duty) in [(1u8, 1u16), (2, 100), (3, 255)] {
        engine.set_voltage(pin, duty);
    }
    runner.run();
    for pin in 1..=3 {
        assert_eq!(runner.port().last_level(pin), Some(PinState::High), "GPIO{pin}");
    }
}

#[test]
fn low_skew_rests_low_below_max_and_high_at_max() {
    let engine = engine(1, 0, 255, Skew::Low);
    let mut runner = PwmRunner::new(&engine, RecordingPort::new());
    for (pin, duty) in [(1u8, 1u16), (2, 254), (3, 255)] {
        engine.set_voltage(pin, duty);
    }
    runner.run();
    assert_eq!(runner.port().last_level(1), Some(PinState::Low));
    assert_eq!(runner.port().last_level(2), Some(PinState::Low));
    assert_eq!(runner.port().last_level(3), Some(PinState::High));
}

// ── End-to-end scenario ───────────────────────────────────────

#[test]
fn half_duty_high_skew_sequence() {
    let engine = engine(1, 0, 255, Skew::High);
    let mut runner = PwmRunner::new(&engine, RecordingPort::new());
    engine.set_voltage(5, 128);

    runner.run();
    let writes = runner.port().writes_for(5);

    assert_eq!(writes.len(), 255);
    // i = 254..=128 → LOW (127 writes), then i = 127..=0 → HIGH (128 writes).
    assert!(writes[..127].iter().all(|&l| l == PinState::Low));
    assert!(writes[127..].iter().all(|&l| l == PinState::High));
    assert_eq!(writes.last(), Some(&PinState::High));
    assert_eq!(runner.port().delays(), [0; 255]);
}

// ── Disabled pulsing ──────────────────────────────────────────

#[test]
fn zero_cycle_count_produces_no_sweep_writes() {
    let engine = engine(0, 0, 255, Skew::High);
    let mut runner = PwmRunner::new(&engine, RecordingPort::new());

    engine.set_voltage(5, 128);
    engine.set_voltage(6, 0);
    let report = runner.run();

    assert_eq!(report.steps, 0);
    assert_eq!(runner.active_pins().get(&5), Some(&128));
    assert!(runner.port().writes_for(5).is_empty());
    // Commit-phase off write for the duty-0 transition still happens.
    assert_eq!(runner.port().writes_for(6), [PinState::Low]);
    assert!(runner.port().delays().is_empty());
}

#[test]
fn resuming_cycle_count_resumes_pulsing() {
    let engine = engine(0, 0, 16, Skew::Low);
    let mut runner = PwmRunner::new(&engine, RecordingPort::new());
    engine.set_voltage(2, 4);
    runner.run();
    assert!(runner.port().calls.is_empty());

    engine.set_cycle_count(1);
    runner.run();
    assert_eq!(runner.port().high_count(2), 4);
}

// ── Pins outside the map ──────────────────────────────────────

#[test]
fn unknown_pins_are_never_written() {
    let engine = engine(2, 0, 8, Skew::High);
    let mut runner = PwmRunner::new(&engine, RecordingPort::new());
    engine.set_voltage(3, 5);
    runner.run();

    assert!(
        runner
            .port()
            .calls
            .iter()
            .all(|c| !matches!(c, PortCall::Write { pin, .. } if *pin != 3))
    );
}

#[test]
fn zero_cycles_hold_static_levels_per_skew() {
    for (skew, partial) in [(Skew::High, PinState::High), (Skew::Low, PinState::Low)] {
        let engine = engine(1, 0, 255, skew);
        let mut gpio = EspGpioPort::new();
        gpio.configure_outputs(&[1, 2, 3]).unwrap();
        let mut runner = PwmRunner::new(&engine, gpio);
        engine.set_voltage(1, 255);
        engine.set_voltage(2, 100);
        engine.set_voltage(3, 1);
        runner.run();

        engine.set_cycle_count(0);
        engine.set_voltage(3, 0);
        assert_eq!(runner.run().steps, 0);

        let gpio = runner.port();
        assert_eq!(gpio.level(1), Some(PinState::High));
        assert_eq!(gpio.level(2), Some(partial));
        assert_eq!(gpio.level(3), Some(PinState::Low));
    }
}
