//! Randomized mediation windows.

use chrono::{Local, NaiveDate, NaiveDateTime};
use mediation_core::{
    config::RunConfig,
    dates::{random_window, DateInjector, WINDOW_FORMAT},
    rng::RunRng,
};

fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 27)
        .unwrap()
        .and_hms_opt(12, 34, 56)
        .unwrap()
}

/// start > end > now for every draw, and both deltas stay within 1..=10 days.
#[test]
fn window_is_always_in_the_future_with_start_after_end() {
    let now = noon();
    for seed in 0..200 {
        let mut rng = RunRng::seeded(seed);
        let w = random_window(now, &mut rng);

        assert!(w.end > now, "seed {seed}: end {} not after now", w.end);
        assert!(w.start > w.end, "seed {seed}: start {} not after end {}", w.start, w.end);

        let end_days = (w.end - now).num_days();
        let gap_days = (w.start - w.end).num_days();
        assert!((1..=10).contains(&end_days), "seed {seed}: end delta {end_days}");
        assert!((1..=10).contains(&gap_days), "seed {seed}: start delta {gap_days}");
    }
}

#[test]
fn window_keeps_the_time_of_day() {
    let w = random_window(noon(), &mut RunRng::seeded(7));
    assert!(w.start_str().ends_with(" 12:34:56"), "{}", w.start_str());
    assert!(w.end_str().ends_with(" 12:34:56"), "{}", w.end_str());
}

/// Month and leap-day boundaries roll over like calendar days.
#[test]
fn window_crosses_month_boundaries() {
    let now = noon();
    let mut saw_march = false;
    for seed in 0..100 {
        let w = random_window(now, &mut RunRng::seeded(seed));
        if w.start_str().starts_with("2024-03-") {
            saw_march = true;
        }
        NaiveDateTime::parse_from_str(&w.start_str(), WINDOW_FORMAT).unwrap();
    }
    assert!(saw_march, "some draw should land in March");
}

#[test]
fn same_seed_gives_same_window() {
    let a = random_window(noon(), &mut RunRng::seeded(42));
    let b = random_window(noon(), &mut RunRng::seeded(42));
    assert_eq!(a, b);
}

/// Injection always overwrites a preset window.
#[test]
fn injector_overwrites_preset_window() {
    let mut template = RunConfig::default_test().case;
    template.start_time = "2000-01-01 00:00:00".into();
    template.end_time = "2000-01-02 00:00:00".into();

    let before = Local::now().naive_local();
    let mut injector = DateInjector::new(RunRng::seeded(1));
    let window = injector.inject(&mut template);

    assert_eq!(template.start_time, window.start_str());
    assert_eq!(template.end_time, window.end_str());
    assert!(window.end > before);
    assert!(window.start > window.end);
    assert_eq!(injector.drawn(), 1);
}
