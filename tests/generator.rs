mod support;

mod tests {
    use myrtio_pattern_visualizer::generator::IDLE_POLL;
    use myrtio_pattern_visualizer::{
        ControlError, Duration, FnSink, GeneratorConfig, GeneratorControl, Instant, Pattern,
        PatternGenerator, StartError,
    };

    use crate::support::RecordingSink;

    const PIXELS: usize = 60;
    const RATE_HZ: u32 = 25;
    const TICK_MS: u64 = 40;

    type Generator<'a> = PatternGenerator<'a, RecordingSink, PIXELS>;

    fn started(control: &GeneratorControl, pattern: Pattern) -> Generator<'_> {
        let mut generator = Generator::new(control, GeneratorConfig::DEFAULT);
        generator
            .start(pattern, PIXELS, RATE_HZ, RecordingSink::default())
            .unwrap();
        generator
    }

    /// Tick `count` times on schedule, starting at tick number `from`
    fn run_ticks(generator: &mut Generator<'_>, from: u64, count: u64) {
        for i in from..from + count {
            generator.tick(Instant::from_millis(i * TICK_MS));
        }
    }

    fn sink<'g>(generator: &'g Generator<'_>) -> &'g RecordingSink {
        generator.sink().unwrap()
    }

    #[test]
    fn test_start_twice_rejected() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::HannWindowPulse);

        let result = generator.start(Pattern::Noise, PIXELS, RATE_HZ, RecordingSink::default());
        assert_eq!(result, Err(StartError::AlreadyStarted));
        assert_eq!(generator.pattern(), Pattern::HannWindowPulse);
    }

    #[test]
    fn test_second_generator_on_same_control_rejected() {
        let control = GeneratorControl::new();
        let _first = started(&control, Pattern::Noise);

        let mut second = Generator::new(&control, GeneratorConfig::DEFAULT);
        let result = second.start(Pattern::Noise, PIXELS, RATE_HZ, RecordingSink::default());
        assert_eq!(result, Err(StartError::AlreadyStarted));
        assert!(!second.is_started());
    }

    #[test]
    fn test_start_validates_configuration() {
        let control = GeneratorControl::new();
        let mut generator = Generator::new(&control, GeneratorConfig::DEFAULT);

        assert_eq!(
            generator.start(Pattern::Noise, 0, RATE_HZ, RecordingSink::default()),
            Err(StartError::InvalidPixelCount(0))
        );
        assert_eq!(
            generator.start(Pattern::Noise, PIXELS + 1, RATE_HZ, RecordingSink::default()),
            Err(StartError::InvalidPixelCount(PIXELS + 1))
        );
        assert_eq!(
            generator.start(Pattern::Noise, PIXELS, 0, RecordingSink::default()),
            Err(StartError::InvalidUpdateRate(0))
        );
        assert_eq!(
            generator.start(Pattern::Noise, PIXELS, 1001, RecordingSink::default()),
            Err(StartError::InvalidUpdateRate(1001))
        );
        assert!(!generator.is_started());
        assert!(!control.is_started());

        generator
            .start(Pattern::Noise, 30, RATE_HZ, RecordingSink::default())
            .unwrap();
        assert_eq!(generator.pixel_count(), Some(30));
        assert_eq!(generator.tick_period(), Some(Duration::from_millis(TICK_MS)));
    }

    #[test]
    fn test_control_before_start_rejected() {
        let control = GeneratorControl::new();
        let mut generator = Generator::new(&control, GeneratorConfig::DEFAULT);

        assert_eq!(control.restart(), Err(ControlError::NotStarted));
        assert_eq!(
            control.change_pattern(Pattern::Noise, true),
            Err(ControlError::NotStarted)
        );

        let result = generator.tick(Instant::from_millis(0));
        assert_eq!(result.emitted, 0);
        assert_eq!(result.sleep_duration, IDLE_POLL);

        generator
            .start(Pattern::HannWindowPulse, PIXELS, RATE_HZ, RecordingSink::default())
            .unwrap();
        run_ticks(&mut generator, 0, 1);
        assert_eq!(generator.pattern(), Pattern::HannWindowPulse);
        assert_eq!(generator.phase(), 1);
    }

    #[test]
    fn test_hann_pulse_cycle_shape() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::HannWindowPulse);
        run_ticks(&mut generator, 0, 25);

        let bursts = &sink(&generator).bursts;
        assert_eq!(bursts.len(), 25);
        let mut sums = [0.0f32; PIXELS];
        for burst in bursts {
            assert_eq!(burst.len(), PIXELS);
            for (sum, sample) in sums.iter_mut().zip(burst) {
                *sum += sample;
            }
        }

        let (peak_index, peak) = sums
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, v)| if v > best.1 { (i, v) } else { best });
        assert!((29..=30).contains(&peak_index), "peak at {}", peak_index);
        assert!(sums[0] < peak * 1e-3);
        assert!(sums[59] < peak * 1e-3);
        assert_eq!(sink(&generator).completes.iter().filter(|c| **c).count(), 1);
        assert!(sink(&generator).completes[24]);
    }

    #[test]
    fn test_single_shot_patterns_hold_zero() {
        for pattern in [
            Pattern::HannWindowPulse,
            Pattern::HalfScaledHannWindowPulse,
            Pattern::MorseCodeSos,
        ] {
            let control = GeneratorControl::new();
            let mut generator = started(&control, pattern);
            let cycle = match pattern {
                Pattern::MorseCodeSos => 102,
                _ => 25,
            };
            run_ticks(&mut generator, 0, cycle);
            assert!(generator.is_done(), "{}", pattern.as_str());

            run_ticks(&mut generator, cycle, 40);
            let bursts = &sink(&generator).bursts;
            for burst in &bursts[cycle as usize..] {
                assert!(!burst.is_empty());
                assert!(burst.iter().all(|sample| *sample == 0.0));
            }
            assert!(generator.is_done());

            control.restart().unwrap();
            run_ticks(&mut generator, cycle + 40, 1);
            assert!(!generator.is_done());
            assert_eq!(generator.phase(), 1);
            assert!(sink(&generator).last().iter().any(|sample| *sample > 0.0));
        }
    }

    #[test]
    fn test_repeating_phase_wraps_without_gaps() {
        for (pattern, cycle) in [
            (Pattern::HannWindowRepeating, 25),
            (Pattern::HalfScaledHannWindowRepeating, 25),
            (Pattern::BulkKnightRider, 60),
            (Pattern::MorseCodeSosRepeating, 102),
        ] {
            let control = GeneratorControl::new();
            let mut generator = started(&control, pattern);

            for i in 0..cycle * 3 {
                assert_eq!(generator.phase(), i % cycle, "{}", pattern.as_str());
                generator.tick(Instant::from_millis(u64::from(i) * TICK_MS));
                assert!(!generator.is_done());
            }

            let completes = &sink(&generator).completes;
            let boundaries: Vec<usize> = completes
                .iter()
                .enumerate()
                .filter(|(_, complete)| **complete)
                .map(|(i, _)| i)
                .collect();
            let cycle = cycle as usize;
            assert_eq!(boundaries, vec![cycle - 1, 2 * cycle - 1, 3 * cycle - 1]);
        }
    }

    #[test]
    fn test_switch_to_noise_immediately() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::HannWindowPulse);
        run_ticks(&mut generator, 0, 10);

        control.change_pattern(Pattern::Noise, true).unwrap();
        run_ticks(&mut generator, 10, 1);

        assert_eq!(generator.pattern(), Pattern::Noise);
        let sink = sink(&generator);
        assert_eq!(sink.patterns[10], Pattern::Noise);
        let burst = sink.last();
        assert_eq!(burst.len(), PIXELS);
        // A pulse burst is zero at both ends and mirror-symmetric
        assert!(burst[0] > 0.0 || burst[59] > 0.0);
        assert!((0..30).any(|i| burst[i] != burst[59 - i]));
    }

    #[test]
    fn test_deferred_switch_waits_for_cycle_boundary() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::HannWindowRepeating);
        run_ticks(&mut generator, 0, 10);

        control.change_pattern(Pattern::BulkKnightRider, false).unwrap();
        run_ticks(&mut generator, 10, 15);
        assert_eq!(generator.pattern(), Pattern::BulkKnightRider);
        assert_eq!(generator.phase(), 0);

        run_ticks(&mut generator, 25, 1);
        let patterns = &sink(&generator).patterns;
        assert!(patterns[..25].iter().all(|p| *p == Pattern::HannWindowRepeating));
        assert_eq!(patterns[25], Pattern::BulkKnightRider);
    }

    #[test]
    fn test_deferred_switch_after_single_shot_finished() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::HannWindowPulse);
        run_ticks(&mut generator, 0, 30);
        assert!(generator.is_done());

        control.change_pattern(Pattern::Noise, false).unwrap();
        run_ticks(&mut generator, 30, 1);
        assert_eq!(generator.pattern(), Pattern::Noise);
        assert_eq!(sink(&generator).patterns[30], Pattern::Noise);
    }

    #[test]
    fn test_immediate_switch_overrides_deferred() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::HannWindowRepeating);
        run_ticks(&mut generator, 0, 5);

        control.change_pattern(Pattern::BulkKnightRider, false).unwrap();
        run_ticks(&mut generator, 5, 1);
        control.change_pattern(Pattern::Noise, true).unwrap();
        run_ticks(&mut generator, 6, 30);

        assert!(sink(&generator).patterns[6..].iter().all(|p| *p == Pattern::Noise));
    }

    #[test]
    fn test_same_pattern_with_restart_forces_restart() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::HannWindowRepeating);
        run_ticks(&mut generator, 0, 10);
        assert_eq!(generator.phase(), 10);

        control
            .change_pattern(Pattern::HannWindowRepeating, true)
            .unwrap();
        run_ticks(&mut generator, 10, 1);
        assert_eq!(generator.phase(), 1);
        assert_eq!(generator.pattern(), Pattern::HannWindowRepeating);
    }

    #[test]
    fn test_restart_keeps_pattern() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::BulkKnightRider);
        run_ticks(&mut generator, 0, 7);

        control.restart().unwrap();
        run_ticks(&mut generator, 7, 1);
        assert_eq!(generator.pattern(), Pattern::BulkKnightRider);
        assert_eq!(generator.phase(), 1);
        // Head is back on the first lane
        assert_eq!(sink(&generator).last()[0], 2000.0);
    }

    #[test]
    fn test_concurrent_restarts_collapse() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::HannWindowRepeating);
        run_ticks(&mut generator, 0, 10);

        std::thread::scope(|scope| {
            scope.spawn(|| control.restart().unwrap());
            scope.spawn(|| control.restart().unwrap());
        });

        run_ticks(&mut generator, 10, 1);
        assert_eq!(generator.phase(), 1);
        run_ticks(&mut generator, 11, 1);
        assert_eq!(generator.phase(), 2);
    }

    #[test]
    fn test_unknown_pattern_code_rejected() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::HannWindowRepeating);

        assert_eq!(
            control.change_pattern_raw(42, true),
            Err(ControlError::UnknownPattern(42))
        );
        run_ticks(&mut generator, 0, 3);
        assert_eq!(generator.pattern(), Pattern::HannWindowRepeating);
        assert_eq!(generator.phase(), 3);

        assert_eq!(control.change_pattern_raw(3, true), Ok(Pattern::Noise));
        run_ticks(&mut generator, 3, 1);
        assert_eq!(generator.pattern(), Pattern::Noise);
    }

    #[test]
    fn test_morse_emits_scalars() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::MorseCodeSos);
        run_ticks(&mut generator, 0, 120);

        let sink = sink(&generator);
        assert!(sink.bursts.iter().all(|burst| burst.len() == 1));
        assert_eq!(sink.bursts[0], vec![2000.0]);
        assert_eq!(sink.bursts[3], vec![0.0]);
    }

    #[test]
    fn test_tick_timing_and_drift_correction() {
        let control = GeneratorControl::new();
        let mut generator = started(&control, Pattern::None);

        let result = generator.tick(Instant::from_millis(0));
        assert_eq!(result.next_deadline, Instant::from_millis(40));
        assert_eq!(result.sleep_duration, Duration::from_millis(40));
        assert_eq!(result.emitted, PIXELS);

        let result = generator.tick(Instant::from_millis(50));
        assert_eq!(result.next_deadline, Instant::from_millis(80));
        assert_eq!(result.sleep_duration, Duration::from_millis(30));

        // Long stall: skip the backlog instead of catching up
        let result = generator.tick(Instant::from_millis(1000));
        assert_eq!(result.next_deadline, Instant::from_millis(1040));
        assert_eq!(result.sleep_duration, Duration::from_millis(40));
    }

    #[test]
    fn test_closure_sink() {
        let control = GeneratorControl::new();
        let mut total = 0usize;
        {
            let mut generator: PatternGenerator<'_, _, 8> =
                PatternGenerator::new(&control, GeneratorConfig::DEFAULT);
            generator
                .start(
                    Pattern::Noise,
                    8,
                    RATE_HZ,
                    FnSink(|samples: &[f32], _: Pattern, _: bool| total += samples.len()),
                )
                .unwrap();
            for i in 0..4 {
                generator.tick(Instant::from_millis(i * TICK_MS));
            }
        }
        assert_eq!(total, 32);
    }
}
