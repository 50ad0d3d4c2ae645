mod tests {
    use myrtio_pattern_visualizer::pattern::{
        HannWindowWaveform, KnightRiderWaveform, MorseWaveform, NoiseWaveform, Waveform,
    };
    use myrtio_pattern_visualizer::{Duration, GeneratorConfig, Pattern};

    #[test]
    fn test_pattern_codes_and_names() {
        for pattern in Pattern::ALL {
            assert_eq!(Pattern::from_raw(pattern.as_raw()), Some(pattern));
            assert_eq!(Pattern::parse_from_str(pattern.as_str()), Some(pattern));
        }
        assert_eq!(Pattern::from_raw(7), Some(Pattern::BulkKnightRider));
        assert_eq!(Pattern::from_raw(9), None);
        assert_eq!(Pattern::parse_from_str("sos"), None);
    }

    #[test]
    fn test_hann_burst_shape() {
        let mut waveform = HannWindowWaveform::new(2000.0, 1);
        let mut out = [0.0f32; 61];
        assert_eq!(waveform.render(0, &mut out), 61);

        assert!(out[0].abs() < 1e-3);
        assert!(out[60].abs() < 1e-3);
        assert!((out[30] - 2000.0).abs() < 1e-2);
        for i in 0..30 {
            assert!(out[i] <= out[i + 1]);
            assert!((out[i] - out[60 - i]).abs() < 1e-2);
        }
    }

    #[test]
    fn test_hann_envelope_peaks_mid_cycle() {
        let mut waveform = HannWindowWaveform::new(1000.0, 9);
        let mut out = [0.0f32; 11];
        let peaks: Vec<f32> = (0..9)
            .map(|phase| {
                waveform.render(phase, &mut out);
                out[5]
            })
            .collect();

        assert!(peaks[0] > 0.0);
        assert!(peaks[8] > 0.0);
        assert!((peaks[4] - 1000.0).abs() < 1e-2);
        assert!(peaks[0] < peaks[4]);
        assert!(!waveform.is_repeating());
        assert!(waveform.with_repeat().is_repeating());
    }

    #[test]
    fn test_noise_within_amplitude() {
        let mut waveform = NoiseWaveform::new(500.0, 7);
        let mut first = [0.0f32; 32];
        let mut second = [0.0f32; 32];
        waveform.render(0, &mut first);
        waveform.render(0, &mut second);

        for sample in first.iter().chain(second.iter()) {
            assert!((0.0..500.0).contains(sample));
        }
        assert_ne!(first, second);
        assert_eq!(waveform.cycle_len(32), 1);
    }

    #[test]
    fn test_morse_sos_timeline() {
        let mut waveform = MorseWaveform::sos(1.0, 1);
        let mut out = [0.0f32; 4];
        let lit: Vec<bool> = (0..waveform.cycle_len(4))
            .map(|phase| {
                assert_eq!(waveform.render(phase, &mut out), 1);
                out[0] > 0.0
            })
            .collect();

        let expected_prefix = [
            true, false, true, false, true, false, false, false, // S
            true, true, true, false, true, true, true, false, true, true, true, // O
        ];
        assert_eq!(lit.len(), 34);
        assert_eq!(&lit[..expected_prefix.len()], &expected_prefix);
        assert!(lit[27..].iter().all(|on| !on));
        assert!(waveform.is_scalar());
    }

    #[test]
    fn test_morse_unit_stretches_cycle() {
        let mut waveform = MorseWaveform::sos(1.0, 3);
        let mut out = [0.0f32; 1];
        assert_eq!(waveform.cycle_len(1), 102);

        waveform.render(2, &mut out);
        assert_eq!(out[0], 1.0);
        waveform.render(3, &mut out);
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn test_knight_rider_head_and_trail() {
        let mut waveform = KnightRiderWaveform::new(800.0, 2);
        let mut out = [0.0f32; 10];

        waveform.render(0, &mut out);
        assert_eq!(out[0], 800.0);
        assert_eq!(out[9], 400.0);
        assert_eq!(out[8], 200.0);
        assert!(out[1..8].iter().all(|sample| *sample == 0.0));

        waveform.render(12, &mut out);
        assert_eq!(out[2], 800.0);
        assert_eq!(out[1], 400.0);
        assert_eq!(out[0], 200.0);
        assert_eq!(out[3], 0.0);
        assert_eq!(waveform.cycle_len(10), 10);
    }

    #[test]
    fn test_slot_cycle_lengths() {
        let config = GeneratorConfig::DEFAULT;
        let slot = Pattern::HannWindowPulse.to_slot(&config, 25, 0);
        assert_eq!(slot.cycle_len(60), 25);
        assert!(!slot.is_repeating());

        let slot = Pattern::HannWindowRepeating.to_slot(&config, 25, 0);
        assert!(slot.is_repeating());

        let slot = Pattern::MorseCodeSos.to_slot(&config, 25, 0);
        assert_eq!(slot.cycle_len(60), 102);
        assert!(slot.is_scalar());

        let slot = Pattern::BulkKnightRider.to_slot(&config, 25, 0);
        assert_eq!(slot.cycle_len(60), 60);

        let short = GeneratorConfig {
            pulse_duration: Duration::from_millis(1),
            ..GeneratorConfig::DEFAULT
        };
        assert_eq!(Pattern::HannWindowPulse.to_slot(&short, 25, 0).cycle_len(60), 1);
    }

    #[test]
    fn test_half_scaled_variants() {
        let config = GeneratorConfig::DEFAULT;
        let mut full = Pattern::HannWindowPulse.to_slot(&config, 25, 0);
        let mut half = Pattern::HalfScaledHannWindowPulse.to_slot(&config, 25, 0);
        let mut a = [0.0f32; 21];
        let mut b = [0.0f32; 21];
        full.render(12, &mut a);
        half.render(12, &mut b);

        for (full_sample, half_sample) in a.iter().zip(b.iter()) {
            assert!((full_sample * 0.5 - half_sample).abs() < 1e-3);
        }
    }
}
