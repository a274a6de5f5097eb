use proptest::prelude::*;

use series_despiker::{despike, DespikeConfig, DespikeError, ThresholdMethod};

fn method_strategy() -> impl Strategy<Value = ThresholdMethod> {
    prop_oneof![Just(ThresholdMethod::Mean), Just(ThresholdMethod::Median)]
}

fn window_strategy() -> impl Strategy<Value = usize> {
    (1usize..6).prop_map(|k| 2 * k + 1)
}

/// Strictly increasing arguments built from positive steps.
fn arguments_strategy(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.1f64..10.0, 0..max_len).prop_map(|steps| {
        let mut acc = 0.0;
        steps
            .into_iter()
            .map(|step| {
                acc += step;
                acc
            })
            .collect()
    })
}

fn values_strategy(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1000.0f64..1000.0, 0..max_len)
}

proptest! {
    #[test]
    fn output_length_matches_effective_length(
        values in values_strategy(40),
        arguments in arguments_strategy(40),
        window in window_strategy(),
        multipass in 0usize..4,
        method in method_strategy(),
    ) {
        let config = DespikeConfig::new(window, multipass, method);
        let expected = if arguments.is_empty() {
            values.len()
        } else {
            values.len().min(arguments.len())
        };
        let windows = (expected + 1).saturating_sub(window);
        let result = despike(&values, Some(arguments.as_slice()), &config);
        if method == ThresholdMethod::Median && multipass > 0 && (windows == 1 || windows == 2) {
            let out_of_range = matches!(result, Err(DespikeError::MedianRankOutOfRange { .. }));
            prop_assert!(out_of_range);
            return Ok(());
        }
        let series = result.unwrap();
        prop_assert_eq!(series.values.len(), expected);
        prop_assert_eq!(series.arguments.len(), expected);
        if !arguments.is_empty() {
            prop_assert_eq!(&series.arguments[..], &arguments[..expected]);
        }
    }

    #[test]
    fn zero_passes_is_identity(
        values in values_strategy(30),
        window in window_strategy(),
        method in method_strategy(),
    ) {
        let config = DespikeConfig::new(window, 0, method);
        let series = despike(&values, None, &config).unwrap();
        prop_assert_eq!(series.values, values);
    }

    #[test]
    fn series_shorter_than_window_is_unchanged(
        values in values_strategy(11),
        multipass in 0usize..5,
        method in method_strategy(),
    ) {
        let window = 11;
        prop_assume!(values.len() < window);
        let config = DespikeConfig::new(window, multipass, method);
        let series = despike(&values, None, &config).unwrap();
        prop_assert_eq!(series.values, values);
    }

    #[test]
    fn constant_series_is_unchanged(
        level in -100.0f64..100.0,
        len in 0usize..30,
        window in window_strategy(),
        multipass in 1usize..4,
    ) {
        let values = vec![level; len];
        let config = DespikeConfig::new(window, multipass, ThresholdMethod::Mean);
        let series = despike(&values, None, &config).unwrap();
        prop_assert_eq!(series.values, values);
    }

    #[test]
    fn chained_single_passes_equal_multipass(
        values in values_strategy(40),
        arguments in arguments_strategy(40),
        window in window_strategy(),
        method in method_strategy(),
    ) {
        let once = DespikeConfig::new(window, 1, method);
        let twice = DespikeConfig::new(window, 2, method);

        let chained = despike(&values, Some(arguments.as_slice()), &once).and_then(|first| {
            despike(&first.values, Some(first.arguments.as_slice()), &once)
        });
        let direct = despike(&values, Some(arguments.as_slice()), &twice);

        prop_assert_eq!(chained, direct);
    }

    #[test]
    fn even_or_small_windows_are_rejected(window in 0usize..40, values in values_strategy(10)) {
        prop_assume!(window < 3 || window % 2 == 0);
        let config = DespikeConfig::default().with_window(window);
        let rejected = matches!(
            despike(&values, None, &config),
            Err(DespikeError::InvalidConfiguration(_))
        );
        prop_assert!(rejected);
    }
}

#[test]
fn isolated_spike_is_flattened() {
    let values = [1.0, 1.0, 1.0, 10.0, 1.0, 1.0, 1.0];
    let config = DespikeConfig::new(3, 1, ThresholdMethod::Mean);
    let (arguments, despiked) = despike(&values, None, &config).unwrap().into_parts();
    assert_eq!(arguments, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    for v in despiked {
        assert!((v - 1.0).abs() < 1e-9);
    }
}

#[test]
fn monotonic_series_is_unchanged() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    for multipass in 1..4 {
        let config = DespikeConfig::new(3, multipass, ThresholdMethod::Mean);
        assert_eq!(despike(&values, None, &config).unwrap().values, values.to_vec());
    }
}

#[test]
fn median_needs_three_windows() {
    let config = DespikeConfig::new(3, 1, ThresholdMethod::Median);
    for len in [3, 4] {
        let values = vec![1.0; len];
        assert!(matches!(
            despike(&values, None, &config),
            Err(DespikeError::MedianRankOutOfRange { .. })
        ));
    }
    assert!(despike(&[1.0; 5], None, &config).is_ok());
}

#[test]
fn unknown_method_name_is_rejected() {
    assert!(matches!(
        "average".parse::<ThresholdMethod>(),
        Err(DespikeError::InvalidConfiguration(_))
    ));
}
