use burn::tensor::{Tensor, TensorData};
use burn_ndarray::NdArray;
use proptest::prelude::*;
use stackreg_core::image::{to_host, ImageStack};
use stackreg_core::running_mean;

type Backend = NdArray<f32>;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_constant_stack_is_unchanged(
        value in -100.0f32..100.0,
        frames in 1usize..8,
        window in 1usize..12,
        axis in 0usize..3
    ) {
        let device = Default::default();
        let mut shape = [4usize, 5, 3];
        shape[axis] = frames;
        let stack = ImageStack::<Backend>::new(Tensor::full(shape, value, &device));

        let out = running_mean(&stack, window, axis).unwrap();
        prop_assert_eq!(out.dims(), shape);
        for v in to_host(out.tensor()).unwrap() {
            prop_assert!((v - value as f64).abs() < 1e-3, "got {}, expected {}", v, value);
        }
    }
}

#[test]
fn test_ramp_keeps_trend_at_endpoints() {
    let device = Default::default();
    let values: Vec<f32> = (0..6).flat_map(|t| std::iter::repeat(t as f32).take(4)).collect();
    let stack = ImageStack::<Backend>::try_from_data(TensorData::new(values, [6, 2, 2]), &device).unwrap();

    let out = running_mean(&stack, 4, 0).unwrap();
    let means: Vec<f64> = (0..6)
        .map(|i| to_host(&out.frame(0, i).unwrap()).unwrap()[0])
        .collect();

    // monotone, and pulled towards the replicated edge frames
    assert!(means.windows(2).all(|w| w[1] >= w[0]));
    assert!(means[0] >= 0.0 && means[0] < 1.0);
    assert!(means[5] <= 5.0 && means[5] > 4.0);
}
